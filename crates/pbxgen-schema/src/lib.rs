//! Blueprint parsing, normalization, tokens, and build-setting tables for pbxgen.
//!
//! This crate defines the input layer: TOML blueprint parsing (`BlueprintV1`),
//! the validated form the generator consumes (`NormalizedBlueprint`), built-in
//! presets, object-identifier generation (`TokenSource`), the role-to-token
//! registry, and the default build settings Xcode writes for app projects.

pub mod blueprint;
pub mod file_type;
pub mod normalize;
pub mod preset;
pub mod registry;
pub mod settings;
pub mod token;
pub mod types;

pub use blueprint::{
    parse_blueprint_file, parse_blueprint_str, BlueprintError, BlueprintV1, FilesSection,
    ProjectSection, TargetSection,
};
pub use file_type::{last_known_file_type, APPLICATION_PRODUCT_TYPE};
pub use normalize::{NormalizedBlueprint, NormalizedTarget};
pub use preset::{get_preset, list_presets, preset_names, Preset, BUILTIN_PRESETS, DEFAULT_PRESET};
pub use registry::{allocate_tokens, RegistryError, TokenRegistry};
pub use settings::{BuildSettings, Configuration, Platform, SettingValue};
pub use token::{
    generate_unique_token, is_token, os_token_source, seeded_token_source, RngTokenSource,
    TokenSource, TOKEN_LEN,
};
pub use types::{ObjectId, Role};
