//! Manifest generation for pbxgen.
//!
//! This crate turns a normalized blueprint into an Xcode `project.pbxproj`:
//! it allocates tokens, plans the typed object graph, verifies its referential
//! integrity, serializes it in the OpenStep property-list dialect, and writes
//! the result atomically. The [`Generator`] ties these steps together.

pub mod fingerprint;
pub mod generator;
pub mod integrity;
pub mod layout;
pub mod model;
pub mod output;
pub mod plan;
pub mod plist;
pub mod render;

pub use fingerprint::{content_digest, shape_fingerprint};
pub use generator::{
    load_blueprint_file, load_preset, section_counts, summarize_targets, GenerateOptions,
    GenerateResult, Generator, Plan, TargetSummary,
};
pub use integrity::{verify_graph, FailureKind, IntegrityFailure, IntegrityReport};
pub use layout::OutputLayout;
pub use model::{Isa, Object, ObjectGraph};
pub use output::write_output;
pub use plan::{build_graph, expected_object_count, required_roles};
pub use render::{render_manifest, render_shape};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("blueprint error: {0}")]
    Blueprint(#[from] pbxgen_schema::BlueprintError),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("registry error: {0}")]
    Registry(#[from] pbxgen_schema::RegistryError),
    #[error("object graph failed integrity checks: {0}")]
    Integrity(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
