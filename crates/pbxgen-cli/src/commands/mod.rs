pub mod check;
pub mod completions;
pub mod generate;
pub mod man_pages;
pub mod new;
pub mod presets;

use console::Style;
use pbxgen_core::{load_blueprint_file, load_preset, CoreError};
use pbxgen_schema::{NormalizedBlueprint, DEFAULT_PRESET};
use std::path::Path;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_BLUEPRINT_ERROR: u8 = 2;
pub const EXIT_OUTPUT_ERROR: u8 = 3;

pub const BLUEPRINT_PREFIX: &str = "blueprint error:";
pub const OUTPUT_PREFIX: &str = "output error:";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Map a core error to a message whose prefix selects the exit code.
pub fn describe_error(err: &CoreError) -> String {
    match err {
        CoreError::Blueprint(e) => format!("{BLUEPRINT_PREFIX} {e}"),
        CoreError::UnknownPreset(name) => format!(
            "{BLUEPRINT_PREFIX} unknown preset '{name}' (expected: {})",
            pbxgen_schema::preset_names()
        ),
        CoreError::Io(e) => format!("{OUTPUT_PREFIX} {e}"),
        other => other.to_string(),
    }
}

/// Exit code for an error message produced by a command handler.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with(BLUEPRINT_PREFIX) {
        EXIT_BLUEPRINT_ERROR
    } else if msg.starts_with(OUTPUT_PREFIX) {
        EXIT_OUTPUT_ERROR
    } else {
        EXIT_FAILURE
    }
}

/// Load the blueprint a command runs on: a file when given, otherwise the
/// named preset, otherwise the default preset.
pub fn resolve_blueprint(
    preset: Option<&str>,
    blueprint: Option<&Path>,
) -> Result<NormalizedBlueprint, String> {
    let loaded = match blueprint {
        Some(path) => load_blueprint_file(path),
        None => load_preset(preset.unwrap_or(DEFAULT_PRESET)),
    };
    loaded.map_err(|e| describe_error(&e))
}

pub fn success_mark() -> String {
    Style::new().green().bold().apply_to("✓").to_string()
}

pub fn failure_mark() -> String {
    Style::new().red().bold().apply_to("✗").to_string()
}

pub fn emphasize(text: &str) -> String {
    Style::new().cyan().apply_to(text).to_string()
}

pub fn dim(text: &str) -> String {
    Style::new().dim().apply_to(text).to_string()
}
