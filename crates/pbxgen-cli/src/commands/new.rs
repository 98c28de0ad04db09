use super::{describe_error, json_pretty, success_mark, BLUEPRINT_PREFIX, EXIT_SUCCESS};
use pbxgen_core::write_output;
use pbxgen_schema::{get_preset, parse_blueprint_str, preset_names, DEFAULT_PRESET};
use std::path::Path;

pub const DEFAULT_BLUEPRINT: &str = "pbxgen.toml";

/// Blueprint text for a preset, renamed when `name` is given.
fn blueprint_text(preset: &str, name: Option<&str>) -> Result<String, String> {
    let source = get_preset(preset).ok_or_else(|| {
        format!(
            "{BLUEPRINT_PREFIX} unknown preset '{preset}' (expected: {})",
            preset_names()
        )
    })?;
    let Some(name) = name else {
        return Ok(source.blueprint.to_owned());
    };
    let mut bp =
        parse_blueprint_str(source.blueprint).map_err(|e| format!("{BLUEPRINT_PREFIX} {e}"))?;
    bp.project.name = name.to_owned();
    bp.normalize().map_err(|e| format!("{BLUEPRINT_PREFIX} {e}"))?;
    bp.to_toml().map_err(|e| format!("{BLUEPRINT_PREFIX} {e}"))
}

pub fn run(
    dest: &Path,
    preset: Option<&str>,
    name: Option<&str>,
    force: bool,
    json: bool,
) -> Result<u8, String> {
    let preset = preset.unwrap_or(DEFAULT_PRESET);

    if dest.exists() && !force {
        return Err(format!(
            "refusing to overwrite existing {} (pass --force)",
            dest.display()
        ));
    }
    let text = blueprint_text(preset, name)?;
    write_output(dest, &text).map_err(|e| describe_error(&e))?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": dest.display().to_string(),
            "preset": preset,
            "name": name,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} wrote {} from preset '{preset}'",
            success_mark(),
            dest.display()
        );
        println!("run `pbxgen generate --blueprint {}` to create the project", dest.display());
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_preset_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pbxgen.toml");
        run(&dest, Some("single"), None, false, true).unwrap();
        let text = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(text, get_preset("single").unwrap().blueprint);
    }

    #[test]
    fn renamed_blueprint_still_parses() {
        let text = blueprint_text("multiplatform", Some("Planner")).unwrap();
        let bp = parse_blueprint_str(&text).unwrap().normalize().unwrap();
        assert_eq!(bp.name, "Planner");
        assert_eq!(bp.targets.len(), 2);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pbxgen.toml");
        std::fs::write(&dest, "keep me").unwrap();
        let err = run(&dest, None, None, false, false).unwrap_err();
        assert!(err.contains("--force"));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "keep me");

        run(&dest, None, None, true, false).unwrap();
        assert_ne!(std::fs::read_to_string(&dest).unwrap(), "keep me");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("blueprints/app.toml");
        run(&dest, Some("single"), None, false, false).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn unwritable_destination_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let err = run(&blocker.join("pbxgen.toml"), None, None, false, false).unwrap_err();
        assert!(err.starts_with(crate::commands::OUTPUT_PREFIX), "{err}");
    }

    #[test]
    fn unknown_preset_rejected() {
        let err = blueprint_text("visionos", None).unwrap_err();
        assert!(err.starts_with(BLUEPRINT_PREFIX));
    }

    #[test]
    fn blank_name_rejected() {
        let err = blueprint_text("single", Some("  ")).unwrap_err();
        assert!(err.contains("project.name"));
    }
}
