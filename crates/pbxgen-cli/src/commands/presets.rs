use super::{dim, emphasize, json_pretty, EXIT_SUCCESS};
use pbxgen_schema::{list_presets, parse_blueprint_str, DEFAULT_PRESET};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PresetInfo {
    name: &'static str,
    description: &'static str,
    default: bool,
    targets: Vec<String>,
}

fn collect() -> Vec<PresetInfo> {
    list_presets()
        .iter()
        .map(|p| PresetInfo {
            name: p.name,
            description: p.description,
            default: p.name == DEFAULT_PRESET,
            targets: parse_blueprint_str(p.blueprint)
                .map(|bp| bp.targets.into_iter().map(|t| t.name).collect())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn run(json: bool) -> Result<u8, String> {
    let presets = collect();
    if json {
        println!("{}", json_pretty(&presets)?);
        return Ok(EXIT_SUCCESS);
    }
    for p in &presets {
        let marker = if p.default { " (default)" } else { "" };
        println!("{:<16} {}{}", emphasize(p.name), p.description, dim(marker));
        for target in &p.targets {
            println!("{:<16} - {target}", "");
        }
    }
    Ok(EXIT_SUCCESS)
}
