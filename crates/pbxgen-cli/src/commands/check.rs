use super::{
    describe_error, failure_mark, json_pretty, resolve_blueprint, success_mark, EXIT_FAILURE,
    EXIT_SUCCESS,
};
use pbxgen_core::{section_counts, shape_fingerprint, Generator};
use std::path::Path;

/// Build and verify the object graph for a blueprint without writing anything.
pub fn run(preset: Option<&str>, blueprint: Option<&Path>, json: bool) -> Result<u8, String> {
    let bp = resolve_blueprint(preset, blueprint)?;
    let plan = Generator::new(".")
        .plan(&bp, None)
        .map_err(|e| describe_error(&e))?;
    let report = &plan.report;
    let sections = section_counts(&plan.graph);

    if json {
        let payload = serde_json::json!({
            "project": bp.name,
            "targets": bp.targets.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "objects": plan.graph.len(),
            "tokens": plan.registry.len(),
            "sections": sections
                .iter()
                .map(|(isa, n)| (isa.as_str(), *n))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "shape": shape_fingerprint(&plan.graph, &plan.registry),
            "references_checked": report.references_checked,
            "failed": report.failed,
            "clean": report.is_clean(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "project '{}': {} objects, {} references checked",
            bp.name, report.checked, report.references_checked
        );
        for (isa, n) in &sections {
            println!("  {isa:<26} {n}");
        }
        if report.is_clean() {
            println!("{} object graph is consistent", success_mark());
        } else {
            println!("{} object graph has {} problem(s)", failure_mark(), report.failed.len());
            for f in &report.failed {
                println!("  FAIL {}: {}", f.id, f.reason);
            }
        }
    }

    if report.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_check_clean() {
        assert_eq!(run(Some("single"), None, true).unwrap(), EXIT_SUCCESS);
        assert_eq!(run(Some("multiplatform"), None, false).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn invalid_blueprint_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pbxgen.toml");
        std::fs::write(&path, "blueprint_version = 3\n[project]\nname = \"X\"\n").unwrap();
        let msg = run(None, Some(&path), false).unwrap_err();
        assert!(msg.contains("unsupported blueprint_version"), "{msg}");
    }
}
