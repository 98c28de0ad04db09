use pbxgen_core::{
    build_graph, load_preset, render_manifest, required_roles, shape_fingerprint, verify_graph,
    CoreError, GenerateOptions, Generator, Isa, Object, ObjectGraph,
};
use pbxgen_schema::{
    allocate_tokens, is_token, parse_blueprint_str, seeded_token_source, NormalizedBlueprint,
    ObjectId, TokenRegistry,
};
use std::collections::HashSet;
use std::fs;

fn planned(preset: &str, seed: u64) -> (NormalizedBlueprint, TokenRegistry, ObjectGraph) {
    let bp = load_preset(preset).unwrap();
    let registry = allocate_tokens(required_roles(&bp), &mut seeded_token_source(seed));
    let graph = build_graph(&bp, &registry).unwrap();
    (bp, registry, graph)
}

/// Every 24-character upper-hex word in the manifest text.
fn tokens_in(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| is_token(w))
        .collect()
}

fn phase_files(graph: &ObjectGraph, isa: Isa) -> Vec<Vec<ObjectId>> {
    graph
        .of_isa(isa)
        .filter_map(|(_, obj)| match obj {
            Object::BuildPhase(p) => Some(p.files.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn single_target_scenario() {
    let out = tempfile::tempdir().unwrap();
    let target_dir = out.path().join("fresh");
    let bp = load_preset("single").unwrap();
    let result = Generator::new(&target_dir)
        .generate(&bp, GenerateOptions::default())
        .unwrap();

    assert_eq!(
        result.path,
        target_dir.join("GetSh1tDone.xcodeproj/project.pbxproj")
    );
    let text = fs::read_to_string(&result.path).unwrap();
    assert!(text.starts_with("// !$*UTF8*$!\n"));
    assert_eq!(text.matches("isa = PBXNativeTarget;").count(), 1);
    assert_eq!(text.matches("isa = PBXProject;").count(), 1);

    let project_line = text
        .lines()
        .find(|l| l.ends_with("/* Project object */ = {"))
        .unwrap();
    let project_token = project_line.trim().split(' ').next().unwrap();
    assert!(text.contains(&format!(
        "rootObject = {project_token} /* Project object */;"
    )));
}

#[test]
fn multiplatform_scenario() {
    let (_, registry, graph) = planned("multiplatform", 11);
    assert_eq!(graph.count(Isa::NativeTarget), 2);

    let products: Vec<&ObjectId> = graph
        .targets()
        .map(|(_, t)| &t.product_reference)
        .collect();
    assert_eq!(products.len(), 2);
    assert_ne!(products[0], products[1]);

    let sources = phase_files(&graph, Isa::SourcesBuildPhase);
    let resources = phase_files(&graph, Isa::ResourcesBuildPhase);
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0], sources[1]);
    assert_eq!(resources[0], resources[1]);
    for id in sources[0].iter().chain(&resources[0]) {
        let role = registry.role_of(id).unwrap();
        assert!(role.starts_with("build_file:"), "{role}");
    }

    let text = render_manifest(&graph);
    assert!(text.contains("/* GetSh1tDone iOS */"));
    assert!(text.contains("/* GetSh1tDone macOS */"));
    assert!(text.contains("Build configuration list for PBXNativeTarget \"GetSh1tDone macOS\""));
    assert!(text.contains("Build configuration list for PBXProject \"GetSh1tDone\""));
    assert_eq!(text.matches("CreatedOnToolsVersion = 15.0;").count(), 2);

    assert!(text.contains("productName = \"GetSh1tDone iOS\";"));
    assert!(text.contains("productName = \"GetSh1tDone macOS\";"));
    assert_eq!(text.matches("path = GetSh1tDone.app;").count(), 2);
    assert_eq!(text.matches("PRODUCT_NAME = \"$(TARGET_NAME)\";").count(), 4);
    assert_eq!(text.matches("SDKROOT = iphoneos;").count(), 2);
    assert!(!text.contains("SDKROOT = macosx;"));
    assert!(!text.contains("SUPPORTED_PLATFORMS = macosx;"));
}

#[test]
fn registry_size_equals_entity_count() {
    for preset in ["single", "multiplatform"] {
        let (_, registry, graph) = planned(preset, 3);
        assert_eq!(registry.len(), graph.len(), "{preset}");
        let distinct: HashSet<&ObjectId> = registry.iter().map(|(_, t)| t).collect();
        assert_eq!(distinct.len(), registry.len(), "{preset}");
    }
}

#[test]
fn referential_closure() {
    for preset in ["single", "multiplatform"] {
        let (_, _, graph) = planned(preset, 5);
        let report = verify_graph(&graph);
        assert!(report.is_clean(), "{preset}: {report}");
        assert_eq!(report.checked, graph.len());
    }
}

#[test]
fn every_token_defined_once_and_used_again() {
    let (_, registry, graph) = planned("multiplatform", 8);
    let text = render_manifest(&graph);
    for (role, token) in registry.iter() {
        let prefix = format!("{token} ");
        let definitions = text
            .lines()
            .filter(|l| l.strip_prefix("\t\t").is_some_and(|r| r.starts_with(&prefix)))
            .count();
        assert_eq!(definitions, 1, "{role}");
        let occurrences = tokens_in(&text).iter().filter(|t| **t == token.as_str()).count();
        assert!(occurrences >= 2, "{role} appears {occurrences} time(s)");
    }
}

#[test]
fn no_unknown_tokens_in_manifest() {
    let (_, registry, graph) = planned("multiplatform", 13);
    let text = render_manifest(&graph);
    for token in tokens_in(&text) {
        assert!(
            registry.role_of(&ObjectId::new(token)).is_some(),
            "stray token {token}"
        );
    }
}

#[test]
fn shape_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(dir.path());
    let bp = load_preset("multiplatform").unwrap();
    let first = generator.generate(&bp, GenerateOptions::default()).unwrap();
    let second = generator.generate(&bp, GenerateOptions::default()).unwrap();
    assert_eq!(first.shape, second.shape);
    assert_ne!(first.digest, second.digest);
    assert_eq!(first.object_count, second.object_count);

    let (_, r1, g1) = planned("multiplatform", 100);
    let (_, r2, g2) = planned("multiplatform", 200);
    assert_eq!(shape_fingerprint(&g1, &r1), shape_fingerprint(&g2, &r2));
}

/// Manifest text with each token replaced by `<role>`.
fn masked_manifest(registry: &TokenRegistry, graph: &ObjectGraph) -> String {
    let mut text = render_manifest(graph);
    for (role, token) in registry.iter() {
        text = text.replace(token.as_str(), &format!("<{role}>"));
    }
    text
}

#[test]
fn runs_differ_only_in_token_values() {
    for preset in ["single", "multiplatform"] {
        let (_, r1, g1) = planned(preset, 1);
        let (_, r2, g2) = planned(preset, 2);
        let a = masked_manifest(&r1, &g1);
        let b = masked_manifest(&r2, &g2);
        assert!(tokens_in(&a).is_empty(), "{preset}");
        assert_eq!(a, b, "{preset}");
    }
}

#[test]
fn section_entries_follow_blueprint_order() {
    let (bp, registry, graph) = planned("multiplatform", 21);
    let text = masked_manifest(&registry, &graph);
    let positions: Vec<usize> = bp
        .sources
        .iter()
        .map(|path| {
            text.find(&format!("\t\t<build_file:sources:{path}> "))
                .unwrap()
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn rerun_after_delete_recreates_output() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(dir.path());
    let bp = load_preset("single").unwrap();

    let first = generator.generate(&bp, GenerateOptions::default()).unwrap();
    assert!(first.path.exists());
    fs::remove_dir_all(first.path.parent().unwrap()).unwrap();
    assert!(!first.path.exists());

    let second = generator.generate(&bp, GenerateOptions::default()).unwrap();
    assert_eq!(first.path, second.path);
    assert!(second.path.exists());
    assert_eq!(first.shape, second.shape);
}

#[test]
fn overwrite_replaces_previous_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(dir.path());
    let bp = load_preset("single").unwrap();
    let first = generator.generate(&bp, GenerateOptions::default()).unwrap();
    let second = generator.generate(&bp, GenerateOptions::default()).unwrap();
    let on_disk = fs::read_to_string(&second.path).unwrap();
    assert_eq!(pbxgen_core::content_digest(&on_disk), second.digest);
    assert_ne!(first.digest, second.digest);
}

#[test]
fn unwritable_destination_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();
    let bp = load_preset("single").unwrap();
    let err = Generator::new(&blocker)
        .generate(&bp, GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn custom_blueprint_end_to_end() {
    let input = r#"
blueprint_version = 1

[project]
name = "Notes"

[files]
sources = ["NotesApp.swift", "Views/List View.swift"]

[[targets]]
name = "Notes Mac"
platform = "macos"
bundle_identifier = "org.example.notes"
product_name = "Notes"
deployment_target = "13.0"
"#;
    let bp = parse_blueprint_str(input).unwrap().normalize().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let result = Generator::new(dir.path())
        .generate(
            &bp,
            GenerateOptions {
                seed: Some(9),
                dry_run: false,
            },
        )
        .unwrap();
    let text = fs::read_to_string(dir.path().join("Notes.xcodeproj/project.pbxproj")).unwrap();
    assert_eq!(text, result.manifest);
    assert!(text.contains("path = \"Views/List View.swift\";"));
    assert!(text.contains("/* Views/List View.swift in Sources */"));
    assert!(text.contains("MACOSX_DEPLOYMENT_TARGET = 13.0;"));
    assert!(text.contains("path = Notes.app;"));
    assert!(text.contains("PRODUCT_NAME = Notes;"));
    assert!(text.contains("productName = \"Notes Mac\";"));
    assert!(!text.contains("TargetAttributes"));
    // Resources phase exists even with no resources.
    assert!(text.contains("/* Begin PBXResourcesBuildPhase section */"));
}
