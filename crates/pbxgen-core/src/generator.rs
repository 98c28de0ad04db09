use crate::fingerprint::{content_digest, shape_fingerprint};
use crate::integrity::{verify_graph, IntegrityReport};
use crate::layout::OutputLayout;
use crate::model::{Isa, ObjectGraph};
use crate::output::write_output;
use crate::plan::{build_graph, required_roles};
use crate::render::render_manifest;
use crate::CoreError;
use pbxgen_schema::{
    allocate_tokens, get_preset, os_token_source, parse_blueprint_file, parse_blueprint_str,
    seeded_token_source, NormalizedBlueprint, TokenRegistry,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Draw tokens from a seeded generator instead of the OS RNG.
    pub seed: Option<u64>,
    /// Build and render, but do not touch the filesystem.
    pub dry_run: bool,
}

/// A target as reported back to the user.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub platform: String,
    pub bundle_identifier: String,
    pub product: String,
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub path: PathBuf,
    pub project_name: String,
    pub targets: Vec<TargetSummary>,
    pub object_count: usize,
    pub token_count: usize,
    pub digest: String,
    pub shape: String,
    pub written: bool,
    #[serde(skip)]
    pub manifest: String,
}

/// A built, verified, and rendered manifest that has not been written yet.
#[derive(Debug)]
pub struct Plan {
    pub registry: TokenRegistry,
    pub graph: ObjectGraph,
    pub report: IntegrityReport,
    pub manifest: String,
}

/// Drives one run: tokens, graph, verification, rendering, write.
#[derive(Debug, Clone)]
pub struct Generator {
    output_dir: PathBuf,
}

impl Generator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn layout_for(&self, bp: &NormalizedBlueprint) -> OutputLayout {
        OutputLayout::new(&self.output_dir, &bp.name)
    }

    /// Allocate tokens and build the graph. The integrity report is returned
    /// as part of the plan and not acted on.
    pub fn plan(&self, bp: &NormalizedBlueprint, seed: Option<u64>) -> Result<Plan, CoreError> {
        let roles = required_roles(bp);
        let registry = match seed {
            Some(seed) => {
                debug!("using seeded token source ({seed})");
                allocate_tokens(roles, &mut seeded_token_source(seed))
            }
            None => allocate_tokens(roles, &mut os_token_source()),
        };
        let graph = build_graph(bp, &registry)?;
        let report = verify_graph(&graph);
        debug!("integrity: {report}");
        let manifest = render_manifest(&graph);
        Ok(Plan {
            registry,
            graph,
            report,
            manifest,
        })
    }

    pub fn generate(
        &self,
        bp: &NormalizedBlueprint,
        options: GenerateOptions,
    ) -> Result<GenerateResult, CoreError> {
        let layout = self.layout_for(bp);
        info!(
            "generating '{}' with {} target(s) into {}",
            bp.name,
            bp.targets.len(),
            layout.manifest_path().display()
        );

        let plan = self.plan(bp, options.seed)?;
        if !plan.report.is_clean() {
            return Err(CoreError::Integrity(plan.report.to_string()));
        }

        let path = layout.manifest_path();
        if options.dry_run {
            debug!("dry run: not writing {}", path.display());
        } else {
            write_output(&path, &plan.manifest)?;
            info!("wrote {}", path.display());
        }

        Ok(GenerateResult {
            path,
            project_name: bp.name.clone(),
            targets: summarize_targets(bp),
            object_count: plan.graph.len(),
            token_count: plan.registry.len(),
            digest: content_digest(&plan.manifest),
            shape: shape_fingerprint(&plan.graph, &plan.registry),
            written: !options.dry_run,
            manifest: plan.manifest,
        })
    }
}

/// Parse and normalize the blueprint at `path`.
pub fn load_blueprint_file(path: &Path) -> Result<NormalizedBlueprint, CoreError> {
    debug!("loading blueprint from {}", path.display());
    Ok(parse_blueprint_file(path)?.normalize()?)
}

/// Parse and normalize a built-in preset.
pub fn load_preset(name: &str) -> Result<NormalizedBlueprint, CoreError> {
    let preset = get_preset(name).ok_or_else(|| CoreError::UnknownPreset(name.to_owned()))?;
    debug!("using preset '{}'", preset.name);
    Ok(parse_blueprint_str(preset.blueprint)?.normalize()?)
}

pub fn summarize_targets(bp: &NormalizedBlueprint) -> Vec<TargetSummary> {
    bp.targets
        .iter()
        .map(|t| TargetSummary {
            name: t.name.clone(),
            platform: t.platform.to_string(),
            bundle_identifier: t.bundle_identifier.clone(),
            product: t.product_file(),
        })
        .collect()
}

/// Object counts per section, in section order.
pub fn section_counts(graph: &ObjectGraph) -> Vec<(Isa, usize)> {
    let mut counts: BTreeMap<Isa, usize> = BTreeMap::new();
    for (_, object) in graph.iter() {
        *counts.entry(object.isa()).or_default() += 1;
    }
    counts.into_iter().collect()
}
