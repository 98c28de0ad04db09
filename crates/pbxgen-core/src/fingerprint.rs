use crate::model::ObjectGraph;
use crate::render::render_shape;
use pbxgen_schema::TokenRegistry;

/// blake3 digest of the rendered manifest bytes. Differs between runs.
pub fn content_digest(manifest: &str) -> String {
    blake3::hash(manifest.as_bytes()).to_hex().to_string()
}

/// blake3 digest of the manifest structure with tokens replaced by role names.
/// Equal for every run over the same blueprint.
pub fn shape_fingerprint(graph: &ObjectGraph, registry: &TokenRegistry) -> String {
    blake3::hash(render_shape(graph, registry).as_bytes())
        .to_hex()
        .to_string()
}
