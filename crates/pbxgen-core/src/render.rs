//! Serializer from an [`ObjectGraph`] to `project.pbxproj` text.

use crate::model::{Isa, Object, ObjectGraph};
use crate::plist::{encode_comment, encode_string, Value};
use pbxgen_schema::{ObjectId, TokenRegistry};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

const HEADER: &str = "// !$*UTF8*$!";

/// Render the manifest text for `graph`.
pub fn render_manifest(graph: &ObjectGraph) -> String {
    Renderer {
        graph,
        aliases: HashMap::new(),
    }
    .render()
}

/// Render `graph` with every token registered in `registry` written as its
/// role name. Two graphs of the same blueprint render identically this way,
/// whatever tokens they were built from.
pub fn render_shape(graph: &ObjectGraph, registry: &TokenRegistry) -> String {
    let aliases = registry
        .iter()
        .map(|(role, token)| (token.as_str(), role.as_str()))
        .collect();
    Renderer { graph, aliases }.render()
}

struct Renderer<'a> {
    graph: &'a ObjectGraph,
    aliases: HashMap<&'a str, &'a str>,
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

impl<'a> Renderer<'a> {
    fn name<'s>(&self, token: &'s str) -> Cow<'s, str> {
        match self.aliases.get(token) {
            Some(role) => Cow::Owned((*role).to_owned()),
            None => Cow::Borrowed(token),
        }
    }

    fn push_id(&self, out: &mut String, id: &ObjectId) {
        out.push_str(&encode_string(&self.name(id.as_str())));
        if let Some(comment) = self.graph.comment_for(id) {
            out.push_str(" /* ");
            out.push_str(&encode_comment(&comment));
            out.push_str(" */");
        }
    }

    fn push_key(&self, out: &mut String, key: &str) {
        let key = self.name(key);
        out.push_str(&encode_string(&key));
        out.push_str(" = ");
    }

    fn push_value(&self, out: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Str(s) => out.push_str(&encode_string(s)),
            Value::Ref(id) => self.push_id(out, id),
            Value::Array(items) => {
                out.push_str("(\n");
                for item in items {
                    indent(out, depth + 1);
                    self.push_value(out, item, depth + 1);
                    out.push_str(",\n");
                }
                indent(out, depth);
                out.push(')');
            }
            Value::Dict(entries) => {
                out.push_str("{\n");
                for (key, item) in entries {
                    indent(out, depth + 1);
                    self.push_key(out, key);
                    self.push_value(out, item, depth + 1);
                    out.push_str(";\n");
                }
                indent(out, depth);
                out.push('}');
            }
        }
    }

    fn push_inline_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Str(s) => out.push_str(&encode_string(s)),
            Value::Ref(id) => self.push_id(out, id),
            Value::Array(items) => {
                out.push('(');
                for item in items {
                    self.push_inline_value(out, item);
                    out.push_str(", ");
                }
                out.push(')');
            }
            Value::Dict(entries) => {
                out.push('{');
                for (key, item) in entries {
                    self.push_key(out, key);
                    self.push_inline_value(out, item);
                    out.push_str("; ");
                }
                out.push('}');
            }
        }
    }

    fn push_object(&self, out: &mut String, id: &ObjectId, object: &Object) {
        indent(out, 2);
        self.push_id(out, id);
        out.push_str(" = ");
        if object.is_inline() {
            out.push_str("{isa = ");
            out.push_str(object.isa().as_str());
            out.push_str("; ");
            for (key, value) in object.fields() {
                self.push_key(out, &key);
                self.push_inline_value(out, &value);
                out.push_str("; ");
            }
            out.push_str("};\n");
            return;
        }
        out.push_str("{\n");
        indent(out, 3);
        out.push_str("isa = ");
        out.push_str(object.isa().as_str());
        out.push_str(";\n");
        for (key, value) in object.fields() {
            indent(out, 3);
            self.push_key(out, &key);
            self.push_value(out, &value, 3);
            out.push_str(";\n");
        }
        indent(out, 2);
        out.push_str("};\n");
    }

    fn render(&self) -> String {
        // Within a section, objects keep the order the planner inserted them in.
        let mut sections: BTreeMap<Isa, Vec<(&ObjectId, &Object)>> = BTreeMap::new();
        for (id, object) in self.graph.iter() {
            sections.entry(object.isa()).or_default().push((id, object));
        }

        let mut out = String::with_capacity(self.graph.len() * 160);
        out.push_str(HEADER);
        out.push_str("\n{\n");
        out.push_str(&format!(
            "\tarchiveVersion = {};\n\tclasses = {{\n\t}};\n\tobjectVersion = {};\n\tobjects = {{\n",
            ObjectGraph::ARCHIVE_VERSION,
            self.graph.object_version()
        ));

        for (isa, objects) in sections {
            out.push_str(&format!("\n/* Begin {isa} section */\n"));
            for (id, object) in objects {
                self.push_object(&mut out, id, object);
            }
            out.push_str(&format!("/* End {isa} section */\n"));
        }

        out.push_str("\t};\n\trootObject = ");
        self.push_id(&mut out, self.graph.root());
        out.push_str(";\n}\n");
        out
    }
}
