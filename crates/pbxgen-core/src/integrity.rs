use crate::model::ObjectGraph;
use pbxgen_schema::ObjectId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub checked: usize,
    pub references_checked: usize,
    pub failed: Vec<IntegrityFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DuplicateDefinition,
    DanglingReference,
    WrongKind,
    Unreferenced,
    MissingRoot,
}

#[derive(Debug, Serialize)]
pub struct IntegrityFailure {
    pub id: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn count(&self, kind: FailureKind) -> usize {
        self.failed.iter().filter(|f| f.kind == kind).count()
    }

    fn fail(&mut self, id: &ObjectId, kind: FailureKind, reason: String) {
        self.failed.push(IntegrityFailure {
            id: id.to_string(),
            kind,
            reason,
        });
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects, {} references, {} failures",
            self.checked,
            self.references_checked,
            self.failed.len()
        )?;
        for failure in &self.failed {
            write!(f, "\n  {}: {}", failure.id, failure.reason)?;
        }
        Ok(())
    }
}

/// Check referential closure of `graph`: every id is defined once, every
/// reference resolves to a node of an allowed kind, and every node other than
/// the root is referenced by some other node.
pub fn verify_graph(graph: &ObjectGraph) -> IntegrityReport {
    let mut report = IntegrityReport {
        checked: graph.len(),
        ..Default::default()
    };

    // Definitions
    let mut seen = HashSet::with_capacity(graph.len());
    for (id, object) in graph.iter() {
        if !seen.insert(id) {
            report.fail(
                id,
                FailureKind::DuplicateDefinition,
                format!("{} defined more than once", object.isa()),
            );
        }
    }

    // References
    let mut inbound: HashMap<&ObjectId, usize> = HashMap::with_capacity(graph.len());
    for (id, object) in graph.iter() {
        for reference in object.references() {
            report.references_checked += 1;
            *inbound.entry(reference.target).or_default() += 1;
            match graph.get(reference.target) {
                None => report.fail(
                    id,
                    FailureKind::DanglingReference,
                    format!(
                        "{}.{} points at undefined {}",
                        object.isa(),
                        reference.field,
                        reference.target
                    ),
                ),
                Some(target) if !reference.expects.contains(&target.isa()) => report.fail(
                    id,
                    FailureKind::WrongKind,
                    format!(
                        "{}.{} points at {} {}",
                        object.isa(),
                        reference.field,
                        target.isa(),
                        reference.target
                    ),
                ),
                Some(_) => {}
            }
        }
    }

    // Root
    match graph.get(graph.root()) {
        None => report.fail(
            graph.root(),
            FailureKind::MissingRoot,
            "rootObject is not defined".to_owned(),
        ),
        Some(root) if root.isa() != crate::model::Isa::Project => report.fail(
            graph.root(),
            FailureKind::WrongKind,
            format!("rootObject points at {}", root.isa()),
        ),
        Some(_) => {}
    }

    // Orphans
    let mut reported = HashSet::new();
    for (id, object) in graph.iter() {
        if id != graph.root() && !inbound.contains_key(id) && reported.insert(id) {
            report.fail(
                id,
                FailureKind::Unreferenced,
                format!("{} is never referenced", object.isa()),
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BuildFile, BuildPhase, FileKind, FileReference, Group, Object, PhaseKind, SourceTree,
    };

    fn id(s: &str) -> ObjectId {
        ObjectId::new(s)
    }

    fn file(path: &str) -> Object {
        Object::FileReference(FileReference {
            path: path.to_owned(),
            kind: FileKind::LastKnown("sourcecode.swift"),
            source_tree: SourceTree::Group,
        })
    }

    fn group(children: &[&str]) -> Object {
        Object::Group(Group {
            name: None,
            path: None,
            children: children.iter().map(|c| id(c)).collect(),
        })
    }

    #[test]
    fn graph_without_project_root_fails() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["A"]));
        graph.insert(id("A"), file("A.swift"));
        let report = verify_graph(&graph);
        assert_eq!(report.checked, 2);
        assert_eq!(report.references_checked, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].kind, FailureKind::WrongKind);
    }

    #[test]
    fn missing_root_detected() {
        let mut graph = ObjectGraph::new(56, id("NOPE"));
        graph.insert(id("A"), file("A.swift"));
        let report = verify_graph(&graph);
        assert_eq!(report.count(FailureKind::MissingRoot), 1);
        assert_eq!(report.count(FailureKind::Unreferenced), 1);
    }

    #[test]
    fn dangling_reference_detected() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["GONE"]));
        let report = verify_graph(&graph);
        assert_eq!(report.count(FailureKind::DanglingReference), 1);
        assert!(report.failed[0].reason.contains("GONE"));
    }

    #[test]
    fn wrong_kind_detected() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["PHASE"]));
        graph.insert(
            id("PHASE"),
            Object::BuildPhase(BuildPhase {
                kind: PhaseKind::Sources,
                files: Vec::new(),
            }),
        );
        let report = verify_graph(&graph);
        assert!(report
            .failed
            .iter()
            .any(|f| f.kind == FailureKind::WrongKind && f.reason.contains("children")));
    }

    #[test]
    fn duplicate_definition_detected() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["A"]));
        graph.insert(id("A"), file("A.swift"));
        graph.insert(id("A"), file("B.swift"));
        let report = verify_graph(&graph);
        assert_eq!(report.count(FailureKind::DuplicateDefinition), 1);
    }

    #[test]
    fn unreferenced_build_file_detected() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["A"]));
        graph.insert(id("A"), file("A.swift"));
        graph.insert(
            id("B"),
            Object::BuildFile(BuildFile {
                file_ref: id("A"),
                file_name: "A.swift".to_owned(),
                phase: PhaseKind::Sources,
            }),
        );
        let report = verify_graph(&graph);
        assert_eq!(report.count(FailureKind::Unreferenced), 1);
        assert_eq!(report.failed.iter().find(|f| f.kind == FailureKind::Unreferenced).unwrap().id, "B");
    }

    #[test]
    fn report_display_lists_failures() {
        let mut graph = ObjectGraph::new(56, id("ROOT"));
        graph.insert(id("ROOT"), group(&["GONE"]));
        let text = verify_graph(&graph).to_string();
        assert!(text.starts_with("1 objects, 1 references"));
        assert!(text.contains("GONE"));
    }
}
