//! Typed object graph of a pbxproj manifest.
//!
//! Every node is an [`Object`] stored under its [`ObjectId`]. Nodes know their
//! `isa`, the comment Xcode prints next to their id, their outgoing references
//! (with the node kinds each reference may point at), and the property-list
//! fields they serialize to.

use crate::plist::Value;
use pbxgen_schema::{BuildSettings, Configuration, ObjectId};
use std::collections::HashMap;
use std::fmt;

/// Node kind. Declaration order is the section order of the rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Isa {
    BuildFile,
    FileReference,
    FrameworksBuildPhase,
    Group,
    NativeTarget,
    Project,
    ResourcesBuildPhase,
    SourcesBuildPhase,
    BuildConfiguration,
    ConfigurationList,
}

impl Isa {
    pub fn as_str(self) -> &'static str {
        match self {
            Isa::BuildFile => "PBXBuildFile",
            Isa::FileReference => "PBXFileReference",
            Isa::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            Isa::Group => "PBXGroup",
            Isa::NativeTarget => "PBXNativeTarget",
            Isa::Project => "PBXProject",
            Isa::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            Isa::SourcesBuildPhase => "PBXSourcesBuildPhase",
            Isa::BuildConfiguration => "XCBuildConfiguration",
            Isa::ConfigurationList => "XCConfigurationList",
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BUILD_PHASES: &[Isa] = &[
    Isa::SourcesBuildPhase,
    Isa::FrameworksBuildPhase,
    Isa::ResourcesBuildPhase,
];

/// Mask Xcode writes on every build phase.
const BUILD_ACTION_MASK: u64 = 2_147_483_647;

pub const APPLICATION_PRODUCT: &str = "com.apple.product-type.application";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Sources,
    Frameworks,
    Resources,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 3] = [PhaseKind::Sources, PhaseKind::Frameworks, PhaseKind::Resources];

    pub fn isa(self) -> Isa {
        match self {
            PhaseKind::Sources => Isa::SourcesBuildPhase,
            PhaseKind::Frameworks => Isa::FrameworksBuildPhase,
            PhaseKind::Resources => Isa::ResourcesBuildPhase,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Sources => "Sources",
            PhaseKind::Frameworks => "Frameworks",
            PhaseKind::Resources => "Resources",
        }
    }

    /// Lower-case form used in token roles.
    pub fn slug(self) -> &'static str {
        match self {
            PhaseKind::Sources => "sources",
            PhaseKind::Frameworks => "frameworks",
            PhaseKind::Resources => "resources",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTree {
    Group,
    BuiltProductsDir,
}

impl SourceTree {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTree::Group => "<group>",
            SourceTree::BuiltProductsDir => "BUILT_PRODUCTS_DIR",
        }
    }
}

/// How a file reference declares its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// Source-tree file; `lastKnownFileType`.
    LastKnown(&'static str),
    /// Build product; `explicitFileType` and excluded from the index.
    Product(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFile {
    pub file_ref: ObjectId,
    pub file_name: String,
    pub phase: PhaseKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub path: String,
    pub kind: FileKind,
    pub source_tree: SourceTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub kind: PhaseKind,
    pub files: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: Option<String>,
    pub path: Option<String>,
    pub children: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTarget {
    pub name: String,
    pub product_name: String,
    pub configuration_list: ObjectId,
    pub phases: Vec<ObjectId>,
    pub product_reference: ObjectId,
    pub product_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub last_upgrade_check: String,
    /// `CreatedOnToolsVersion` per target; empty means no `TargetAttributes`.
    pub target_attributes: Vec<(ObjectId, String)>,
    pub configuration_list: ObjectId,
    pub compatibility_version: String,
    pub development_region: String,
    pub known_regions: Vec<String>,
    pub main_group: ObjectId,
    pub product_ref_group: ObjectId,
    pub targets: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub name: Configuration,
    pub settings: BuildSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationList {
    pub owner_isa: Isa,
    pub owner_name: String,
    pub configurations: Vec<ObjectId>,
    pub default_configuration: Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    BuildFile(BuildFile),
    FileReference(FileReference),
    BuildPhase(BuildPhase),
    Group(Group),
    NativeTarget(NativeTarget),
    Project(Project),
    BuildConfiguration(BuildConfiguration),
    ConfigurationList(ConfigurationList),
}

/// One outgoing edge of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub field: &'static str,
    pub target: &'a ObjectId,
    /// Node kinds the target is allowed to be.
    pub expects: &'static [Isa],
}

impl<'a> Reference<'a> {
    fn new(field: &'static str, target: &'a ObjectId, expects: &'static [Isa]) -> Self {
        Self {
            field,
            target,
            expects,
        }
    }
}

impl Object {
    pub fn isa(&self) -> Isa {
        match self {
            Object::BuildFile(_) => Isa::BuildFile,
            Object::FileReference(_) => Isa::FileReference,
            Object::BuildPhase(p) => p.kind.isa(),
            Object::Group(_) => Isa::Group,
            Object::NativeTarget(_) => Isa::NativeTarget,
            Object::Project(_) => Isa::Project,
            Object::BuildConfiguration(_) => Isa::BuildConfiguration,
            Object::ConfigurationList(_) => Isa::ConfigurationList,
        }
    }

    /// Annotation printed after the node's id. The main group has none.
    pub fn comment(&self) -> Option<String> {
        match self {
            Object::BuildFile(b) => Some(format!("{} in {}", b.file_name, b.phase.as_str())),
            Object::FileReference(f) => Some(f.path.clone()),
            Object::BuildPhase(p) => Some(p.kind.as_str().to_owned()),
            Object::Group(g) => g.name.clone().or_else(|| g.path.clone()),
            Object::NativeTarget(t) => Some(t.name.clone()),
            Object::Project(_) => Some("Project object".to_owned()),
            Object::BuildConfiguration(c) => Some(c.name.as_str().to_owned()),
            Object::ConfigurationList(l) => Some(format!(
                "Build configuration list for {} \"{}\"",
                l.owner_isa, l.owner_name
            )),
        }
    }

    /// Single-line rendering, as Xcode does for build files and file references.
    pub fn is_inline(&self) -> bool {
        matches!(self, Object::BuildFile(_) | Object::FileReference(_))
    }

    pub fn references(&self) -> Vec<Reference<'_>> {
        match self {
            Object::BuildFile(b) => vec![Reference::new("fileRef", &b.file_ref, &[Isa::FileReference])],
            Object::FileReference(_) | Object::BuildConfiguration(_) => Vec::new(),
            Object::BuildPhase(p) => p
                .files
                .iter()
                .map(|f| Reference::new("files", f, &[Isa::BuildFile]))
                .collect(),
            Object::Group(g) => g
                .children
                .iter()
                .map(|c| Reference::new("children", c, &[Isa::FileReference, Isa::Group]))
                .collect(),
            Object::NativeTarget(t) => {
                let mut refs = vec![Reference::new(
                    "buildConfigurationList",
                    &t.configuration_list,
                    &[Isa::ConfigurationList],
                )];
                refs.extend(
                    t.phases
                        .iter()
                        .map(|p| Reference::new("buildPhases", p, BUILD_PHASES)),
                );
                refs.push(Reference::new(
                    "productReference",
                    &t.product_reference,
                    &[Isa::FileReference],
                ));
                refs
            }
            Object::Project(p) => {
                let mut refs: Vec<Reference<'_>> = p
                    .target_attributes
                    .iter()
                    .map(|(id, _)| Reference::new("TargetAttributes", id, &[Isa::NativeTarget]))
                    .collect();
                refs.push(Reference::new(
                    "buildConfigurationList",
                    &p.configuration_list,
                    &[Isa::ConfigurationList],
                ));
                refs.push(Reference::new("mainGroup", &p.main_group, &[Isa::Group]));
                refs.push(Reference::new(
                    "productRefGroup",
                    &p.product_ref_group,
                    &[Isa::Group],
                ));
                refs.extend(
                    p.targets
                        .iter()
                        .map(|t| Reference::new("targets", t, &[Isa::NativeTarget])),
                );
                refs
            }
            Object::ConfigurationList(l) => l
                .configurations
                .iter()
                .map(|c| Reference::new("buildConfigurations", c, &[Isa::BuildConfiguration]))
                .collect(),
        }
    }

    /// Property-list fields after `isa`, in the order Xcode writes them.
    pub fn fields(&self) -> Vec<(String, Value)> {
        fn field(key: &str, value: Value) -> (String, Value) {
            (key.to_owned(), value)
        }

        match self {
            Object::BuildFile(b) => vec![field("fileRef", Value::Ref(b.file_ref.clone()))],
            Object::FileReference(f) => {
                let mut out = Vec::with_capacity(4);
                match &f.kind {
                    FileKind::LastKnown(t) => out.push(field("lastKnownFileType", Value::str(*t))),
                    FileKind::Product(t) => {
                        out.push(field("explicitFileType", Value::str(*t)));
                        out.push(field("includeInIndex", Value::int(0)));
                    }
                }
                out.push(field("path", Value::str(f.path.as_str())));
                out.push(field("sourceTree", Value::str(f.source_tree.as_str())));
                out
            }
            Object::BuildPhase(p) => vec![
                field("buildActionMask", Value::int(BUILD_ACTION_MASK)),
                field("files", Value::refs(&p.files)),
                field("runOnlyForDeploymentPostprocessing", Value::int(0)),
            ],
            Object::Group(g) => {
                let mut out = vec![field("children", Value::refs(&g.children))];
                if let Some(name) = &g.name {
                    out.push(field("name", Value::str(name.as_str())));
                }
                if let Some(path) = &g.path {
                    out.push(field("path", Value::str(path.as_str())));
                }
                out.push(field("sourceTree", Value::str(SourceTree::Group.as_str())));
                out
            }
            Object::NativeTarget(t) => vec![
                field(
                    "buildConfigurationList",
                    Value::Ref(t.configuration_list.clone()),
                ),
                field("buildPhases", Value::refs(&t.phases)),
                field("buildRules", Value::empty_array()),
                field("dependencies", Value::empty_array()),
                field("name", Value::str(t.name.as_str())),
                field("productName", Value::str(t.product_name.as_str())),
                field("productReference", Value::Ref(t.product_reference.clone())),
                field("productType", Value::str(t.product_type.as_str())),
            ],
            Object::Project(p) => {
                let mut attributes = vec![
                    field("BuildIndependentTargetsInParallel", Value::int(1)),
                    field("LastSwiftUpdateCheck", Value::str(p.last_upgrade_check.as_str())),
                    field("LastUpgradeCheck", Value::str(p.last_upgrade_check.as_str())),
                ];
                if !p.target_attributes.is_empty() {
                    let per_target = p
                        .target_attributes
                        .iter()
                        .map(|(id, version)| {
                            (
                                id.to_string(),
                                Value::Dict(vec![field(
                                    "CreatedOnToolsVersion",
                                    Value::str(version.as_str()),
                                )]),
                            )
                        })
                        .collect();
                    attributes.push(field("TargetAttributes", Value::Dict(per_target)));
                }
                vec![
                    field("attributes", Value::Dict(attributes)),
                    field(
                        "buildConfigurationList",
                        Value::Ref(p.configuration_list.clone()),
                    ),
                    field(
                        "compatibilityVersion",
                        Value::str(p.compatibility_version.as_str()),
                    ),
                    field("developmentRegion", Value::str(p.development_region.as_str())),
                    field("hasScannedForEncodings", Value::int(0)),
                    field(
                        "knownRegions",
                        Value::Array(p.known_regions.iter().map(Value::str).collect()),
                    ),
                    field("mainGroup", Value::Ref(p.main_group.clone())),
                    field("productRefGroup", Value::Ref(p.product_ref_group.clone())),
                    field("projectDirPath", Value::str("")),
                    field("projectRoot", Value::str("")),
                    field("targets", Value::refs(&p.targets)),
                ]
            }
            Object::BuildConfiguration(c) => vec![
                field(
                    "buildSettings",
                    Value::Dict(
                        c.settings
                            .iter()
                            .map(|(k, v)| (k.clone(), Value::from(v)))
                            .collect(),
                    ),
                ),
                field("name", Value::str(c.name.as_str())),
            ],
            Object::ConfigurationList(l) => vec![
                field("buildConfigurations", Value::refs(&l.configurations)),
                field("defaultConfigurationIsVisible", Value::int(0)),
                field(
                    "defaultConfigurationName",
                    Value::str(l.default_configuration.as_str()),
                ),
            ],
        }
    }
}

/// The full set of objects of one manifest, plus its root.
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    object_version: u32,
    root: ObjectId,
    objects: Vec<(ObjectId, Object)>,
    index: HashMap<ObjectId, usize>,
}

impl ObjectGraph {
    pub const ARCHIVE_VERSION: u32 = 1;

    pub fn new(object_version: u32, root: ObjectId) -> Self {
        Self {
            object_version,
            root,
            objects: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a node. A repeated id is kept (and reported by integrity checks);
    /// lookups resolve to the first definition.
    pub fn insert(&mut self, id: ObjectId, object: Object) {
        self.index.entry(id.clone()).or_insert(self.objects.len());
        self.objects.push((id, object));
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.index.get(id).map(|&i| &self.objects[i].1)
    }

    #[inline]
    pub fn root(&self) -> &ObjectId {
        &self.root
    }

    #[inline]
    pub fn object_version(&self) -> u32 {
        self.object_version
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &Object)> {
        self.objects.iter().map(|(id, obj)| (id, obj))
    }

    pub fn of_isa(&self, isa: Isa) -> impl Iterator<Item = (&ObjectId, &Object)> {
        self.iter().filter(move |(_, obj)| obj.isa() == isa)
    }

    pub fn count(&self, isa: Isa) -> usize {
        self.of_isa(isa).count()
    }

    /// Comment of the node `id` points at, if it exists and has one.
    pub fn comment_for(&self, id: &ObjectId) -> Option<String> {
        self.get(id).and_then(Object::comment)
    }

    pub fn project(&self) -> Option<&Project> {
        match self.get(&self.root) {
            Some(Object::Project(p)) => Some(p),
            _ => None,
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = (&ObjectId, &NativeTarget)> {
        self.iter().filter_map(|(id, obj)| match obj {
            Object::NativeTarget(t) => Some((id, t)),
            _ => None,
        })
    }
}
