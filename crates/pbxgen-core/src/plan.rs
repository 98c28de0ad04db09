//! Planning: which entities a blueprint needs, and the object graph built from
//! a registry of their tokens.
//!
//! [`required_roles`] and [`build_graph`] walk the blueprint in the same order
//! and name every entity with the same role, so a registry allocated from the
//! first always satisfies the second.

use crate::model::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileKind, FileReference, Group,
    Isa, NativeTarget, Object, ObjectGraph, PhaseKind, Project, SourceTree, APPLICATION_PRODUCT,
};
use pbxgen_schema::settings::{project_defaults, target_defaults};
use pbxgen_schema::{
    last_known_file_type, BuildSettings, Configuration, NormalizedBlueprint, NormalizedTarget,
    ObjectId, RegistryError, Role, SettingValue, TokenRegistry, APPLICATION_PRODUCT_TYPE,
};
use tracing::debug;

/// Role names for every entity kind.
pub mod roles {
    use super::PhaseKind;
    use pbxgen_schema::{Configuration, Role};

    pub fn project() -> Role {
        Role::new("project")
    }

    pub fn root_group() -> Role {
        Role::new("group:root")
    }

    pub fn source_group() -> Role {
        Role::new("group:main")
    }

    pub fn products_group() -> Role {
        Role::new("group:products")
    }

    pub fn file(path: &str) -> Role {
        Role::new(format!("file:{path}"))
    }

    pub fn build_file(phase: PhaseKind, path: &str) -> Role {
        Role::new(format!("build_file:{}:{path}", phase.slug()))
    }

    pub fn product(target: &str) -> Role {
        Role::new(format!("product:{target}"))
    }

    pub fn target(target: &str) -> Role {
        Role::new(format!("target:{target}"))
    }

    pub fn phase(target: &str, phase: PhaseKind) -> Role {
        Role::new(format!("phase:{target}:{}", phase.slug()))
    }

    pub fn project_config_list() -> Role {
        Role::new("config_list:project")
    }

    pub fn project_config(config: Configuration) -> Role {
        Role::new(format!("config:project:{config}"))
    }

    pub fn target_config_list(target: &str) -> Role {
        Role::new(format!("config_list:target:{target}"))
    }

    pub fn target_config(target: &str, config: Configuration) -> Role {
        Role::new(format!("config:target:{target}:{config}"))
    }
}

/// Every role the graph for `bp` will ask for, in planning order.
pub fn required_roles(bp: &NormalizedBlueprint) -> Vec<Role> {
    let mut out = vec![
        roles::project(),
        roles::root_group(),
        roles::source_group(),
        roles::products_group(),
        roles::project_config_list(),
    ];
    out.extend(Configuration::ALL.into_iter().map(roles::project_config));
    out.extend(bp.group_files().map(roles::file));
    out.extend(
        bp.sources
            .iter()
            .map(|p| roles::build_file(PhaseKind::Sources, p)),
    );
    out.extend(
        bp.resources
            .iter()
            .map(|p| roles::build_file(PhaseKind::Resources, p)),
    );
    for target in &bp.targets {
        let name = target.name.as_str();
        out.push(roles::target(name));
        out.push(roles::product(name));
        out.extend(PhaseKind::ALL.into_iter().map(|k| roles::phase(name, k)));
        out.push(roles::target_config_list(name));
        out.extend(
            Configuration::ALL
                .into_iter()
                .map(|c| roles::target_config(name, c)),
        );
    }
    out
}

/// Number of objects the graph for `bp` contains.
pub fn expected_object_count(bp: &NormalizedBlueprint) -> usize {
    required_roles(bp).len()
}

/// Target build settings: platform defaults, blueprint-derived keys, the
/// deployment target with its SDK when one is set, then the target's overrides.
pub fn target_settings(bp: &NormalizedBlueprint, target: &NormalizedTarget) -> BuildSettings {
    let mut settings = target_defaults(target.platform);
    let mut set = |key: &str, value: SettingValue| {
        settings.insert(key.to_owned(), value);
    };

    for (key, value) in &bp.info_plist_keys {
        set(&format!("INFOPLIST_KEY_{key}"), value.as_str().into());
    }
    if let Some(plist) = &bp.info_plist {
        set("INFOPLIST_FILE", format!("{}/{plist}", bp.group_path).into());
    }
    if let Some(entitlements) = &bp.entitlements {
        set(
            "CODE_SIGN_ENTITLEMENTS",
            format!("{}/{entitlements}", bp.group_path).into(),
        );
    }
    set("MARKETING_VERSION", target.marketing_version.as_str().into());
    set(
        "PRODUCT_BUNDLE_IDENTIFIER",
        target.bundle_identifier.as_str().into(),
    );
    if target.declared_product_name {
        set("PRODUCT_NAME", target.product_name.as_str().into());
    }
    set("SWIFT_VERSION", target.swift_version.as_str().into());

    if let Some(version) = &target.deployment_target {
        set(
            target.platform.deployment_target_key(),
            version.as_str().into(),
        );
        if let Some((sdk, platforms)) = target.platform.sdk_settings() {
            set("SDKROOT", sdk.into());
            set("SUPPORTED_PLATFORMS", platforms.into());
        }
    }

    settings.extend(target.settings.clone());
    settings
}

/// Project build settings for one configuration.
pub fn project_settings(bp: &NormalizedBlueprint, config: Configuration) -> BuildSettings {
    let mut settings = project_defaults(config);
    settings.extend(bp.project_settings.clone());
    settings
}

/// Resolves roles against the registry while the graph is assembled.
struct Planner<'a> {
    registry: &'a TokenRegistry,
}

impl Planner<'_> {
    fn id(&self, role: &Role) -> Result<ObjectId, RegistryError> {
        self.registry.require(role)
    }

    fn configuration_list(
        &self,
        graph: &mut ObjectGraph,
        list_role: &Role,
        owner_isa: Isa,
        owner_name: &str,
        configs: impl Fn(Configuration) -> (Role, BuildSettings),
    ) -> Result<ObjectId, RegistryError> {
        let mut ids = Vec::with_capacity(Configuration::ALL.len());
        for config in Configuration::ALL {
            let (role, settings) = configs(config);
            let id = self.id(&role)?;
            graph.insert(
                id.clone(),
                Object::BuildConfiguration(BuildConfiguration {
                    name: config,
                    settings,
                }),
            );
            ids.push(id);
        }
        let list_id = self.id(list_role)?;
        graph.insert(
            list_id.clone(),
            Object::ConfigurationList(ConfigurationList {
                owner_isa,
                owner_name: owner_name.to_owned(),
                configurations: ids,
                default_configuration: Configuration::DEFAULT,
            }),
        );
        Ok(list_id)
    }
}

/// Assemble the typed object graph for `bp` from the tokens in `registry`.
///
/// Fails with [`RegistryError::UnknownRole`] when the registry was not
/// allocated from [`required_roles`] of the same blueprint.
pub fn build_graph(
    bp: &NormalizedBlueprint,
    registry: &TokenRegistry,
) -> Result<ObjectGraph, RegistryError> {
    let planner = Planner { registry };
    let project_id = planner.id(&roles::project())?;
    let mut graph = ObjectGraph::new(bp.object_version, project_id.clone());

    // Source-tree files.
    let mut group_children = Vec::new();
    for path in bp.group_files() {
        let id = planner.id(&roles::file(path))?;
        graph.insert(
            id.clone(),
            Object::FileReference(FileReference {
                path: path.to_owned(),
                kind: FileKind::LastKnown(last_known_file_type(path)),
                source_tree: SourceTree::Group,
            }),
        );
        group_children.push(id);
    }

    // Build files, shared by every target's phases.
    let mut phase_files: Vec<(PhaseKind, Vec<ObjectId>)> = Vec::new();
    let frameworks: &[String] = &[];
    for (kind, paths) in [
        (PhaseKind::Sources, bp.sources.as_slice()),
        (PhaseKind::Frameworks, frameworks),
        (PhaseKind::Resources, bp.resources.as_slice()),
    ] {
        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            let id = planner.id(&roles::build_file(kind, path))?;
            graph.insert(
                id.clone(),
                Object::BuildFile(BuildFile {
                    file_ref: planner.id(&roles::file(path))?,
                    file_name: path.to_owned(),
                    phase: kind,
                }),
            );
            ids.push(id);
        }
        phase_files.push((kind, ids));
    }

    let mut target_ids = Vec::with_capacity(bp.targets.len());
    let mut product_ids = Vec::with_capacity(bp.targets.len());
    for target in &bp.targets {
        let name = target.name.as_str();

        let product_id = planner.id(&roles::product(name))?;
        graph.insert(
            product_id.clone(),
            Object::FileReference(FileReference {
                path: target.product_file(),
                kind: FileKind::Product(APPLICATION_PRODUCT_TYPE),
                source_tree: SourceTree::BuiltProductsDir,
            }),
        );

        let mut phases = Vec::with_capacity(phase_files.len());
        for (kind, files) in &phase_files {
            let id = planner.id(&roles::phase(name, *kind))?;
            graph.insert(
                id.clone(),
                Object::BuildPhase(BuildPhase {
                    kind: *kind,
                    files: files.clone(),
                }),
            );
            phases.push(id);
        }

        let settings = target_settings(bp, target);
        let list_id = planner.configuration_list(
            &mut graph,
            &roles::target_config_list(name),
            Isa::NativeTarget,
            name,
            |config| (roles::target_config(name, config), settings.clone()),
        )?;

        let target_id = planner.id(&roles::target(name))?;
        graph.insert(
            target_id.clone(),
            Object::NativeTarget(NativeTarget {
                name: name.to_owned(),
                product_name: name.to_owned(),
                configuration_list: list_id,
                phases,
                product_reference: product_id.clone(),
                product_type: APPLICATION_PRODUCT.to_owned(),
            }),
        );
        debug!("planned {} target '{name}'", target.platform);
        target_ids.push(target_id);
        product_ids.push(product_id);
    }

    let source_group = planner.id(&roles::source_group())?;
    graph.insert(
        source_group.clone(),
        Object::Group(Group {
            name: None,
            path: Some(bp.group_path.clone()),
            children: group_children,
        }),
    );
    let products_group = planner.id(&roles::products_group())?;
    graph.insert(
        products_group.clone(),
        Object::Group(Group {
            name: Some("Products".to_owned()),
            path: None,
            children: product_ids,
        }),
    );
    let root_group = planner.id(&roles::root_group())?;
    graph.insert(
        root_group.clone(),
        Object::Group(Group {
            name: None,
            path: None,
            children: vec![source_group, products_group.clone()],
        }),
    );

    let project_list = planner.configuration_list(
        &mut graph,
        &roles::project_config_list(),
        Isa::Project,
        &bp.name,
        |config| {
            (
                roles::project_config(config),
                project_settings(bp, config),
            )
        },
    )?;

    let target_attributes = match &bp.created_on_tools_version {
        Some(version) => target_ids
            .iter()
            .map(|id| (id.clone(), version.clone()))
            .collect(),
        None => Vec::new(),
    };
    graph.insert(
        project_id,
        Object::Project(Project {
            last_upgrade_check: bp.last_upgrade_check.clone(),
            target_attributes,
            configuration_list: project_list,
            compatibility_version: bp.compatibility_version.clone(),
            development_region: bp.development_region.clone(),
            known_regions: bp.known_regions.clone(),
            main_group: root_group,
            product_ref_group: products_group,
            targets: target_ids,
        }),
    );

    debug!("object graph built with {} objects", graph.len());
    Ok(graph)
}
