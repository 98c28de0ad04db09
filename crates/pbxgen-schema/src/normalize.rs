use crate::blueprint::{BlueprintError, BlueprintV1};
use crate::settings::{BuildSettings, Platform};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Validated, trimmed blueprint with every default resolved.
///
/// File lists keep their declared order, which becomes the order of the
/// source group and of every build phase. This is the input to graph planning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedBlueprint {
    pub name: String,
    pub object_version: u32,
    pub compatibility_version: String,
    pub development_region: String,
    pub known_regions: Vec<String>,
    pub last_upgrade_check: String,
    pub created_on_tools_version: Option<String>,
    pub project_settings: BuildSettings,
    pub group_path: String,
    pub sources: Vec<String>,
    pub resources: Vec<String>,
    pub info_plist: Option<String>,
    pub entitlements: Option<String>,
    pub info_plist_keys: BTreeMap<String, String>,
    pub targets: Vec<NormalizedTarget>,
}

/// A validated target declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedTarget {
    pub name: String,
    pub platform: Platform,
    pub bundle_identifier: String,
    /// Stem of the built `.app`; the project name unless declared.
    pub product_name: String,
    /// Whether `product_name` came from the blueprint rather than the default.
    pub declared_product_name: bool,
    pub deployment_target: Option<String>,
    pub marketing_version: String,
    pub swift_version: String,
    pub settings: BuildSettings,
}

impl NormalizedTarget {
    /// File name of the built product, e.g. `GetSh1tDone.app`.
    pub fn product_file(&self) -> String {
        format!("{}.app", self.product_name)
    }
}

impl NormalizedBlueprint {
    /// Every file that lives in the source group, in group order.
    pub fn group_files(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .chain(&self.resources)
            .chain(&self.info_plist)
            .chain(&self.entitlements)
            .map(String::as_str)
    }
}

impl BlueprintV1 {
    /// Normalize the blueprint: validate fields, trim strings, resolve defaults.
    pub fn normalize(&self) -> Result<NormalizedBlueprint, BlueprintError> {
        if self.blueprint_version != 1 {
            return Err(BlueprintError::UnsupportedVersion(self.blueprint_version));
        }

        let name = self.project.name.trim().to_owned();
        if name.is_empty() {
            return Err(BlueprintError::EmptyProjectName);
        }
        if !is_plain_file_name(&name) {
            return Err(BlueprintError::ProjectNameNotFileName(name));
        }

        let mut seen_files = HashSet::new();
        let sources = normalize_file_list(&self.files.sources, &mut seen_files)?;
        let resources = normalize_file_list(&self.files.resources, &mut seen_files)?;
        let info_plist = normalize_optional_file(self.files.info_plist.as_deref(), &mut seen_files)?;
        let entitlements =
            normalize_optional_file(self.files.entitlements.as_deref(), &mut seen_files)?;

        let group_path = self
            .files
            .group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(name.as_str())
            .to_owned();

        if self.targets.is_empty() {
            return Err(BlueprintError::NoTargets);
        }
        let mut target_names = HashSet::new();
        let mut targets = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let target_name = target.name.trim().to_owned();
            if target_name.is_empty() {
                return Err(BlueprintError::EmptyTargetName);
            }
            if !target_names.insert(target_name.clone()) {
                return Err(BlueprintError::DuplicateTarget(target_name));
            }
            let bundle_identifier = target.bundle_identifier.trim().to_owned();
            if bundle_identifier.is_empty() {
                return Err(BlueprintError::EmptyBundleIdentifier(target_name));
            }
            let declared = trimmed_non_empty(target.product_name.as_deref());
            let declared_product_name = declared.is_some();
            let product_name = declared.unwrap_or_else(|| name.clone());
            targets.push(NormalizedTarget {
                name: target_name,
                platform: target.platform,
                bundle_identifier,
                product_name,
                declared_product_name,
                deployment_target: trimmed_non_empty(target.deployment_target.as_deref()),
                marketing_version: target.marketing_version.trim().to_owned(),
                swift_version: target.swift_version.trim().to_owned(),
                settings: target.settings.clone(),
            });
        }

        Ok(NormalizedBlueprint {
            name,
            object_version: self.project.object_version,
            compatibility_version: self.project.compatibility_version.trim().to_owned(),
            development_region: self.project.development_region.trim().to_owned(),
            known_regions: self
                .project
                .known_regions
                .iter()
                .map(|r| r.trim().to_owned())
                .filter(|r| !r.is_empty())
                .collect(),
            last_upgrade_check: self.project.last_upgrade_check.trim().to_owned(),
            created_on_tools_version: trimmed_non_empty(
                self.project.created_on_tools_version.as_deref(),
            ),
            project_settings: self.project.settings.clone(),
            group_path,
            sources,
            resources,
            info_plist,
            entitlements,
            info_plist_keys: self.info_plist_keys.clone(),
            targets,
        })
    }
}

/// The project name becomes `<name>.xcodeproj` inside the output directory,
/// so it must not contain path separators or name a parent directory.
fn is_plain_file_name(name: &str) -> bool {
    name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn trimmed_non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn normalize_file(path: &str, seen: &mut HashSet<String>) -> Result<String, BlueprintError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(BlueprintError::EmptyFilePath);
    }
    if !seen.insert(trimmed.to_owned()) {
        return Err(BlueprintError::DuplicateFile(trimmed.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn normalize_file_list(
    values: &[String],
    seen: &mut HashSet<String>,
) -> Result<Vec<String>, BlueprintError> {
    values.iter().map(|v| normalize_file(v, seen)).collect()
}

fn normalize_optional_file(
    value: Option<&str>,
    seen: &mut HashSet<String>,
) -> Result<Option<String>, BlueprintError> {
    value.map(|v| normalize_file(v, seen)).transpose()
}
