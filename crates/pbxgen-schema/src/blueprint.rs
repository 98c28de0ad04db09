use crate::settings::{BuildSettings, Platform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("failed to read blueprint file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse blueprint: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("failed to serialize blueprint: {0}")]
    SerializeToml(#[from] toml::ser::Error),
    #[error("unsupported blueprint_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("project.name must not be empty")]
    EmptyProjectName,
    #[error("project.name '{0}' must be a plain file name without path separators or '..'")]
    ProjectNameNotFileName(String),
    #[error("blueprint declares no targets")]
    NoTargets,
    #[error("target name must not be empty")]
    EmptyTargetName,
    #[error("duplicate target name '{0}'")]
    DuplicateTarget(String),
    #[error("bundle_identifier of target '{0}' must not be empty")]
    EmptyBundleIdentifier(String),
    #[error("file path must not be empty")]
    EmptyFilePath,
    #[error("file '{0}' is listed more than once")]
    DuplicateFile(String),
}

/// Version 1 of the TOML project description a manifest is generated from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BlueprintV1 {
    pub blueprint_version: u32,
    pub project: ProjectSection,
    #[serde(default)]
    pub files: FilesSection,
    #[serde(default)]
    pub info_plist_keys: BTreeMap<String, String>,
    #[serde(default)]
    pub targets: Vec<TargetSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,
    #[serde(default = "default_object_version")]
    pub object_version: u32,
    #[serde(default = "default_compatibility_version")]
    pub compatibility_version: String,
    #[serde(default = "default_development_region")]
    pub development_region: String,
    #[serde(default = "default_known_regions")]
    pub known_regions: Vec<String>,
    #[serde(default = "default_last_upgrade_check")]
    pub last_upgrade_check: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on_tools_version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BuildSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    /// Path of the source group, relative to the project directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_plist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    pub name: String,
    pub platform: Platform,
    pub bundle_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_target: Option<String>,
    #[serde(default = "default_marketing_version")]
    pub marketing_version: String,
    #[serde(default = "default_swift_version")]
    pub swift_version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BuildSettings,
}

fn default_object_version() -> u32 {
    56
}

fn default_compatibility_version() -> String {
    "Xcode 14.0".to_owned()
}

fn default_development_region() -> String {
    "en".to_owned()
}

fn default_known_regions() -> Vec<String> {
    vec!["en".to_owned(), "Base".to_owned()]
}

fn default_last_upgrade_check() -> String {
    "1500".to_owned()
}

fn default_marketing_version() -> String {
    "1.0".to_owned()
}

fn default_swift_version() -> String {
    "5.0".to_owned()
}

pub fn parse_blueprint_str(input: &str) -> Result<BlueprintV1, BlueprintError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_blueprint_file(path: impl AsRef<Path>) -> Result<BlueprintV1, BlueprintError> {
    let content = fs::read_to_string(path)?;
    parse_blueprint_str(&content)
}

impl BlueprintV1 {
    pub fn to_toml(&self) -> Result<String, BlueprintError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingValue;

    #[test]
    fn parses_full_blueprint() {
        let input = r#"
blueprint_version = 1

[project]
name = "Planner"
object_version = 60
created_on_tools_version = "15.0"

[project.settings]
SDKROOT = "iphoneos"

[files]
group = "Planner"
sources = ["PlannerApp.swift", "ContentView.swift"]
resources = ["Assets.xcassets"]
info_plist = "Info.plist"

[info_plist_keys]
NSRemindersUsageDescription = "Reads reminders."

[[targets]]
name = "Planner iOS"
platform = "ios"
bundle_identifier = "com.example.planner"
deployment_target = "17.0"

[targets.settings]
LD_RUNPATH_SEARCH_PATHS = ["$(inherited)", "@executable_path/Frameworks"]
"#;
        let bp = parse_blueprint_str(input).expect("should parse");
        assert_eq!(bp.blueprint_version, 1);
        assert_eq!(bp.project.name, "Planner");
        assert_eq!(bp.project.object_version, 60);
        assert_eq!(bp.files.sources.len(), 2);
        assert_eq!(bp.targets.len(), 1);
        assert_eq!(bp.targets[0].platform, Platform::Ios);
        assert_eq!(
            bp.project.settings.get("SDKROOT"),
            Some(&SettingValue::from("iphoneos"))
        );
        assert!(matches!(
            bp.targets[0].settings.get("LD_RUNPATH_SEARCH_PATHS"),
            Some(SettingValue::List(v)) if v.len() == 2
        ));
    }

    #[test]
    fn parses_minimal_blueprint_with_defaults() {
        let input = r#"
blueprint_version = 1

[project]
name = "Tiny"

[[targets]]
name = "Tiny"
platform = "macos"
bundle_identifier = "com.example.tiny"
"#;
        let bp = parse_blueprint_str(input).expect("should parse");
        assert_eq!(bp.project.object_version, 56);
        assert_eq!(bp.project.compatibility_version, "Xcode 14.0");
        assert_eq!(bp.project.known_regions, vec!["en", "Base"]);
        assert_eq!(bp.targets[0].marketing_version, "1.0");
        assert_eq!(bp.targets[0].swift_version, "5.0");
        assert!(bp.files.sources.is_empty());
    }

    #[test]
    fn rejects_unknown_fields() {
        let input = r#"
blueprint_version = 1

[project]
name = "Tiny"
unknown_field = true
"#;
        assert!(parse_blueprint_str(input).is_err());
    }

    #[test]
    fn rejects_unknown_platform() {
        let input = r#"
blueprint_version = 1

[project]
name = "Tiny"

[[targets]]
name = "Tiny"
platform = "watchos"
bundle_identifier = "com.example.tiny"
"#;
        assert!(parse_blueprint_str(input).is_err());
    }

    #[test]
    fn rejects_missing_project() {
        let input = r"
blueprint_version = 1
";
        assert!(parse_blueprint_str(input).is_err());
    }

    #[test]
    fn toml_roundtrip_preserves_blueprint() {
        let input = r#"
blueprint_version = 1

[project]
name = "Tiny"

[files]
sources = ["A.swift"]

[[targets]]
name = "Tiny"
platform = "ios"
bundle_identifier = "com.example.tiny"
"#;
        let bp = parse_blueprint_str(input).unwrap();
        let text = bp.to_toml().unwrap();
        assert_eq!(parse_blueprint_str(&text).unwrap(), bp);
    }

    #[test]
    fn reads_blueprint_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pbxgen.toml");
        fs::write(
            &path,
            "blueprint_version = 1\n[project]\nname = \"FromDisk\"\n",
        )
        .unwrap();
        let bp = parse_blueprint_file(&path).unwrap();
        assert_eq!(bp.project.name, "FromDisk");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_blueprint_file("/nonexistent/pbxgen.toml").unwrap_err();
        assert!(matches!(err, BlueprintError::Io(_)));
    }
}
