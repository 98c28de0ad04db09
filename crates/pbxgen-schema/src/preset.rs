use serde::Serialize;

/// A built-in blueprint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub blueprint: &'static str,
}

/// Preset used when none is named.
pub const DEFAULT_PRESET: &str = "multiplatform";

pub const BUILTIN_PRESETS: &[Preset] = &[
    Preset {
        name: "single",
        description: "GetSh1tDone as a single iOS app target",
        blueprint: r#"blueprint_version = 1

[project]
name = "GetSh1tDone"

[project.settings]
IPHONEOS_DEPLOYMENT_TARGET = "17.0"
MACOSX_DEPLOYMENT_TARGET = "14.0"
SDKROOT = "iphoneos"
SUPPORTED_PLATFORMS = "iphoneos iphonesimulator"
TARGETED_DEVICE_FAMILY = "1,2"

[files]
group = "GetSh1tDone"
sources = [
    "GetSh1tDoneApp.swift",
    "ContentView.swift",
    "RemindersManager.swift",
    "EisenhowerMatrixView.swift",
    "TaskQuadrant.swift",
    "PlanningView.swift",
    "TaskChallengeView.swift",
    "PrioritiesView.swift",
]
resources = ["Assets.xcassets"]
info_plist = "Info.plist"
entitlements = "GetSh1tDone.entitlements"

[info_plist_keys]
NSRemindersUsageDescription = "GetSh1tDone needs access to your reminders to help you organize tasks in the Eisenhower matrix."

[[targets]]
name = "GetSh1tDone"
platform = "ios"
bundle_identifier = "com.getsh1tdone.$(USER)"
"#,
    },
    Preset {
        name: "multiplatform",
        description: "GetSh1tDone with separate iOS and macOS app targets",
        blueprint: r#"blueprint_version = 1

[project]
name = "GetSh1tDone"
created_on_tools_version = "15.0"

[files]
group = "GetSh1tDone"
sources = [
    "GetSh1tDoneApp.swift",
    "ContentView.swift",
    "RemindersManager.swift",
    "EisenhowerMatrixView.swift",
    "TaskQuadrant.swift",
    "PlanningView.swift",
    "TaskChallengeView.swift",
    "PrioritiesView.swift",
]
resources = ["Assets.xcassets"]
info_plist = "Info.plist"
entitlements = "GetSh1tDone.entitlements"

[info_plist_keys]
NSRemindersUsageDescription = "GetSh1tDone needs access to your reminders to help you organize tasks in the Eisenhower matrix."

[[targets]]
name = "GetSh1tDone iOS"
platform = "ios"
bundle_identifier = "com.getsh1tdone.app.ios"
deployment_target = "17.0"

[[targets]]
name = "GetSh1tDone macOS"
platform = "macos"
bundle_identifier = "com.getsh1tdone.app.macos"
deployment_target = "14.0"
"#,
    },
];

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

pub fn list_presets() -> &'static [Preset] {
    BUILTIN_PRESETS
}

/// Comma-separated preset names, for error messages and help text.
pub fn preset_names() -> String {
    BUILTIN_PRESETS
        .iter()
        .map(|p| p.name)
        .collect::<Vec<_>>()
        .join(", ")
}
