//! Build-setting values and the built-in setting tables.
//!
//! Project-level tables carry the compiler warning and optimisation defaults
//! Xcode writes for a new app project. Target-level tables carry the per-platform
//! app defaults. Blueprints layer their own keys on top of both.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Build settings, sorted by key as Xcode writes them.
pub type BuildSettings = BTreeMap<String, SettingValue>;

/// A build-setting value: a scalar or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[&str]> for SettingValue {
    fn from(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// The two build configurations every configuration list carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    pub const ALL: [Configuration; 2] = [Configuration::Debug, Configuration::Release];
    /// Configuration selected when none is specified.
    pub const DEFAULT: Configuration = Configuration::Release;

    pub fn as_str(self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apple platform a target builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Macos,
}

impl Platform {
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Macos => "macOS",
        }
    }

    /// `SDKROOT` and `SUPPORTED_PLATFORMS` a target pins next to its
    /// deployment target. macOS targets leave both to Xcode's defaults.
    pub fn sdk_settings(self) -> Option<(&'static str, &'static str)> {
        match self {
            Platform::Ios => Some(("iphoneos", "iphoneos iphonesimulator")),
            Platform::Macos => None,
        }
    }

    pub fn deployment_target_key(self) -> &'static str {
        match self {
            Platform::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
            Platform::Macos => "MACOSX_DEPLOYMENT_TARGET",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

const SHARED_PROJECT: &[(&str, &str)] = &[
    ("ALWAYS_SEARCH_USER_PATHS", "NO"),
    ("ASSETCATALOG_COMPILER_APPICON_NAME", "AppIcon"),
    ("ASSETCATALOG_COMPILER_GENERATE_SWIFT_ASSET_SYMBOL_EXTENSIONS", "YES"),
    ("CLANG_ANALYZER_NONNULL", "YES"),
    ("CLANG_ANALYZER_NUMBER_OBJECT_CONVERSION", "YES_AGGRESSIVE"),
    ("CLANG_CXX_LANGUAGE_STANDARD", "gnu++20"),
    ("CLANG_ENABLE_MODULES", "YES"),
    ("CLANG_ENABLE_OBJC_ARC", "YES"),
    ("CLANG_ENABLE_OBJC_WEAK", "YES"),
    ("CLANG_WARN_BLOCK_CAPTURE_AUTORELEASING", "YES"),
    ("CLANG_WARN_BOOL_CONVERSION", "YES"),
    ("CLANG_WARN_COMMA", "YES"),
    ("CLANG_WARN_CONSTANT_CONVERSION", "YES"),
    ("CLANG_WARN_DEPRECATED_OBJC_IMPLEMENTATIONS", "YES"),
    ("CLANG_WARN_DIRECT_OBJC_ISA_USAGE", "YES_ERROR"),
    ("CLANG_WARN_DOCUMENTATION_COMMENTS", "YES"),
    ("CLANG_WARN_EMPTY_BODY", "YES"),
    ("CLANG_WARN_ENUM_CONVERSION", "YES"),
    ("CLANG_WARN_INFINITE_RECURSION", "YES"),
    ("CLANG_WARN_INT_CONVERSION", "YES"),
    ("CLANG_WARN_NON_LITERAL_NULL_CONVERSION", "YES"),
    ("CLANG_WARN_OBJC_IMPLICIT_RETAIN_SELF", "YES"),
    ("CLANG_WARN_OBJC_LITERAL_CONVERSION", "YES"),
    ("CLANG_WARN_OBJC_ROOT_CLASS", "YES_ERROR"),
    ("CLANG_WARN_QUOTED_INCLUDE_IN_FRAMEWORK_HEADER", "YES"),
    ("CLANG_WARN_RANGE_LOOP_ANALYSIS", "YES"),
    ("CLANG_WARN_STRICT_PROTOTYPES", "YES"),
    ("CLANG_WARN_SUSPICIOUS_MOVE", "YES"),
    ("CLANG_WARN_UNGUARDED_AVAILABILITY", "YES_AGGRESSIVE"),
    ("CLANG_WARN_UNREACHABLE_CODE", "YES"),
    ("CLANG_WARN__DUPLICATE_METHOD_MATCH", "YES"),
    ("COPY_PHASE_STRIP", "NO"),
    ("ENABLE_STRICT_OBJC_MSGSEND", "YES"),
    ("ENABLE_USER_SCRIPT_SANDBOXING", "YES"),
    ("GCC_C_LANGUAGE_STANDARD", "gnu17"),
    ("GCC_NO_COMMON_BLOCKS", "YES"),
    ("GCC_WARN_64_TO_32_BIT_CONVERSION", "YES"),
    ("GCC_WARN_ABOUT_RETURN_TYPE", "YES_ERROR"),
    ("GCC_WARN_UNDECLARED_SELECTOR", "YES"),
    ("GCC_WARN_UNINITIALIZED_AUTOS", "YES_AGGRESSIVE"),
    ("GCC_WARN_UNUSED_FUNCTION", "YES"),
    ("GCC_WARN_UNUSED_VARIABLE", "YES"),
    ("LOCALIZATION_PREFERS_STRING_CATALOGS", "YES"),
    ("MTL_FAST_MATH", "YES"),
];

const DEBUG_PROJECT: &[(&str, &str)] = &[
    ("DEBUG_INFORMATION_FORMAT", "dwarf"),
    ("ENABLE_TESTABILITY", "YES"),
    ("GCC_DYNAMIC_NO_PIC", "NO"),
    ("GCC_OPTIMIZATION_LEVEL", "0"),
    ("MTL_ENABLE_DEBUG_INFO", "INCLUDE_SOURCE"),
    ("ONLY_ACTIVE_ARCH", "YES"),
    ("SWIFT_ACTIVE_COMPILATION_CONDITIONS", "DEBUG $(inherited)"),
    ("SWIFT_OPTIMIZATION_LEVEL", "-Onone"),
];

const RELEASE_PROJECT: &[(&str, &str)] = &[
    ("DEBUG_INFORMATION_FORMAT", "dwarf-with-dsym"),
    ("ENABLE_NS_ASSERTIONS", "NO"),
    ("MTL_ENABLE_DEBUG_INFO", "NO"),
    ("SWIFT_COMPILATION_MODE", "wholemodule"),
];

const COMMON_TARGET: &[(&str, &str)] = &[
    ("ASSETCATALOG_COMPILER_APPICON_NAME", "AppIcon"),
    ("ASSETCATALOG_COMPILER_GENERATE_SWIFT_ASSET_SYMBOL_EXTENSIONS", "YES"),
    ("CODE_SIGN_STYLE", "Automatic"),
    ("DEVELOPMENT_ASSET_PATHS", ""),
    ("ENABLE_PREVIEWS", "YES"),
    ("GENERATE_INFOPLIST_FILE", "YES"),
    ("PRODUCT_NAME", "$(TARGET_NAME)"),
    ("SWIFT_EMIT_LOC_STRINGS", "YES"),
];

const IOS_TARGET: &[(&str, &str)] = &[
    ("INFOPLIST_KEY_UIApplicationSceneManifest_Generation", "YES"),
    ("INFOPLIST_KEY_UIApplicationSupportsIndirectInputEvents", "YES"),
    ("INFOPLIST_KEY_UILaunchScreen_Generation", "YES"),
    (
        "INFOPLIST_KEY_UISupportedInterfaceOrientations",
        "UIInterfaceOrientationPortrait",
    ),
    (
        "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPad",
        "UIInterfaceOrientationPortrait UIInterfaceOrientationPortraitUpsideDown UIInterfaceOrientationLandscapeLeft UIInterfaceOrientationLandscapeRight",
    ),
    (
        "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPhone",
        "UIInterfaceOrientationPortrait UIInterfaceOrientationLandscapeLeft UIInterfaceOrientationLandscapeRight",
    ),
    ("TARGETED_DEVICE_FAMILY", "1,2"),
];

const MACOS_TARGET: &[(&str, &str)] = &[
    ("COMBINE_HIDPI_IMAGES", "YES"),
    ("CURRENT_PROJECT_VERSION", "1"),
    ("ENABLE_HARDENED_RUNTIME", "YES"),
    ("INFOPLIST_KEY_NSHumanReadableCopyright", ""),
];

fn insert_all(settings: &mut BuildSettings, table: &[(&str, &str)]) {
    for (key, value) in table {
        settings.insert((*key).to_owned(), SettingValue::from(*value));
    }
}

/// Project-level settings for one configuration.
pub fn project_defaults(config: Configuration) -> BuildSettings {
    let mut settings = BuildSettings::new();
    insert_all(&mut settings, SHARED_PROJECT);
    match config {
        Configuration::Debug => {
            insert_all(&mut settings, DEBUG_PROJECT);
            settings.insert(
                "GCC_PREPROCESSOR_DEFINITIONS".to_owned(),
                SettingValue::from(&["DEBUG=1", "$(inherited)"][..]),
            );
        }
        Configuration::Release => insert_all(&mut settings, RELEASE_PROJECT),
    }
    settings
}

/// Target-level app defaults for a platform. Identical for Debug and Release.
pub fn target_defaults(platform: Platform) -> BuildSettings {
    let mut settings = BuildSettings::new();
    insert_all(&mut settings, COMMON_TARGET);
    let runpath = match platform {
        Platform::Ios => {
            insert_all(&mut settings, IOS_TARGET);
            "@executable_path/Frameworks"
        }
        Platform::Macos => {
            insert_all(&mut settings, MACOS_TARGET);
            "@executable_path/../Frameworks"
        }
    };
    settings.insert(
        "LD_RUNPATH_SEARCH_PATHS".to_owned(),
        SettingValue::from(&["$(inherited)", runpath][..]),
    );
    settings
}
