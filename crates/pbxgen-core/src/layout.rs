use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "project.pbxproj";
const BUNDLE_EXTENSION: &str = "xcodeproj";

/// Where a generated project lands on disk.
///
/// `<output_dir>/<project name>.xcodeproj/project.pbxproj`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    project_name: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            project_name: project_name.into(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[inline]
    pub fn bundle_dir(&self) -> PathBuf {
        self.root
            .join(format!("{}.{BUNDLE_EXTENSION}", self.project_name))
    }

    #[inline]
    pub fn manifest_path(&self) -> PathBuf {
        self.bundle_dir().join(MANIFEST_FILE)
    }
}
