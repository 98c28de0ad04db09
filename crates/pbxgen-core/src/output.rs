use crate::CoreError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `content` to `path`, creating the parent directory when missing.
///
/// The bytes go to a temporary file next to `path`, which is synced and then
/// renamed over the destination. An existing file is replaced; a failed write
/// leaves it untouched.
pub fn write_output(path: &Path, content: &str) -> Result<(), CoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;
    debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
