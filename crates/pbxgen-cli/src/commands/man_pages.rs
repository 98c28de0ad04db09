use super::{json_pretty, EXIT_SUCCESS, OUTPUT_PREFIX};
use clap::{Command, CommandFactory};
use std::fs;
use std::path::{Path, PathBuf};

const BIN: &str = "pbxgen";

fn render_page(cmd: Command) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .map_err(|e| format!("man page render failed: {e}"))?;
    Ok(buf)
}

fn write_page(dir: &Path, stem: &str, page: &[u8]) -> Result<PathBuf, String> {
    let path = dir.join(format!("{stem}.1"));
    fs::write(&path, page)
        .map_err(|e| format!("{OUTPUT_PREFIX} failed to write {}: {e}", path.display()))?;
    Ok(path)
}

/// Write `pbxgen.1` plus one `pbxgen-<sub>.1` page per subcommand into `dir`.
pub fn write_all(cmd: &Command, dir: &Path) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("{OUTPUT_PREFIX} failed to create {}: {e}", dir.display()))?;
    let mut written = vec![write_page(dir, BIN, &render_page(cmd.clone())?)?];
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        let stem = format!("{BIN}-{}", sub.get_name());
        let page = render_page(sub.clone())?;
        written.push(write_page(dir, &stem, &page)?);
    }
    Ok(written)
}

pub fn run<C: CommandFactory>(dir: &Path, json: bool) -> Result<u8, String> {
    let written = write_all(&C::command(), dir)?;
    if json {
        let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        println!("{}", json_pretty(&serde_json::json!({ "pages": paths }))?);
    } else {
        println!("{} man pages written to {}", written.len(), dir.display());
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_page_per_subcommand() {
        let cmd = Command::new(BIN)
            .subcommand(Command::new("generate"))
            .subcommand(Command::new("check"));
        let dir = tempfile::tempdir().unwrap();
        let written = write_all(&cmd, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(dir.path().join("pbxgen.1").exists());
        assert!(dir.path().join("pbxgen-generate.1").exists());
        assert!(dir.path().join("pbxgen-check.1").exists());
    }
}
