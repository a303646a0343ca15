//! Logger setup.
//!
//! The TUI owns stdout and stderr, so interactive runs log to a file.
//! Headless commands log to stderr. `RUST_LOG` picks the level.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target, WriteStyle};

const LOG_FILE: &str = "heroglow.log";

fn builder() -> Builder {
    Builder::from_env(Env::default().default_filter_or("info"))
}

/// Default log file location in the platform data directory.
pub fn default_log_path() -> PathBuf {
    heroglow_config::data_dir()
        .map(|dir| dir.join(LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

/// Append log records to `path`.
pub fn init_file(path: &Path) -> color_eyre::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    builder()
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .try_init()?;
    Ok(())
}

pub fn init_stderr() -> color_eyre::Result<()> {
    builder().target(Target::Stderr).try_init()?;
    Ok(())
}
