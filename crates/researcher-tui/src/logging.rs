use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// Where log lines go. The interactive UI owns the terminal, so it logs to a file.
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// `RUST_LOG` wins; otherwise `level` applies to this workspace's crates only
fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.unwrap_or(DEFAULT_LEVEL);
        EnvFilter::new(format!("researcher_tui={level},researcher_core={level}"))
    })
}

pub fn init(level: Option<&str>, target: LogTarget) -> Result<()> {
    let filter = build_filter(level);

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|err| anyhow!("failed to initialize logging: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_target_creates_log_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("researcher.log");

        init(Some("debug"), LogTarget::File(path.clone())).unwrap();
        tracing::info!("hello from the test");

        assert!(path.exists());
        // A second global subscriber is refused
        assert!(init(None, LogTarget::Stderr).is_err());
    }
}
