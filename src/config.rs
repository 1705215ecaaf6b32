//! Runtime configuration resolved from flags and the environment.

use std::path::{Path, PathBuf};

/// Name of the directory created under `$HOME` when no data dir is given.
pub const DEFAULT_DIR_NAME: &str = ".pomo";
/// Log file written inside the data directory.
pub const LOG_FILE_NAME: &str = "pomo.log";

/// Resolved startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Suppress the completion bell.
    pub quiet: bool,
}

impl Config {
    /// Resolve from an explicit data dir (flag or `POMO_DIR`), falling back
    /// to `$HOME/.pomo`, then `./.pomo`.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: &str, quiet: bool) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| default_data_dir(std::env::var_os("HOME")));
        Config {
            data_dir,
            log_level: log_level.to_string(),
            quiet,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn default_data_dir(home: Option<std::ffi::OsString>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => Path::new(&home).join(DEFAULT_DIR_NAME),
        _ => PathBuf::from(".").join(DEFAULT_DIR_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/pomo-data")), "debug", true);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pomo-data"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pomo-data/pomo.log"));
        assert_eq!(config.log_level, "debug");
        assert!(config.quiet);
    }

    #[test]
    fn home_fallbacks() {
        assert_eq!(
            default_data_dir(Some("/home/ada".into())),
            PathBuf::from("/home/ada/.pomo")
        );
        assert_eq!(default_data_dir(Some("".into())), PathBuf::from("./.pomo"));
        assert_eq!(default_data_dir(None), PathBuf::from("./.pomo"));
    }
}
