//! Locating the configuration folder, file and scripts folder
//!
//! The folder is chosen from, in order:
//!
//! 1. `$XDG_CONFIG_DIRS/<dir>/papis` for every entry of `XDG_CONFIG_DIRS`
//! 2. `$XDG_CONFIG_HOME/papis` (or `~/.config/papis`)
//! 3. `~/.papis` for older installations
//!
//! The first existing folder wins; on a fresh install the XDG home folder
//! is used.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "papis";
const LEGACY_DIR: &str = ".papis";
const CONFIG_FILE: &str = "config";
const SCRIPTS_DIR: &str = "scripts";

/// Expand a leading `~` to the user's home directory.
pub fn expand_user(path: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    if path == "~" {
        home()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home().join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Base directory for user configuration files.
pub fn config_home(xdg_config_home: Option<&str>, home: &Path) -> PathBuf {
    match xdg_config_home.filter(|s| !s.is_empty()) {
        Some(xdg) => expand_user(xdg),
        None => home.join(".config"),
    }
}

/// Every folder the configuration may live in, highest priority first.
pub fn candidate_dirs(
    xdg_config_home: Option<&str>,
    xdg_config_dirs: Option<&str>,
    home: &Path,
) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = xdg_config_dirs
        .filter(|s| !s.is_empty())
        .map(|list| {
            list.split(':')
                .filter(|d| !d.is_empty())
                .map(|d| Path::new(d).join(APP_DIR))
                .collect()
        })
        .unwrap_or_default();
    dirs.push(config_home(xdg_config_home, home).join(APP_DIR));
    dirs.push(home.join(LEGACY_DIR));
    dirs
}

/// Where the configuration of this process lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Configuration folder
    pub dir: PathBuf,
    /// Primary configuration file
    pub file: PathBuf,
    /// Folder holding user scripts
    pub scripts: PathBuf,
}

impl ConfigPaths {
    /// Resolve locations from the process environment.
    pub fn discover() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let xdg_home = std::env::var("XDG_CONFIG_HOME").ok();
        let xdg_dirs = std::env::var("XDG_CONFIG_DIRS").ok();
        Self::discover_with(xdg_home.as_deref(), xdg_dirs.as_deref(), &home)
    }

    /// Resolve locations from explicit environment values.
    pub fn discover_with(
        xdg_config_home: Option<&str>,
        xdg_config_dirs: Option<&str>,
        home: &Path,
    ) -> Self {
        let dir = candidate_dirs(xdg_config_home, xdg_config_dirs, home)
            .into_iter()
            .find(|d| d.exists())
            .unwrap_or_else(|| config_home(xdg_config_home, home).join(APP_DIR));
        tracing::debug!(?dir, "Using configuration folder");
        Self::in_dir(dir)
    }

    /// Use `dir` as the configuration folder.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            file: dir.join(CONFIG_FILE),
            scripts: dir.join(SCRIPTS_DIR),
            dir,
        }
    }

    /// Override the primary configuration file, keeping the folders.
    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        tracing::debug!(file = ?self.file, "Overriding configuration file");
        self
    }
}
