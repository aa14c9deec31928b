//! Loading the configuration files from disk
//!
//! The loaded configuration is built from, in order (later files win):
//!
//! 1. the primary configuration file, bootstrapped on first use
//! 2. every file listed in its `[include]` section, recursively; files that
//!    cannot be read are skipped with a warning
//! 3. local override files merged in later via [`Configuration::merge_from_path`]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::GENERAL_SECTION;
use crate::ini::{IniDocument, Section};
use crate::paths::{ConfigPaths, expand_user};
use crate::{Error, Result, io};

/// Section whose values are paths of further configuration files.
pub const INCLUDE_SECTION: &str = "include";

/// Library written to a freshly created configuration file.
pub const BOOTSTRAP_LIBRARY: &str = "papers";
/// Folder of the bootstrap library.
pub const BOOTSTRAP_LIBRARY_DIR: &str = "~/Documents/papers";

/// The minimal configuration written when no file exists yet.
pub fn bootstrap_document() -> IniDocument {
    let mut doc = IniDocument::new();
    doc.set(BOOTSTRAP_LIBRARY, "dir", BOOTSTRAP_LIBRARY_DIR);
    doc.set(GENERAL_SECTION, "default-library", BOOTSTRAP_LIBRARY);
    doc
}

/// Settings read from the configuration files, kept as raw text.
#[derive(Debug, Clone)]
pub struct Configuration {
    doc: IniDocument,
    paths: ConfigPaths,
}

impl Configuration {
    /// An empty configuration not yet backed by any file.
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            doc: IniDocument::new(),
            paths,
        }
    }

    /// Load the primary configuration file and everything it includes.
    ///
    /// The configuration and scripts folders are created if missing. When the
    /// primary file does not exist it is written with [`bootstrap_document`].
    pub fn load(paths: &ConfigPaths) -> Result<Self> {
        if !paths.dir.exists() {
            tracing::warn!(dir = ?paths.dir, "Creating configuration folder");
        }
        io::ensure_dir(&paths.dir)?;
        io::ensure_dir(&paths.scripts)?;

        let mut config = Self::new(paths.clone());
        if paths.file.is_file() {
            let mut visited = HashSet::new();
            config.read_with_includes(&paths.file, &mut visited)?;
        } else {
            tracing::debug!(file = ?paths.file, "Writing initial configuration file");
            config.doc = bootstrap_document();
            config.save()?;
        }
        Ok(config)
    }

    /// Merge another configuration file on top of this one.
    ///
    /// A missing file is silently ignored. Files it includes are merged too.
    pub fn merge_from_path(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        tracing::debug!(?path, "Merging configuration");
        let mut visited = HashSet::new();
        self.read_optional_layer(path, &mut visited)
    }

    /// Read a file that may be absent or unreadable; I/O failures are skipped.
    fn read_optional_layer(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Result<()> {
        match self.read_with_includes(path, visited) {
            Err(Error::Io { path, source }) => {
                tracing::warn!(?path, error = %source, "Could not read configuration, skipping");
                Ok(())
            }
            other => other,
        }
    }

    fn read_with_includes(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Result<()> {
        let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(identity) {
            tracing::warn!(?path, "Configuration file is included more than once, skipping");
            return Ok(());
        }

        let Some(text) = io::read_optional(path)? else {
            tracing::debug!(?path, "Included configuration not found, skipping");
            return Ok(());
        };
        tracing::debug!(?path, "Reading configuration");
        let doc = IniDocument::parse(&text, path)?;
        self.doc.merge(&doc);

        if let Some(includes) = doc.section(INCLUDE_SECTION) {
            for (name, target) in includes.iter() {
                tracing::debug!(include = name, path = target, "Including configuration");
                self.read_optional_layer(&expand_user(target), visited)?;
            }
        }
        Ok(())
    }

    /// Write the configuration back to the primary file.
    pub fn save(&self) -> Result<()> {
        tracing::debug!(file = ?self.paths.file, "Saving configuration");
        io::write_atomic(&self.paths.file, self.doc.to_ini_string().as_bytes())
    }

    /// Raw value of `key` in `section`, with `[DEFAULT]` fallback.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.doc.get(section, key)
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.doc.set(section, key, value);
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.doc.has_section(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.doc.section(name)
    }

    /// Names of the sections that describe a library.
    pub fn library_names(&self) -> Vec<&str> {
        self.doc
            .sections()
            .filter(|s| s.contains_key("dir") || s.contains_key("dirs"))
            .map(Section::name)
            .collect()
    }

    pub fn document(&self) -> &IniDocument {
        &self.doc
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn file_location(&self) -> &Path {
        &self.paths.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn paths_in(temp: &TempDir) -> ConfigPaths {
        ConfigPaths::in_dir(temp.path().join("papis"))
    }

    #[test]
    fn load_bootstraps_missing_file_and_folders() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);

        let config = Configuration::load(&paths).unwrap();

        assert!(paths.scripts.is_dir());
        assert_eq!(config.get(GENERAL_SECTION, "default-library"), Some("papers"));
        assert_eq!(config.get("papers", "dir"), Some("~/Documents/papers"));
        assert_eq!(
            fs::read_to_string(&paths.file).unwrap(),
            "[papers]\ndir = ~/Documents/papers\n\n[settings]\ndefault-library = papers\n\n"
        );
    }

    #[test]
    fn load_reads_existing_file_without_rewriting_it() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        fs::create_dir_all(&paths.dir).unwrap();
        let content = "[settings]\n# keep me\neditor = vim\n";
        fs::write(&paths.file, content).unwrap();

        let config = Configuration::load(&paths).unwrap();

        assert_eq!(config.get(GENERAL_SECTION, "editor"), Some("vim"));
        assert!(!config.has_section("papers"));
        assert_eq!(fs::read_to_string(&paths.file).unwrap(), content);
    }

    #[test]
    fn included_file_overrides_primary() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        fs::create_dir_all(&paths.dir).unwrap();
        let extra = temp.path().join("extra.ini");
        fs::write(&extra, "[settings]\nk = 2\n").unwrap();
        fs::write(
            &paths.file,
            format!("[settings]\nk = 1\n\n[include]\nextra = {}\n", extra.display()),
        )
        .unwrap();

        let config = Configuration::load(&paths).unwrap();
        assert_eq!(config.get(GENERAL_SECTION, "k"), Some("2"));
    }

    #[test]
    fn include_cycle_terminates() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        fs::create_dir_all(&paths.dir).unwrap();
        let other = temp.path().join("other.ini");
        fs::write(
            &paths.file,
            format!("[settings]\na = 1\n\n[include]\nother = {}\n", other.display()),
        )
        .unwrap();
        fs::write(
            &other,
            format!("[settings]\nb = 2\n\n[include]\nback = {}\n", paths.file.display()),
        )
        .unwrap();

        let config = Configuration::load(&paths).unwrap();
        assert_eq!(config.get(GENERAL_SECTION, "a"), Some("1"));
        assert_eq!(config.get(GENERAL_SECTION, "b"), Some("2"));
    }

    #[test]
    fn missing_include_is_skipped() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        fs::create_dir_all(&paths.dir).unwrap();
        fs::write(&paths.file, "[include]\ngone = /definitely/not/here.ini\n").unwrap();

        assert!(Configuration::load(&paths).is_ok());
    }

    #[test]
    fn unreadable_include_is_skipped() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        fs::create_dir_all(&paths.dir).unwrap();
        let folder = temp.path().join("not-a-file");
        fs::create_dir_all(&folder).unwrap();
        fs::write(
            &paths.file,
            format!("[settings]\nk = 1\n\n[include]\nfolder = {}\n", folder.display()),
        )
        .unwrap();

        let config = Configuration::load(&paths).unwrap();
        assert_eq!(config.get(GENERAL_SECTION, "k"), Some("1"));
    }

    #[test]
    fn unreadable_merge_path_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut config = Configuration::new(paths_in(&temp));
        config.set(GENERAL_SECTION, "k", "1");

        config.merge_from_path(temp.path()).unwrap();
        assert_eq!(config.get(GENERAL_SECTION, "k"), Some("1"));
    }

    #[test]
    fn merge_from_missing_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut config = Configuration::new(paths_in(&temp));
        config.set(GENERAL_SECTION, "k", "1");

        config.merge_from_path(&temp.path().join("absent")).unwrap();
        assert_eq!(config.get(GENERAL_SECTION, "k"), Some("1"));
    }

    #[test]
    fn library_names_lists_sections_with_folders() {
        let temp = TempDir::new().unwrap();
        let mut config = Configuration::new(paths_in(&temp));
        config.set(GENERAL_SECTION, "editor", "vim");
        config.set("papers", "dir", "~/p");
        config.set("books", "dirs", "['~/b']");
        assert_eq!(config.library_names(), vec!["papers", "books"]);
    }

    #[test]
    fn save_round_trips_through_load() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        let mut config = Configuration::load(&paths).unwrap();
        config.set("tui", "editmode", "vi");
        config.save().unwrap();

        let reloaded = Configuration::load(&paths).unwrap();
        assert_eq!(reloaded.get("tui", "editmode"), Some("vi"));
        assert_eq!(reloaded.document(), config.document());
    }
}
