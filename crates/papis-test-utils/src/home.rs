//! [`ConfigHome`] builder for configuration test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary home directory with a papis configuration folder inside it.
///
/// # Example
///
/// ```rust,no_run
/// use papis_test_utils::ConfigHome;
///
/// let home = ConfigHome::new();
/// let papers = home.create_library_dir("papers");
/// home.write_config(&format!("[papers]\ndir = {}\n", papers.display()));
/// home.assert_file_contains(".config/papis/config", "[papers]");
/// ```
pub struct ConfigHome {
    temp_dir: TempDir,
}

impl Default for ConfigHome {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigHome {
    /// Create an empty temporary home directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary home.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The XDG configuration home (`<root>/.config`).
    pub fn xdg_config_home(&self) -> PathBuf {
        self.root().join(".config")
    }

    /// The papis configuration folder (`<root>/.config/papis`).
    pub fn config_dir(&self) -> PathBuf {
        self.xdg_config_home().join("papis")
    }

    /// The primary configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config")
    }

    /// Write the primary configuration file, creating its folder.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_file();
        fs::create_dir_all(self.config_dir()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `content` to `path` relative to the root, creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Create a library folder `<root>/libraries/<name>` and return its path.
    pub fn create_library_dir(&self, name: &str) -> PathBuf {
        let dir = self.root().join("libraries").join(name);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("create_library_dir: failed to create {name}: {e}"));
        dir
    }

    /// Read a file relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
