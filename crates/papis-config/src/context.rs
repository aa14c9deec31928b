//! The configuration context every command resolves settings through
//!
//! A [`ConfigContext`] owns the default registry, the loaded configuration
//! and the current library. The loaded configuration and the library are
//! built lazily on first use.
//!
//! # Resolution order
//!
//! For `get(key, Some(section))` the loaded configuration is probed at
//!
//! 1. `[settings] <section>-<key>`
//! 2. `[<section>] <key>`
//! 3. `[<current library>] <section>-<key>`
//!
//! and the **last** hit wins, so library overrides beat domain sections,
//! which beat the general section. Without a hit the registered default for
//! `(section, key)` is returned.

use std::fmt;
use std::path::PathBuf;

use crate::defaults::{DefaultSettings, GENERAL_SECTION, SectionDefaults};
use crate::library::{Library, existing_path};
use crate::loader::Configuration;
use crate::paths::ConfigPaths;
use crate::{Error, Result, Value, ValueKind};

const LOCAL_CONFIG_KEY: &str = "local-config-file";
const DEFAULT_LIBRARY_KEY: &str = "default-library";

/// Process configuration state, passed explicitly to whoever needs settings.
#[derive(Debug)]
pub struct ConfigContext {
    paths: ConfigPaths,
    defaults: DefaultSettings,
    configuration: Option<Configuration>,
    library: Option<Library>,
    local_dir: Option<PathBuf>,
}

impl ConfigContext {
    /// A context reading from `paths`, with the built-in defaults.
    ///
    /// The local configuration file is looked up in the current directory.
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            paths,
            defaults: DefaultSettings::with_builtins(),
            configuration: None,
            library: None,
            local_dir: std::env::current_dir().ok(),
        }
    }

    /// A context using the locations found in the process environment.
    pub fn discover() -> Self {
        Self::new(ConfigPaths::discover())
    }

    /// Look for the local configuration file in `dir` instead of the
    /// current directory, or nowhere when `None`.
    pub fn with_local_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.local_dir = dir;
        self
    }

    /// Replace the default registry.
    pub fn with_defaults(mut self, defaults: DefaultSettings) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn defaults(&self) -> &DefaultSettings {
        &self.defaults
    }

    /// Register additional default settings.
    pub fn register_default_settings<I, S>(&mut self, settings: I)
    where
        I: IntoIterator<Item = (S, SectionDefaults)>,
        S: Into<String>,
    {
        self.defaults.register(settings);
    }

    /// Registered default for `key` in `section` (general section if `None`).
    pub fn get_default(&self, key: &str, section: Option<&str>) -> Result<&Value> {
        self.defaults.get(key, section)
    }

    /// The loaded configuration, reading it from disk on first access.
    pub fn configuration(&mut self) -> Result<&mut Configuration> {
        let config = match self.configuration.take() {
            Some(config) => config,
            None => self.load_configuration()?,
        };
        Ok(self.configuration.insert(config))
    }

    fn load_configuration(&self) -> Result<Configuration> {
        tracing::debug!("Creating configuration");
        let mut config = Configuration::load(&self.paths)?;
        if let Some(dir) = &self.local_dir {
            if let Some(name) = local_config_name(&config, self.fallback_local_name()) {
                config.merge_from_path(&dir.join(name))?;
            }
        }
        Ok(config)
    }

    fn fallback_local_name(&self) -> Option<String> {
        self.defaults
            .get(LOCAL_CONFIG_KEY, None)
            .ok()
            .map(|v| v.to_string())
    }

    /// Drop the loaded configuration and read it again from disk.
    ///
    /// A current library is resolved again against the fresh configuration,
    /// so its local configuration file and, for a folder given by path, its
    /// section are restored.
    pub fn reset_configuration(&mut self) -> Result<&mut Configuration> {
        if self.configuration.take().is_some() {
            tracing::warn!("Overwriting previous configuration");
        }
        tracing::debug!("Resetting configuration");
        if let Some(library) = self.library.take() {
            let library = self.resolve_library(library.name())?;
            self.library = Some(library);
        }
        self.configuration()
    }

    /// Persist the loaded configuration to the primary file.
    pub fn save(&mut self) -> Result<()> {
        self.configuration()?.save()
    }

    /// Make `identifier` the current library.
    ///
    /// `identifier` is either the name of a library section or, failing
    /// that, an existing folder which becomes a single-folder library.
    pub fn set_lib(&mut self, identifier: &str) -> Result<&Library> {
        let library = self.resolve_library(identifier)?;
        let library: &Library = self.library.insert(library);
        Ok(library)
    }

    /// The current library, defaulting to the registry's `default-library`.
    pub fn get_lib(&mut self) -> Result<&Library> {
        let library = match self.library.take() {
            Some(library) => library,
            None => {
                let name = self.defaults.get(DEFAULT_LIBRARY_KEY, None)?.to_string();
                self.resolve_library(&name)?
            }
        };
        let library: &Library = self.library.insert(library);
        Ok(library)
    }

    fn resolve_library(&mut self, identifier: &str) -> Result<Library> {
        let fallback_local = self.fallback_local_name();
        let config = self.configuration()?;

        let library = if config.has_section(identifier) {
            Library::from_settings(
                identifier,
                config.get(identifier, "dir"),
                config.get(identifier, "dirs"),
            )?
        } else if let Some(path) = existing_path(identifier) {
            tracing::warn!(
                path = identifier,
                "Since the path exists, interpreting it as a library"
            );
            let library = Library::from_paths(vec![path]);
            config.set(library.name(), "dir", library.path_format());
            library
        } else {
            return Err(Error::LibraryNotFound {
                identifier: identifier.to_string(),
            });
        };

        if let Some(name) = local_config_name(config, fallback_local) {
            for dir in library.paths() {
                config.merge_from_path(&dir.join(&name))?;
            }
        }

        tracing::debug!(library = %library, "Library selected");
        Ok(library)
    }

    /// Store `value` as text under `key`, in `section` or the general section.
    ///
    /// The change is visible to every later lookup but only reaches disk
    /// through [`ConfigContext::save`].
    pub fn set(&mut self, key: &str, value: impl fmt::Display, section: Option<&str>) -> Result<()> {
        let section = section.unwrap_or(GENERAL_SECTION);
        self.configuration()?.set(section, key, value.to_string());
        Ok(())
    }

    /// Resolve `key` and coerce loaded text to `kind`.
    ///
    /// Registered defaults are returned with their own type.
    pub fn resolve(&mut self, key: &str, section: Option<&str>, kind: ValueKind) -> Result<Value> {
        let library = self.get_lib()?.name().to_string();
        let specialized = match section {
            Some(section) => format!("{section}-{key}"),
            None => key.to_string(),
        };

        let mut candidates = vec![(GENERAL_SECTION, specialized.as_str())];
        if let Some(section) = section {
            candidates.push((section, key));
        }
        candidates.push((library.as_str(), specialized.as_str()));

        let config = self.configuration()?;
        let hit = candidates
            .iter()
            .filter_map(|&(sec, k)| config.get(sec, k).map(|raw| (sec, k, raw.to_string())))
            .last();

        match hit {
            Some((sec, k, raw)) => kind.coerce(&raw).ok_or_else(|| Error::InvalidValue {
                section: sec.to_string(),
                key: k.to_string(),
                value: raw,
                expected: kind,
            }),
            None => self.defaults.get(key, section).cloned(),
        }
    }

    /// Resolve `key` without coercion: loaded text, or the default as registered.
    pub fn get(&mut self, key: &str, section: Option<&str>) -> Result<Value> {
        self.resolve(key, section, ValueKind::Text)
    }

    /// Resolve `key` as text. Non-text defaults are rendered; unset ones fail.
    pub fn get_string(&mut self, key: &str, section: Option<&str>) -> Result<String> {
        match self.get(key, section)? {
            Value::Text(s) => Ok(s),
            Value::Null => Err(Error::Unset {
                key: key.to_string(),
            }),
            other => Ok(other.to_string()),
        }
    }

    pub fn get_int(&mut self, key: &str, section: Option<&str>) -> Result<i64> {
        match self.resolve(key, section, ValueKind::Int)? {
            Value::Int(n) => Ok(n),
            other => Err(mismatch(key, ValueKind::Int, &other)),
        }
    }

    /// Integer defaults are widened to floats.
    pub fn get_float(&mut self, key: &str, section: Option<&str>) -> Result<f64> {
        match self.resolve(key, section, ValueKind::Float)? {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            other => Err(mismatch(key, ValueKind::Float, &other)),
        }
    }

    pub fn get_bool(&mut self, key: &str, section: Option<&str>) -> Result<bool> {
        match self.resolve(key, section, ValueKind::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(key, ValueKind::Bool, &other)),
        }
    }
}

/// Name of the local configuration file, if any is configured.
fn local_config_name(config: &Configuration, fallback: Option<String>) -> Option<String> {
    config
        .get(GENERAL_SECTION, LOCAL_CONFIG_KEY)
        .map(str::to_string)
        .or(fallback)
        .filter(|name| !name.is_empty())
}

fn mismatch(key: &str, expected: ValueKind, found: &Value) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
