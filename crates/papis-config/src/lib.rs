//! Layered configuration for papis
//!
//! Settings come from three layers, highest priority first:
//!
//! - values set in-process or read from configuration files, where a
//!   library section overrides a domain section, which overrides the
//!   general `[settings]` section
//! - the registry of default settings, extensible by other components
//!
//! # Example
//!
//! ```no_run
//! use papis_config::{ConfigContext, ConfigPaths};
//!
//! let mut ctx = ConfigContext::new(ConfigPaths::discover());
//! ctx.set_lib("papers")?;
//! let editor = ctx.get_string("editor", None)?;
//! let height = ctx.get_int("info_window_height", Some("tui"))?;
//! # Ok::<(), papis_config::Error>(())
//! ```

pub mod context;
pub mod defaults;
pub mod error;
pub mod ini;
pub mod io;
pub mod library;
pub mod loader;
pub mod paths;
pub mod value;

pub use context::ConfigContext;
pub use defaults::{DefaultSettings, GENERAL_SECTION, SectionDefaults, section_defaults};
pub use error::{Error, Result};
pub use ini::{IniDocument, Section};
pub use library::Library;
pub use loader::Configuration;
pub use paths::{ConfigPaths, expand_user};
pub use value::{Value, ValueKind};
