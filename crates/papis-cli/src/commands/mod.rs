//! Command implementations for papis-cli

pub mod config;
pub mod defaults;
pub mod libs;
pub mod save;

pub use config::run_config;
pub use defaults::run_defaults;
pub use libs::run_libs;
pub use save::run_save;

use papis_config::{ConfigContext, ConfigPaths, expand_user};

use crate::cli::Cli;
use crate::error::Result;

/// Build the configuration context for this invocation.
///
/// Applies `--config`, then `--lib`, then every `--set` override.
pub fn build_context(cli: &Cli) -> Result<ConfigContext> {
    let mut paths = ConfigPaths::discover();
    if let Some(file) = &cli.config {
        paths = paths.with_config_file(expand_user(&file.to_string_lossy()));
    }
    let mut ctx = ConfigContext::new(paths);

    if let Some(lib) = &cli.lib {
        ctx.set_lib(lib)?;
    }
    apply_overrides(&mut ctx, cli.overrides())?;
    Ok(ctx)
}

/// Apply `(key, value)` overrides, keys optionally written as `section.key`.
pub fn apply_overrides<'a>(
    ctx: &mut ConfigContext,
    overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    for (key, value) in overrides {
        let (section, key) = split_key(key, None);
        tracing::debug!(?section, key, value, "Applying override");
        ctx.set(key, value, section)?;
    }
    Ok(())
}

/// Split `section.key` notation.
///
/// With an explicit `section` the key is taken verbatim, since keys such as
/// `options_list.selected_margin_style` contain dots themselves.
pub fn split_key<'a>(key: &'a str, section: Option<&'a str>) -> (Option<&'a str>, &'a str) {
    if section.is_some() {
        return (section, key);
    }
    match key.split_once('.') {
        Some((sec, key)) if !sec.is_empty() && !key.is_empty() => (Some(sec), key),
        _ => (None, key),
    }
}
