//! Show the default settings registry

use colored::Colorize;
use papis_config::{ConfigContext, SectionDefaults};
use serde_json::{Map, json};

use crate::error::{CliError, Result};

/// Registered sections, optionally narrowed to one.
pub fn select_sections<'a>(
    ctx: &'a ConfigContext,
    section: Option<&str>,
) -> Result<Vec<(&'a str, &'a SectionDefaults)>> {
    let selected: Vec<_> = ctx
        .defaults()
        .sections()
        .filter(|(name, _)| section.is_none_or(|wanted| *name == wanted))
        .collect();
    match section {
        Some(name) if selected.is_empty() => Err(CliError::user(format!(
            "No default settings registered for section '{name}'"
        ))),
        _ => Ok(selected),
    }
}

pub fn run_defaults(ctx: &ConfigContext, section: Option<&str>, json: bool) -> Result<()> {
    let sections = select_sections(ctx, section)?;

    if json {
        let output: Map<_, _> = sections
            .iter()
            .map(|(name, defaults)| (name.to_string(), json!(defaults)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (name, defaults) in sections {
        println!("[{}]", name.bold());
        for (key, value) in defaults {
            if value.is_null() {
                println!("{} = {}", key, "(unset)".dimmed());
            } else {
                println!("{} = {}", key, value);
            }
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use papis_config::{ConfigPaths, GENERAL_SECTION, section_defaults};

    fn context() -> ConfigContext {
        ConfigContext::new(ConfigPaths::in_dir("/nonexistent/papis")).with_local_dir(None)
    }

    #[test]
    fn all_sections_general_first() {
        let mut ctx = context();
        ctx.register_default_settings([("scihub", section_defaults([("command", "open")]))]);

        let names: Vec<_> = select_sections(&ctx, None)
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec![GENERAL_SECTION, "tui", "scihub"]);
    }

    #[test]
    fn single_section() {
        let ctx = context();
        let sections = select_sections(&ctx, Some("tui")).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "tui");
        assert!(sections[0].1.contains_key("editmode"));
    }

    #[test]
    fn unknown_section_is_user_error() {
        let ctx = context();
        let err = select_sections(&ctx, Some("nope")).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn defaults_do_not_touch_disk() {
        let ctx = context();
        assert!(run_defaults(&ctx, None, false).is_ok());
        assert!(run_defaults(&ctx, Some("tui"), true).is_ok());
    }
}
