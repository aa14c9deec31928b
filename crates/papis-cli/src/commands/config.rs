//! Resolve and display settings

use colored::Colorize;
use papis_config::{ConfigContext, IniDocument, Value};
use serde_json::{Map, json};

use crate::commands::split_key;
use crate::error::Result;

/// Resolve each key, honouring `section.key` notation.
pub fn resolve_keys(
    ctx: &mut ConfigContext,
    keys: &[String],
    section: Option<&str>,
) -> Result<Vec<(String, Value)>> {
    keys.iter()
        .map(|raw| {
            let (section, key) = split_key(raw, section);
            let value = ctx.get(key, section)?;
            Ok((raw.clone(), value))
        })
        .collect()
}

/// Print resolved settings, or the whole loaded configuration without keys.
pub fn run_config(
    ctx: &mut ConfigContext,
    keys: &[String],
    section: Option<&str>,
    json: bool,
) -> Result<()> {
    if keys.is_empty() {
        let doc = ctx.configuration()?.document();
        if json {
            println!("{}", serde_json::to_string_pretty(&document_json(doc))?);
        } else {
            print!("{}", doc.to_ini_string());
        }
        return Ok(());
    }

    let values = resolve_keys(ctx, keys, section)?;

    if json {
        let output: Map<_, _> = values
            .into_iter()
            .map(|(key, value)| (key, json!(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let [(_, value)] = values.as_slice() {
        println!("{value}");
        return Ok(());
    }
    for (key, value) in &values {
        if value.is_null() {
            println!("{} = {}", key.cyan(), "(unset)".dimmed());
        } else {
            println!("{} = {}", key.cyan(), value);
        }
    }
    Ok(())
}

/// The loaded document as `{section: {key: value}}`, `[DEFAULT]` included
/// when it has entries.
pub fn document_json(doc: &IniDocument) -> serde_json::Value {
    let sections = std::iter::once(doc.defaults())
        .filter(|d| !d.is_empty())
        .chain(doc.sections());

    let output: Map<_, _> = sections
        .map(|section| {
            let entries: Map<_, _> = section
                .iter()
                .map(|(k, v)| (k.to_string(), json!(v)))
                .collect();
            (section.name().to_string(), serde_json::Value::Object(entries))
        })
        .collect();
    serde_json::Value::Object(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use papis_config::ConfigPaths;
    use papis_test_utils::ConfigHome;

    fn context(home: &ConfigHome) -> ConfigContext {
        let papers = home.create_library_dir("papers");
        home.write_config(&format!(
            "[papers]\ndir = {}\n\n[tui]\neditmode = vi\n",
            papers.display()
        ));
        ConfigContext::new(ConfigPaths::in_dir(home.config_dir())).with_local_dir(None)
    }

    #[test]
    fn resolve_keys_mixes_notations() {
        let home = ConfigHome::new();
        let mut ctx = context(&home);

        let keys = vec!["tui.editmode".to_string(), "dir-umask".to_string()];
        let values = resolve_keys(&mut ctx, &keys, None).unwrap();

        assert_eq!(
            values,
            vec![
                ("tui.editmode".to_string(), Value::from("vi")),
                ("dir-umask".to_string(), Value::Int(0o755)),
            ]
        );
    }

    #[test]
    fn resolve_keys_uses_explicit_section() {
        let home = ConfigHome::new();
        let mut ctx = context(&home);

        let values = resolve_keys(&mut ctx, &["editmode".to_string()], Some("tui")).unwrap();
        assert_eq!(values[0].1, Value::from("vi"));
    }

    #[test]
    fn dotted_key_resolves_under_explicit_section() {
        let home = ConfigHome::new();
        let mut ctx = context(&home);

        let keys = vec!["options_list.selected_margin_style".to_string()];
        let values = resolve_keys(&mut ctx, &keys, Some("tui")).unwrap();
        assert_eq!(values[0].1, Value::from("bg:ansiblack fg:ansigreen"));
    }

    #[test]
    fn unknown_key_fails() {
        let home = ConfigHome::new();
        let mut ctx = context(&home);

        let result = run_config(&mut ctx, &["no-such-key".to_string()], None, false);
        assert!(result.is_err());
    }

    #[test]
    fn show_whole_configuration_runs() {
        let home = ConfigHome::new();
        let mut ctx = context(&home);
        assert!(run_config(&mut ctx, &[], None, false).is_ok());
        assert!(run_config(&mut ctx, &[], None, true).is_ok());
    }

    #[test]
    fn document_json_groups_by_section() {
        let mut doc = IniDocument::new();
        doc.set("DEFAULT", "use-git", "yes");
        doc.set("tui", "editmode", "vi");

        assert_eq!(
            document_json(&doc),
            json!({"DEFAULT": {"use-git": "yes"}, "tui": {"editmode": "vi"}})
        );
    }
}
