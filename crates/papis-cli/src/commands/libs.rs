//! List configured libraries

use colored::Colorize;
use papis_config::{ConfigContext, Library};
use serde_json::json;

use crate::error::Result;

/// A library section as shown by `papis libs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    pub name: String,
    /// The library, or why its section could not be read.
    pub library: std::result::Result<Library, String>,
    pub current: bool,
}

/// Every library section of the loaded configuration, in file order.
pub fn collect_libraries(ctx: &mut ConfigContext) -> Result<Vec<LibraryEntry>> {
    let current = match ctx.get_lib() {
        Ok(lib) => Some(lib.name().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "No current library");
            None
        }
    };

    let config = ctx.configuration()?;
    let entries = config
        .library_names()
        .into_iter()
        .map(|name| LibraryEntry {
            name: name.to_string(),
            library: Library::from_settings(name, config.get(name, "dir"), config.get(name, "dirs"))
                .map_err(|e| e.to_string()),
            current: current.as_deref() == Some(name),
        })
        .collect();
    Ok(entries)
}

pub fn run_libs(ctx: &mut ConfigContext, json: bool) -> Result<()> {
    let entries = collect_libraries(ctx)?;

    if json {
        let output: Vec<_> = entries
            .iter()
            .map(|entry| match &entry.library {
                Ok(lib) => json!({
                    "name": entry.name,
                    "paths": lib.paths(),
                    "current": entry.current,
                }),
                Err(message) => json!({
                    "name": entry.name,
                    "error": message,
                    "current": entry.current,
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "(no libraries configured)".dimmed());
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.current {
            "*".green().bold()
        } else {
            " ".normal()
        };
        match &entry.library {
            Ok(lib) => println!("{} {:<16} {}", marker, entry.name.bold(), lib.path_format()),
            Err(message) => println!("{} {:<16} {}", marker, entry.name.bold(), message.red()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use papis_config::ConfigPaths;
    use papis_test_utils::ConfigHome;

    fn context(home: &ConfigHome, extra: &str) -> ConfigContext {
        let papers = home.create_library_dir("papers");
        let books = home.create_library_dir("books");
        home.write_config(&format!(
            "[settings]\neditor = vim\n\n[papers]\ndir = {}\n\n[books]\ndirs = ['{}']\n{extra}",
            papers.display(),
            books.display()
        ));
        ConfigContext::new(ConfigPaths::in_dir(home.config_dir())).with_local_dir(None)
    }

    #[test]
    fn lists_library_sections_and_marks_current() {
        let home = ConfigHome::new();
        let mut ctx = context(&home, "");

        let entries = collect_libraries(&mut ctx).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["papers", "books"]);
        assert!(entries[0].current);
        assert!(!entries[1].current);
        assert_eq!(
            entries[1].library.as_ref().unwrap().paths(),
            &[home.root().join("libraries/books")]
        );
    }

    #[test]
    fn selected_library_is_current() {
        let home = ConfigHome::new();
        let mut ctx = context(&home, "");
        ctx.set_lib("books").unwrap();

        let entries = collect_libraries(&mut ctx).unwrap();
        assert!(entries.iter().any(|e| e.name == "books" && e.current));
    }

    #[test]
    fn broken_section_is_reported_not_fatal() {
        let home = ConfigHome::new();
        let mut ctx = context(&home, "\n[both]\ndir = /a\ndirs = ['/b']\n");

        let entries = collect_libraries(&mut ctx).unwrap();
        let broken = entries.iter().find(|e| e.name == "both").unwrap();
        assert!(broken.library.is_err());
        assert!(run_libs(&mut ctx, false).is_ok());
        assert!(run_libs(&mut ctx, true).is_ok());
    }
}
