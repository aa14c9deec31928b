//! Built-in default settings and the registry collaborators extend
//!
//! The registry maps a section name to its default key/value pairs. The
//! general section ([`GENERAL_SECTION`]) always comes first, followed by the
//! `tui` section and whatever sections were registered later.

use std::collections::BTreeMap;

use crate::{Error, Result, Value};

/// Section holding the general, library-independent settings.
pub const GENERAL_SECTION: &str = "settings";

/// Defaults for one section, keyed by setting name.
pub type SectionDefaults = BTreeMap<String, Value>;

/// The platform's generic "open this file" command.
pub fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "start"
    } else {
        "xdg-open"
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Build section defaults from `(key, value)` pairs.
pub fn section_defaults<I, K, V>(entries: I) -> SectionDefaults
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// The general settings catalogue.
pub fn general_settings() -> SectionDefaults {
    let opener = default_opener();
    let browser = env_var("BROWSER").unwrap_or_else(|| opener.to_string());
    let editor = env_var("EDITOR")
        .or_else(|| env_var("VISUAL"))
        .unwrap_or_else(|| opener.to_string());

    let mut settings = section_defaults([
        ("local-config-file", ".papis.config"),
        ("database-backend", "papis"),
        ("default-query-string", "."),
        ("opentool", opener),
        ("browser", browser.as_str()),
        ("picktool", "papis.pick"),
        ("mvtool", "mv"),
        ("editor", editor.as_str()),
        ("notes-name", "notes.tex"),
        ("add-name", ""),
        ("browse-key", "url"),
        ("browse-query-format", "{doc[title]} {doc[author]}"),
        ("search-engine", "https://duckduckgo.com"),
        ("user-agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3)"),
        ("scripts-short-help-regex", ".*papis-short-help: *(.*)"),
        ("info-name", "info.yaml"),
        ("doc-url-key-name", "doc_url"),
        ("mark-key-name", "marks"),
        ("mark-format-name", "mark"),
        ("mark-header-format", "{mark[name]} - {mark[value]}"),
        ("mark-match-format", "{mark[name]} - {mark[value]}"),
        ("mark-opener-format", opener),
        ("file-browser", opener),
        ("bibtex-journal-key", "journal"),
        ("extra-bibtex-keys", ""),
        ("extra-bibtex-types", ""),
        ("default-library", "papers"),
        (
            "export-text-format",
            "{doc[author]}. {doc[title]}. {doc[journal]} {doc[pages]} {doc[month]} {doc[year]}",
        ),
        ("format-doc-name", "doc"),
        (
            "match-format",
            "{doc[tags]}{doc.subfolder}{doc[title]}{doc[author]}{doc[year]}",
        ),
        (
            "header-format",
            "<ansired>{doc.html_escape[title]}</ansired>\n \
             <ansigreen>{doc.html_escape[author]}</ansigreen>\n  \
             <blue>({doc.html_escape[year]})</blue> \
             [<ansiyellow>{doc.html_escape[tags]}</ansiyellow>]",
        ),
        ("ref-format", "{doc[doi]}"),
        ("multiple-authors-separator", " and "),
        ("multiple-authors-format", "{au[surname]}, {au[given_name]}"),
        ("whoosh-schema-fields", "['doi']"),
        (
            "whoosh-schema-prototype",
            "{\n\"author\": TEXT(stored=True),\n\"title\": TEXT(stored=True),\n\
             \"year\": TEXT(stored=True),\n\"tags\": TEXT(stored=True),\n}",
        ),
        ("citation-string", "*"),
        (
            "unique-document-keys",
            "['doi','ref','isbn','isbn10','url','doc_url']",
        ),
    ]);

    settings.extend(section_defaults([
        ("use-cache", true),
        ("use-git", false),
        ("add-confirm", false),
        ("add-interactive", false),
        ("add-edit", false),
        ("add-open", false),
        ("open-mark", false),
        ("format-jinja2-enable", false),
        ("info-allow-unicode", true),
        ("bibtex-unicode", false),
    ]));
    settings.extend(section_defaults([
        ("cache-dir", None::<&str>),
        ("file-name", None),
        ("header-format-file", None),
        ("downloader-proxy", None),
    ]));
    settings.insert("dir-umask".into(), Value::Int(0o755));
    settings
}

/// Key bindings and display options of the terminal picker.
pub fn tui_settings() -> SectionDefaults {
    let mut tui = section_defaults([
        ("status_line_format", "{selected_index}/{number_of_documents}  F1:help  c-l:redraw"),
        ("status_line_style", "bg:ansiwhite fg:ansiblack"),
        ("message_toolbar_style", "bg:ansiyellow fg:ansiblack"),
        ("options_list.selected_margin_style", "bg:ansiblack fg:ansigreen"),
        ("options_list.unselected_margin_style", "bg:ansiwhite"),
        ("error_toolbar_style", "bg:ansired fg:ansiblack"),
        ("move_down_key", "down"),
        ("move_up_key", "up"),
        ("move_down_while_info_window_active_key", "c-n"),
        ("move_up_while_info_window_active_key", "c-p"),
        ("focus_command_line_key", "tab"),
        ("edit_document_key", "c-e"),
        ("open_document_key", "c-o"),
        ("show_help_key", "f1"),
        ("show_info_key", "s-tab"),
        ("go_top_key", "home"),
        ("go_bottom_key", "end"),
        ("editmode", "emacs"),
    ]);
    tui.insert("cursorline".into(), Value::Bool(false));
    tui.insert("info_window_height".into(), Value::Int(10));
    tui
}

/// Ordered registry of default settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSettings {
    sections: Vec<(String, SectionDefaults)>,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl DefaultSettings {
    /// A registry holding only an empty general section.
    pub fn empty() -> Self {
        Self {
            sections: vec![(GENERAL_SECTION.to_string(), SectionDefaults::new())],
        }
    }

    /// The general catalogue followed by the `tui` section.
    pub fn with_builtins() -> Self {
        Self {
            sections: vec![
                (GENERAL_SECTION.to_string(), general_settings()),
                ("tui".to_string(), tui_settings()),
            ],
        }
    }

    /// Merge section defaults into the registry.
    ///
    /// Keys of an already known section are added or overwritten; unknown
    /// sections are appended wholesale. Nothing is ever removed.
    pub fn register<I, S>(&mut self, settings: I)
    where
        I: IntoIterator<Item = (S, SectionDefaults)>,
        S: Into<String>,
    {
        for (name, defaults) in settings {
            let name = name.into();
            match self.sections.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => existing.extend(defaults),
                None => {
                    tracing::debug!(section = %name, "Registering default section");
                    self.sections.push((name, defaults));
                }
            }
        }
    }

    /// Default for `key` in `section`, or in the general section when `None`.
    pub fn get(&self, key: &str, section: Option<&str>) -> Result<&Value> {
        let section = section.unwrap_or(GENERAL_SECTION);
        self.section(section)
            .and_then(|defaults| defaults.get(key))
            .ok_or_else(|| Error::MissingDefault {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    pub fn section(&self, name: &str) -> Option<&SectionDefaults> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, defaults)| defaults)
    }

    /// Sections in registration order, general section first.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &SectionDefaults)> {
        self.sections.iter().map(|(n, d)| (n.as_str(), d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_section_comes_first() {
        let registry = DefaultSettings::with_builtins();
        let names: Vec<_> = registry.sections().map(|(n, _)| n).collect();
        assert_eq!(names, vec![GENERAL_SECTION, "tui"]);
    }

    #[test]
    fn builtin_values_keep_their_types() {
        let registry = DefaultSettings::with_builtins();
        assert_eq!(registry.get("mvtool", None).unwrap(), &Value::from("mv"));
        assert_eq!(registry.get("dir-umask", None).unwrap(), &Value::Int(493));
        assert_eq!(registry.get("use-git", None).unwrap(), &Value::Bool(false));
        assert_eq!(registry.get("file-name", None).unwrap(), &Value::Null);
        assert_eq!(
            registry.get("mvtool", Some(GENERAL_SECTION)).unwrap(),
            &Value::from("mv")
        );
    }

    #[test]
    fn missing_key_and_missing_section_fail() {
        let registry = DefaultSettings::with_builtins();
        assert!(matches!(
            registry.get("no-such-key", None),
            Err(Error::MissingDefault { .. })
        ));
        assert!(matches!(
            registry.get("command", Some("scihub")),
            Err(Error::MissingDefault { .. })
        ));
    }

    #[test]
    fn register_merges_into_existing_section() {
        let mut registry = DefaultSettings::with_builtins();
        registry.register([(
            GENERAL_SECTION,
            section_defaults([("hubhub", 42i64)]),
        )]);
        registry.register([(GENERAL_SECTION, section_defaults([("default-library", "mag")]))]);

        assert_eq!(registry.get("hubhub", None).unwrap(), &Value::Int(42));
        assert_eq!(registry.get("default-library", None).unwrap(), &Value::from("mag"));
        assert!(registry.get("info-name", None).is_ok());
    }

    #[test]
    fn register_appends_new_section() {
        let mut registry = DefaultSettings::empty();
        registry.register([("scihub", section_defaults([("command", "open")]))]);
        assert_eq!(
            registry.get("command", Some("scihub")).unwrap(),
            &Value::from("open")
        );
        let names: Vec<_> = registry.sections().map(|(n, _)| n).collect();
        assert_eq!(names, vec![GENERAL_SECTION, "scihub"]);
    }

    #[test]
    fn register_is_idempotent() {
        let mut once = DefaultSettings::with_builtins();
        once.register([("s", section_defaults([("a", 1i64)]))]);
        let mut twice = once.clone();
        twice.register([("s", section_defaults([("a", 1i64)]))]);
        assert_eq!(once, twice);
    }
}
