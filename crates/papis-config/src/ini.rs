//! INI document model, parser and writer
//!
//! Implements the dialect papis configuration files are written in:
//!
//! - `[section]` headers, section names are case-sensitive
//! - `key = value` or `key: value`, keys are case-insensitive (stored lower-case)
//! - full-line comments starting with `#` or `;`
//! - indented lines continue the previous value, joined with `\n`; blank
//!   lines between continuation lines are kept in the value
//! - a `[DEFAULT]` section whose entries are visible from every other section
//!
//! Values are kept verbatim; no interpolation is performed.

use std::collections::HashSet;
use std::path::Path;

use crate::{Error, Result};

/// Name of the section whose entries every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// An ordered, named group of key/value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite a key, keeping the original position on overwrite.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = normalize_key(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let key = normalize_key(key);
        let idx = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An INI document: the `[DEFAULT]` entries plus ordered named sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    defaults: Section,
    sections: Vec<Section>,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    pub fn new() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        }
    }

    /// Parse INI text. `origin` is only used for error messages.
    ///
    /// A section or a key repeated within the same text is rejected; repeats
    /// across documents are handled by [`IniDocument::merge`].
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut doc = Self::new();
        let mut cursor: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut pending_blanks = 0usize;
        let mut seen_sections: HashSet<String> = HashSet::new();
        let mut seen_keys: HashSet<(String, String)> = HashSet::new();

        let error = |line: usize, message: String| Error::Parse {
            path: origin.to_path_buf(),
            line,
            message,
        };

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                if last_key.is_some() {
                    pending_blanks += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key)) = (&cursor, &last_key) {
                    let section = doc.section_mut(section);
                    let joined = format!(
                        "{}{}{}",
                        section.get(key).unwrap_or_default(),
                        "\n".repeat(pending_blanks + 1),
                        trimmed
                    );
                    section.set(key, joined);
                    pending_blanks = 0;
                    continue;
                }
            }

            // Blank lines before an unindented line end the previous value
            pending_blanks = 0;
            last_key = None;

            if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() > 2 {
                let name = &trimmed[1..trimmed.len() - 1];
                if !seen_sections.insert(name.to_string()) {
                    return Err(error(line_no, format!("section '{name}' already exists")));
                }
                doc.section_mut(name);
                cursor = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(section) = &cursor else {
                return Err(error(line_no, "file contains no section headers".into()));
            };

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(error(line_no, format!("expected 'key = value', found '{trimmed}'")));
            };
            let key = normalize_key(&trimmed[..split]);
            if key.is_empty() {
                return Err(error(line_no, "empty key".into()));
            }
            let value = trimmed[split + 1..].trim();

            if !seen_keys.insert((section.clone(), key.clone())) {
                return Err(error(
                    line_no,
                    format!("option '{key}' in section '{section}' already exists"),
                ));
            }
            doc.section_mut(section).set(&key, value);
            last_key = Some(key);
        }

        Ok(doc)
    }

    /// Whether a named section exists. `[DEFAULT]` always exists.
    pub fn has_section(&self, name: &str) -> bool {
        name == DEFAULT_SECTION || self.sections.iter().any(|s| s.name == name)
    }

    /// Get a section by name, `[DEFAULT]` included.
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name == DEFAULT_SECTION {
            return Some(&self.defaults);
        }
        self.sections.iter().find(|s| s.name == name)
    }

    /// Get a section by name, creating it at the end if absent.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => &mut self.sections[idx],
            None => {
                self.sections.push(Section::new(name));
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        }
    }

    /// Look up `key` in `section`, falling back to `[DEFAULT]`.
    ///
    /// Returns `None` when the section itself does not exist.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let sec = self.section(section)?;
        sec.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.section_mut(section).set(key, value);
    }

    /// Named sections in document order, `[DEFAULT]` excluded.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Overlay `other` onto this document. Entries from `other` win.
    pub fn merge(&mut self, other: &IniDocument) {
        for (key, value) in other.defaults.iter() {
            self.defaults.set(key, value);
        }
        for section in &other.sections {
            let target = self.section_mut(&section.name);
            for (key, value) in section.iter() {
                target.set(key, value);
            }
        }
    }

    /// Render the document back to INI text.
    ///
    /// Multi-line values are written as indented continuation lines.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        let named = self.sections.iter();
        let all = std::iter::once(&self.defaults)
            .filter(|d| !d.is_empty())
            .chain(named);
        for section in all {
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in section.iter() {
                out.push_str(&format!("{} = {}\n", key, continuation(value)));
            }
            out.push('\n');
        }
        out
    }
}

/// Indent every line after the first; empty lines stay empty.
fn continuation(value: &str) -> String {
    let mut lines = value.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push('\t');
            out.push_str(line);
        }
    }
    out
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
