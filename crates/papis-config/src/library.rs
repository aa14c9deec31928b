//! Libraries: named collections of folders holding documents

use std::fmt;
use std::path::PathBuf;

use crate::paths::expand_user;
use crate::{Error, Result};

/// A named set of folders documents are aggregated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,
    paths: Vec<PathBuf>,
}

impl Library {
    pub fn new(name: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            paths,
        }
    }

    /// A library named after its own folders.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        let name = join_paths(&paths);
        Self { name, paths }
    }

    /// Build a library from the `dir` / `dirs` entries of its section.
    ///
    /// Exactly one of the two must be set. `dirs` holds a list literal such
    /// as `['~/papers', "~/books"]`. A leading `~` is expanded in every path.
    pub fn from_settings(name: &str, dir: Option<&str>, dirs: Option<&str>) -> Result<Self> {
        let misconfigured = |message: &str| Error::LibraryConfig {
            library: name.to_string(),
            message: message.to_string(),
        };

        let paths = match (dir, dirs) {
            (Some(dir), None) => vec![expand_user(dir.trim())],
            (None, Some(dirs)) => {
                let list = parse_path_list(dirs)
                    .ok_or_else(|| misconfigured("'dirs' is not a list of paths"))?;
                if list.is_empty() {
                    return Err(misconfigured("'dirs' is empty"));
                }
                list.iter().map(|p| expand_user(p)).collect()
            }
            (Some(_), Some(_)) => return Err(misconfigured("set either 'dir' or 'dirs', not both")),
            (None, None) => {
                return Err(misconfigured(
                    "to initialize a library you have to set either 'dir' or 'dirs'",
                ));
            }
        };

        Ok(Self::new(name, paths))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The library folders joined with `:`.
    pub fn path_format(&self) -> String {
        join_paths(&self.paths)
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a list literal of quoted strings, e.g. `['~/a', "~/b",]`.
///
/// Returns `None` for anything else.
pub fn parse_path_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    let mut expect_item = true;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == ',' {
            if expect_item {
                return None;
            }
            expect_item = true;
            chars.next();
            continue;
        }
        if (c != '\'' && c != '"') || !expect_item {
            return None;
        }

        let quote = c;
        chars.next();
        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(chars.next()?),
                ch if ch == quote => break,
                ch => item.push(ch),
            }
        }
        items.push(item);
        expect_item = false;
    }

    Some(items)
}

/// Whether `identifier` names an existing folder or file.
pub(crate) fn existing_path(identifier: &str) -> Option<PathBuf> {
    let path = expand_user(identifier);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("['~/a', '~/b']", Some(vec!["~/a", "~/b"]))]
    #[case("[\"/x\",]", Some(vec!["/x"]))]
    #[case("[ ]", Some(vec![]))]
    #[case("['it\\'s']", Some(vec!["it's"]))]
    #[case("'~/a'", None)]
    #[case("[~/a]", None)]
    #[case("['a' 'b']", None)]
    #[case("[, 'a']", None)]
    #[case("['unterminated]", None)]
    fn parses_list_literals(#[case] raw: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|v| v.into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(parse_path_list(raw), expected);
    }

    #[test]
    fn dir_gives_single_path_library() {
        let lib = Library::from_settings("papers", Some("/docs/papers"), None).unwrap();
        assert_eq!(lib.name(), "papers");
        assert_eq!(lib.paths(), &[PathBuf::from("/docs/papers")]);
    }

    #[test]
    fn dirs_gives_ordered_paths() {
        let lib = Library::from_settings("mixed", None, Some("['/a', '/b']")).unwrap();
        assert_eq!(lib.paths(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(lib.path_format(), "/a:/b");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("/a"), Some("['/b']"))]
    #[case(None, Some("/not/a/list"))]
    #[case(None, Some("[]"))]
    fn bad_settings_are_library_config_errors(
        #[case] dir: Option<&str>,
        #[case] dirs: Option<&str>,
    ) {
        let err = Library::from_settings("broken", dir, dirs).unwrap_err();
        assert!(matches!(err, Error::LibraryConfig { ref library, .. } if library == "broken"));
    }

    #[test]
    fn path_library_is_named_after_its_folders() {
        let lib = Library::from_paths(vec![PathBuf::from("/x/y")]);
        assert_eq!(lib.name(), "/x/y");
        assert_eq!(lib.to_string(), "/x/y");
    }
}
