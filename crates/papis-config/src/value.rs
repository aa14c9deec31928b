//! Setting values and the kinds a caller can ask for

use serde::Serialize;
use std::fmt;

/// A setting value.
///
/// Loaded configuration always holds text; defaults registered in code
/// carry their natural type, and may be `Null` when a setting is unset
/// by default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// The kind of a [`Value`], also used to request coercion from the getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Int,
    Float,
    Bool,
    Null,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl ValueKind {
    /// Coerce raw configuration text into a value of this kind.
    ///
    /// Returns `None` when the text does not represent this kind.
    /// Boolean words follow the INI convention: `1/yes/true/on` and
    /// `0/no/false/off`, case-insensitive.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        match self {
            Self::Text => Some(Value::Text(raw.to_string())),
            Self::Int => trimmed.parse().ok().map(Value::Int),
            Self::Float => trimmed.parse().ok().map(Value::Float),
            Self::Bool => parse_bool(trimmed).map(Value::Bool),
            Self::Null => None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => Ok(()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_boolean_words() {
        for word in ["1", "yes", "TRUE", "On"] {
            assert_eq!(ValueKind::Bool.coerce(word), Some(Value::Bool(true)));
        }
        for word in ["0", "no", "False", "OFF"] {
            assert_eq!(ValueKind::Bool.coerce(word), Some(Value::Bool(false)));
        }
        assert_eq!(ValueKind::Bool.coerce("maybe"), None);
    }

    #[test]
    fn coerce_numbers_ignores_surrounding_whitespace() {
        assert_eq!(ValueKind::Int.coerce(" 42 "), Some(Value::Int(42)));
        assert_eq!(ValueKind::Float.coerce("0.42"), Some(Value::Float(0.42)));
        assert_eq!(ValueKind::Int.coerce("4.2"), None);
    }

    #[test]
    fn text_coercion_keeps_raw_string() {
        assert_eq!(
            ValueKind::Text.coerce(" padded "),
            Some(Value::Text(" padded ".into()))
        );
    }

    #[test]
    fn display_matches_stored_text() {
        assert_eq!(Value::Int(493).to_string(), "493");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("vim")), Value::Text("vim".into()));
    }
}
