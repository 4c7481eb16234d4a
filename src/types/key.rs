#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;

/// Organizing key of a [`super::Record`].
///
/// Identifiers arrive either as integers or as free text. Equality and hashing are
/// per variant, so `Int(7)` never equals `Text("7")`. The total order places every
/// `Int` before every `Text`; inside a variant the natural order applies.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    /// Numeric identifier.
    Int(i64),
    /// Textual identifier.
    Text(String),
}

impl Key {
    /// Returns the integer value when the key is numeric.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(v) => Some(*v),
            Key::Text(_) => None,
        }
    }

    /// Returns the text when the key is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(v) => write!(f, "{v}"),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}
