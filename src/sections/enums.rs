//! Enums used by the sections module.
//!
//! - `SectionRef` - how a caller points at a section (position, name, or a new one).
//! - `KeyMode` - whether a section listing is keyed by position or by name.

use std::fmt;
use std::str::FromStr;

use crate::errors::WikiError;

/// Reference to a section of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionRef {
    /// Position in the page, `0` being the intro.
    Index(usize),
    /// Unique name as produced by the indexer (`"intro"`, `"History"`, `"History_2"`, ...).
    Name(String),
    /// A section that does not exist yet; only meaningful for edits.
    New,
}

impl fmt::Display for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionRef::Index(idx) => write!(f, "{}", idx),
            SectionRef::Name(name) => write!(f, "{}", name),
            SectionRef::New => write!(f, "new"),
        }
    }
}

impl From<usize> for SectionRef {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for SectionRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for SectionRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

/// Key used when listing every section of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// Keys are positions `0..n`.
    #[default]
    ByIndex,
    /// Keys are the unique section names.
    ByName,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::ByIndex => write!(f, "ByIndex"),
            KeyMode::ByName => write!(f, "ByName"),
        }
    }
}

impl FromStr for KeyMode {
    type Err = WikiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "index" | "byindex" | "by_index" => Ok(KeyMode::ByIndex),
            "name" | "byname" | "by_name" => Ok(KeyMode::ByName),
            _ => Err(WikiError::UnsupportedKeyMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keymode_fromstr_and_display() {
        assert_eq!(KeyMode::from_str("index").unwrap(), KeyMode::ByIndex);
        assert_eq!(KeyMode::from_str("ByName").unwrap(), KeyMode::ByName);
        assert_eq!(format!("{}", KeyMode::ByIndex), "ByIndex");
    }

    #[test]
    fn keymode_rejects_unknown_modes() {
        let err = KeyMode::from_str("by_colour").unwrap_err();
        assert!(matches!(err, WikiError::UnsupportedKeyMode(ref m) if m == "by_colour"));

        let err = KeyMode::from_str("By_Colour").unwrap_err();
        assert!(matches!(err, WikiError::UnsupportedKeyMode(ref m) if m == "By_Colour"));
    }

    #[test]
    fn section_ref_conversions() {
        assert_eq!(SectionRef::from(2usize), SectionRef::Index(2));
        assert_eq!(SectionRef::from("Meat"), SectionRef::Name("Meat".into()));
        assert_eq!(SectionRef::New.to_string(), "new");
    }
}
