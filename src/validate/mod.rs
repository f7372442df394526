//! Schema Validator
//!
//! Turns a [`TokenMap`] into a typed record. Constraints are checked in a
//! fixed order (declared field order, then unknown keys) and the first
//! failure wins, so every invalid input maps to exactly one reproducible
//! [`ValidationError`].
//!
//! The error carries the field path where it occurred; [`render`] turns it
//! into the final diagnostic string, looking the offending raw value up in
//! the token map.

pub mod constraints;
pub mod records;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::JournalError;
use crate::model::{Chapter, Introduction, Metadata};
use crate::tokenize::{ComponentKind, Token, TokenMap};

// =============================================================================
// Field paths
// =============================================================================

/// One step from a record root to a nested value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field
    Field(String),
    /// A list position
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(&name.replace('_', "-")),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// Full path from a record root to a field
pub type FieldPath = Vec<PathSegment>;

/// `appendix->href`, `gallery->items->1`, `interactive-example`
pub fn format_field_path(path: &FieldPath) -> String {
    path.iter()
        .map(PathSegment::to_string)
        .collect::<Vec<_>>()
        .join("->")
}

// =============================================================================
// Validation error
// =============================================================================

/// First failing constraint of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub loc: FieldPath,
    pub msg: String,
}

impl ValidationError {
    pub fn new(field: impl Into<PathSegment>, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![field.into()],
            msg: msg.into(),
        }
    }

    /// Prefix the path with an enclosing field or index
    pub fn within(mut self, outer: impl Into<PathSegment>) -> Self {
        self.loc.insert(0, outer.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", format_field_path(&self.loc), self.msg)
    }
}

impl std::error::Error for ValidationError {}

const VALUE_PREVIEW_CHARS: usize = 14;

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

fn lookup<'a>(tokens: &'a TokenMap, loc: &FieldPath) -> Option<&'a Token> {
    let (first, rest) = loc.split_first()?;
    let PathSegment::Field(name) = first else {
        return None;
    };

    rest.iter().try_fold(tokens.get(name)?, |token, segment| match (token, segment) {
        (Token::Map(map), PathSegment::Field(key)) => map.get(key),
        (Token::List(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    })
}

/// Label used in front of validation errors for a component
pub fn component_label(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Meta => "/meta properties",
        ComponentKind::Introduction => "/introduction",
        ComponentKind::Chapter => "/chapter",
    }
}

/// Build the diagnostic for a failed record.
///
/// Introduction and chapter errors quote the offending value (truncated)
/// and its length when the path starts at a key present in `tokens`.
/// Metadata errors only name the field.
pub fn render(kind: ComponentKind, err: &ValidationError, tokens: &TokenMap) -> JournalError {
    let mut target = format_field_path(&err.loc);

    if kind != ComponentKind::Meta {
        if let Some(value) = lookup(tokens, &err.loc) {
            let value = value.to_string();
            target = format!(
                "{}: {} (len={})",
                target,
                truncate(&value, VALUE_PREVIEW_CHARS),
                value.chars().count()
            );
        }
    }

    JournalError::Validation {
        component: component_label(kind).to_string(),
        message: err.msg.clone(),
        target,
    }
}

// =============================================================================
// Validator
// =============================================================================

/// A validated component of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Meta(Metadata),
    Introduction(Introduction),
    Chapter(Chapter),
}

/// Builds records from token maps. Local paths resolve against `content_root`.
#[derive(Debug, Clone)]
pub struct Validator {
    content_root: PathBuf,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Validator {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Validate a token map as the given component kind
    pub fn validate(&self, kind: ComponentKind, tokens: &TokenMap) -> Result<Component, JournalError> {
        let result = match kind {
            ComponentKind::Meta => self.metadata(tokens).map(Component::Meta),
            ComponentKind::Introduction => self.introduction(tokens).map(Component::Introduction),
            ComponentKind::Chapter => self.chapter(tokens).map(Component::Chapter),
        };

        result.map_err(|e| render(kind, &e, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_path() {
        let path: FieldPath = vec!["gallery".into(), "items".into(), 1.into()];
        assert_eq!(format_field_path(&path), "gallery->items->1");

        let path: FieldPath = vec!["interactive_example".into()];
        assert_eq!(format_field_path(&path), "interactive-example");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("aaaaaaaaaaaaaaaaaaaa", 14), "aaaaaaaaaaaaaa...");
        assert_eq!(truncate("short", 14), "short");
        assert_eq!(truncate("ääääääääääääääää", 14), "ääääääääääääää...");
    }

    #[test]
    fn test_within_prefixes_path() {
        let err = ValidationError::new("href", "URL scheme not permitted").within("appendix");
        assert_eq!(err.to_string(), "appendix->href: URL scheme not permitted");
    }

    #[test]
    fn test_render_with_value() {
        let mut tokens = TokenMap::new();
        tokens.insert("author".into(), Token::text("a".repeat(49)));
        let err = ValidationError::new("author", "ensure this value has at most 48 characters");

        assert_eq!(
            render(ComponentKind::Chapter, &err, &tokens).to_string(),
            "Error in /chapter: ensure this value has at most 48 characters: \"author: aaaaaaaaaaaaaa... (len=49)\""
        );
    }

    #[test]
    fn test_render_missing_field() {
        let err = ValidationError::new("topic", "field required");
        assert_eq!(
            render(ComponentKind::Chapter, &err, &TokenMap::new()).to_string(),
            "Error in /chapter: field required: \"topic\""
        );
    }

    #[test]
    fn test_render_meta_never_quotes_value() {
        let mut tokens = TokenMap::new();
        tokens.insert("website".into(), Token::text("http://example.com"));
        let err = ValidationError::new("website", "URL scheme not permitted");

        assert_eq!(
            render(ComponentKind::Meta, &err, &tokens).to_string(),
            "Error in /meta properties: URL scheme not permitted: \"website\""
        );
    }
}
