//! Component Tokenizer
//!
//! Turns a [`Chunk`] into a [`TokenMap`] through an ordered pipeline of
//! steps. Every step takes and returns the same intermediate shape,
//! [`Tokenized`] (properties + unconsumed tail):
//!
//! ```text
//! chunk ──► properties ──► tail check ──► inline values ──► body
//! ```
//!
//! Metadata stops after the tail check; introductions and chapters run the
//! inline value tokenizers and their own body tokenizer.

pub mod body;
pub mod inline;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::chunk::{is_blank, Chunk};
use crate::error::JournalError;

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?): (.+?)$").unwrap());

// =============================================================================
// Tokens
// =============================================================================

/// A raw, unvalidated value produced by tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    List(Vec<Token>),
    Map(TokenMap),
}

/// Property name -> value. Keys use underscores (`opt_out`).
pub type TokenMap = BTreeMap<String, Token>;

impl Token {
    pub fn text(s: impl Into<String>) -> Self {
        Token::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(s) => f.write_str(s),
            Token::List(items) => {
                let parts: Vec<String> = items.iter().map(Token::to_string).collect();
                f.write_str(&parts.join(" "))
            }
            Token::Map(map) => {
                let parts: Vec<String> = map.values().map(Token::to_string).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

// =============================================================================
// Intermediate shape
// =============================================================================

/// Properties extracted so far plus the lines not consumed yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub properties: TokenMap,
    pub tail: Vec<String>,
}

/// Why a tokenize step rejected a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeFailure {
    /// A specific line is at fault
    Line { message: &'static str, line: String },
    /// An inline value did not match its micro-grammar
    Hint(&'static str),
}

impl TokenizeFailure {
    fn into_error(self, header: &str) -> JournalError {
        match self {
            TokenizeFailure::Line { message, line } => JournalError::Property {
                header: header.to_string(),
                message: message.to_string(),
                line: line.trim_end_matches(['\n', '\r']).to_string(),
            },
            TokenizeFailure::Hint(hint) => JournalError::InlineSyntax {
                header: header.to_string(),
                hint: hint.to_string(),
            },
        }
    }
}

pub type Step = fn(Tokenized) -> Result<Tokenized, TokenizeFailure>;

// =============================================================================
// Property extraction
// =============================================================================

pub const MSG_NOTATION: &str = "expected property notation but found";
pub const MSG_MISSING_SPACE: &str = "expected space after first colon";
pub const MSG_DUPLICATE: &str = "duplicate of field";
pub const MSG_OVERFLOW: &str =
    "Properties were terminated by blank line, overflowing content not allowed";

/// Split `key: value` into a normalized key and the value
pub fn parse_property(line: &str) -> Option<(String, String)> {
    let caps = PROPERTY_RE.captures(line.trim_end())?;
    Some((caps[1].replace('-', "_"), caps[2].to_string()))
}

/// Collect `key: value` lines from a chunk body up to the first blank line.
///
/// Lines that do not parse, or repeat a key, go to the tail instead so the
/// tail check can report them precisely.
pub fn tokenize_properties(body: &[String]) -> Tokenized {
    let mut properties = TokenMap::new();
    let mut tail = Vec::new();

    for (n, line) in body.iter().enumerate() {
        if is_blank(line) {
            tail.extend_from_slice(&body[n..]);
            break;
        }

        match parse_property(line) {
            Some((key, value)) if !properties.contains_key(&key) => {
                properties.insert(key, Token::Text(value));
            }
            _ => tail.push(line.clone()),
        }
    }

    Tokenized { properties, tail }
}

/// A colon not followed by a space, e.g. `prop:value`
pub fn missing_space_after_colon(line: &str) -> bool {
    match line.trim_end().split_once(':') {
        Some((_, rest)) => !rest.starts_with(' '),
        None => false,
    }
}

fn classify_invalid_line(line: &str, properties: &TokenMap) -> &'static str {
    if missing_space_after_colon(line) {
        MSG_MISSING_SPACE
    } else if parse_property(line).is_some_and(|(key, _)| properties.contains_key(&key)) {
        MSG_DUPLICATE
    } else {
        MSG_NOTATION
    }
}

fn check_terminated(t: &Tokenized) -> Result<(), TokenizeFailure> {
    match t.tail.first() {
        Some(first) if !is_blank(first) => Err(TokenizeFailure::Line {
            message: classify_invalid_line(first, &t.properties),
            line: first.clone(),
        }),
        _ => Ok(()),
    }
}

/// Tail check for components that allow a content body
pub fn check_tail_with_body(t: Tokenized) -> Result<Tokenized, TokenizeFailure> {
    check_terminated(&t)?;
    Ok(t)
}

/// Tail check for header-only components
pub fn check_tail_without_body(t: Tokenized) -> Result<Tokenized, TokenizeFailure> {
    check_terminated(&t)?;

    if let Some(line) = t.tail.iter().find(|l| !is_blank(l)) {
        return Err(TokenizeFailure::Line {
            message: MSG_OVERFLOW,
            line: line.clone(),
        });
    }

    Ok(t)
}

// =============================================================================
// Component dispatch
// =============================================================================

/// The component types this compiler knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Meta,
    Introduction,
    Chapter,
}

impl ComponentKind {
    /// Look up a component by its header id, e.g. `/chapter`
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "/meta" => Some(Self::Meta),
            "/introduction" => Some(Self::Introduction),
            "/chapter" => Some(Self::Chapter),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Meta => "/meta",
            Self::Introduction => "/introduction",
            Self::Chapter => "/chapter",
        }
    }

    /// Steps applied after property extraction, in order
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Self::Meta => META_STEPS,
            Self::Introduction => INTRODUCTION_STEPS,
            Self::Chapter => CHAPTER_STEPS,
        }
    }
}

const META_STEPS: &[Step] = &[check_tail_without_body];

const INTRODUCTION_STEPS: &[Step] = &[
    check_tail_with_body,
    inline::tokenize_values,
    body::introduction,
];

const CHAPTER_STEPS: &[Step] = &[check_tail_with_body, inline::tokenize_values, body::chapter];

/// Run the full tokenize pipeline for one chunk
pub fn tokenize_component(kind: ComponentKind, chunk: &Chunk) -> Result<TokenMap, JournalError> {
    let header = chunk.header().trim_end();

    let mut tokenized = tokenize_properties(chunk.body());
    for step in kind.steps() {
        tokenized = step(tokenized).map_err(|f| f.into_error(header))?;
    }

    Ok(tokenized.properties)
}
