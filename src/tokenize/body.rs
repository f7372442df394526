//! Body tokenizers
//!
//! Consume the tail left over after property extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{Token, TokenMap, Tokenized, TokenizeFailure};
use crate::chunk::is_blank;

static CODE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|code").unwrap());
static CODE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^code\|").unwrap());

/// Flatten the tail into a single `content` string.
///
/// A `content` property given explicitly wins over the body.
pub fn introduction(mut t: Tokenized) -> Result<Tokenized, TokenizeFailure> {
    let lines: Vec<&str> = t
        .tail
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.trim())
        .collect();
    let content = lines.join(" ").trim().to_string();

    t.properties
        .entry("content".to_string())
        .or_insert(Token::Text(content));
    t.tail.clear();
    Ok(t)
}

enum ParagraphDraft {
    Text(Vec<String>),
    Code(String),
}

impl ParagraphDraft {
    fn into_token(self) -> Token {
        let (kind, content) = match self {
            ParagraphDraft::Text(lines) => ("text", lines.join(" ")),
            ParagraphDraft::Code(content) => ("code", content),
        };
        let mut map = TokenMap::new();
        map.insert("type".to_string(), Token::text(kind));
        map.insert("content".to_string(), Token::Text(content));
        Token::Map(map)
    }
}

/// Split the tail into text and code paragraphs.
///
/// Text paragraphs are separated by blank lines and their lines are joined
/// with single spaces. Code paragraphs sit between `|code` and `code|` and
/// keep their lines verbatim.
pub fn chapter(mut t: Tokenized) -> Result<Tokenized, TokenizeFailure> {
    let mut paragraphs: Vec<ParagraphDraft> = Vec::new();
    let mut previously_blank = false;
    let mut inside_code_block = false;

    for line in &t.tail {
        if is_blank(line) && !inside_code_block {
            previously_blank = true;
        } else if CODE_OPEN_RE.is_match(line) {
            paragraphs.push(ParagraphDraft::Code(String::new()));
            inside_code_block = true;
        } else if CODE_CLOSE_RE.is_match(line) {
            inside_code_block = false;
        } else if inside_code_block {
            if let Some(ParagraphDraft::Code(content)) = paragraphs.last_mut() {
                content.push_str(line);
            }
        } else {
            let continues_text = !previously_blank
                && matches!(paragraphs.last(), Some(ParagraphDraft::Text(_)));

            if !continues_text {
                paragraphs.push(ParagraphDraft::Text(Vec::new()));
            }
            if let Some(ParagraphDraft::Text(lines)) = paragraphs.last_mut() {
                lines.push(line.trim().to_string());
            }
            previously_blank = false;
        }
    }

    let paragraphs = paragraphs.into_iter().map(ParagraphDraft::into_token).collect();
    t.properties
        .insert("paragraphs".to_string(), Token::List(paragraphs));
    t.tail.clear();
    Ok(t)
}
