//! Inline value tokenizers
//!
//! Some properties carry a small grammar inside their value:
//!
//! | property   | syntax                                  |
//! |------------|-----------------------------------------|
//! | `appendix` | `[description] href`                    |
//! | `picture`  | `HEIGHTpx src`                          |
//! | `gallery`  | `HEIGHTpx item item ...`                |
//! | `quote`    | `[author] [content] reference`          |
//!
//! A value that does not match yields the property's usage hint verbatim.

use std::sync::LazyLock;

use regex::Regex;

use super::{Token, TokenMap, Tokenized, TokenizeFailure};

pub const APPENDIX_HINT: &str = "ensure this value has valid syntax: \"appendix\", like this: \"[description] https://www.robingruenke.com\"";
pub const PICTURE_HINT: &str =
    "ensure this value has valid syntax: \"picture\", like this: \"250px /gallery/img.png\"";
pub const GALLERY_HINT: &str = "ensure this value has valid syntax: \"gallery\", like this: \"45px /gallery/img_1.png /gallery/img_2.png\"";
pub const QUOTE_HINT: &str = "ensure this value has proper formatting \"quote\", like this \"[description] [content] \"https://wikipedia.com\"";

static APPENDIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.*)\] (\S+)$").unwrap());
static PICTURE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+px) (\S+)$").unwrap());
static GALLERY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+px) (.+)$").unwrap());
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*)\] \[(.+)\] (.+)$").unwrap());

type InlineTokenizer = fn(&str) -> Result<Token, &'static str>;

/// Tokenizers keyed by property name, applied in this order
const INLINE_TOKENIZERS: &[(&str, InlineTokenizer)] = &[
    ("appendix", appendix),
    ("picture", picture),
    ("gallery", gallery),
    ("quote", quote),
];

fn record<const N: usize>(fields: [(&str, Token); N]) -> Token {
    Token::Map(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<TokenMap>(),
    )
}

/// `[description] href`
pub fn appendix(value: &str) -> Result<Token, &'static str> {
    let caps = APPENDIX_RE.captures(value).ok_or(APPENDIX_HINT)?;
    Ok(record([
        ("description", Token::text(caps[1].trim())),
        ("href", Token::text(&caps[2])),
    ]))
}

/// `HEIGHTpx src`
pub fn picture(value: &str) -> Result<Token, &'static str> {
    let caps = PICTURE_RE.captures(value).ok_or(PICTURE_HINT)?;
    Ok(record([
        ("height", Token::text(&caps[1])),
        ("src", Token::text(&caps[2])),
    ]))
}

/// `HEIGHTpx item item ...`
pub fn gallery(value: &str) -> Result<Token, &'static str> {
    let caps = GALLERY_RE.captures(value).ok_or(GALLERY_HINT)?;
    let items = caps[2].split(' ').map(Token::text).collect();
    Ok(record([
        ("height", Token::text(&caps[1])),
        ("items", Token::List(items)),
    ]))
}

/// `[author] [content] reference`
pub fn quote(value: &str) -> Result<Token, &'static str> {
    let caps = QUOTE_RE.captures(value).ok_or(QUOTE_HINT)?;
    Ok(record([
        ("author", Token::text(&caps[1])),
        ("content", Token::text(&caps[2])),
        ("reference", Token::text(&caps[3])),
    ]))
}

/// Replace every micro-grammar property value with its structured shape
pub fn tokenize_values(mut t: Tokenized) -> Result<Tokenized, TokenizeFailure> {
    for (name, tokenize) in INLINE_TOKENIZERS {
        if let Some(Token::Text(raw)) = t.properties.get(*name) {
            let token = tokenize(raw).map_err(TokenizeFailure::Hint)?;
            t.properties.insert(name.to_string(), token);
        }
    }

    Ok(t)
}
