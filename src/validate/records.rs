//! Record construction
//!
//! One method per record. Fields are checked in declaration order and the
//! first failure is returned; unknown keys are reported only once every
//! declared field passed.

use crate::model::{
    Appendix, Chapter, Gallery, GalleryItems, Introduction, Link, Metadata, Paragraph, Picture,
    Quotation,
};
use crate::tokenize::{Token, TokenMap};

use super::constraints::{self, https_url, is_url, length, web_path, PathKind};
use super::{ValidationError, Validator};

pub const MSG_FIELD_REQUIRED: &str = "field required";
pub const MSG_EXTRA_FIELD: &str = "extra fields not permitted";
pub const MSG_NOT_STR: &str = "str type expected";
pub const MSG_NOT_DICT: &str = "value is not a valid dict";
pub const MSG_NOT_LIST: &str = "value is not a valid list";
pub const MSG_MIN_ITEMS: &str = "ensure this value has at least 1 items";
pub const MSG_PARAGRAPH_KIND: &str = "unexpected value; permitted: 'text', 'code'";

const META_FIELDS: &[&str] = &[
    "author",
    "website",
    "year",
    "title",
    "description",
    "keywords",
    "opt_out",
];
const INTRODUCTION_FIELDS: &[&str] = &["content", "appendix"];
const CHAPTER_FIELDS: &[&str] = &[
    "author",
    "topic",
    "date",
    "website",
    "appendix",
    "picture",
    "interactive_example",
    "gallery",
    "quote",
    "paragraphs",
];
const APPENDIX_FIELDS: &[&str] = &["description", "href"];
const PICTURE_FIELDS: &[&str] = &["src", "height"];
const GALLERY_FIELDS: &[&str] = &["height", "items"];
const QUOTE_FIELDS: &[&str] = &["author", "content", "reference"];

// =============================================================================
// Field access
// =============================================================================

/// Typed, located access to the entries of one token map
struct Fields<'a> {
    tokens: &'a TokenMap,
}

impl<'a> Fields<'a> {
    fn new(tokens: &'a TokenMap) -> Self {
        Self { tokens }
    }

    fn required(&self, name: &str) -> Result<&'a Token, ValidationError> {
        self.tokens
            .get(name)
            .ok_or_else(|| ValidationError::new(name, MSG_FIELD_REQUIRED))
    }

    fn required_text(&self, name: &str) -> Result<&'a str, ValidationError> {
        self.required(name)?
            .as_text()
            .ok_or_else(|| ValidationError::new(name, MSG_NOT_STR))
    }

    /// Required text converted by `f`; a conversion error is located at `name`
    fn parse<T>(
        &self,
        name: &str,
        f: impl FnOnce(&'a str) -> Result<T, String>,
    ) -> Result<T, ValidationError> {
        let value = self.required_text(name)?;
        f(value).map_err(|msg| ValidationError::new(name, msg))
    }

    /// Required text that must pass `check`
    fn text(
        &self,
        name: &str,
        check: impl FnOnce(&str) -> Result<(), String>,
    ) -> Result<String, ValidationError> {
        self.parse(name, |v| check(v).map(|()| v.to_string()))
    }

    fn optional<T>(
        &self,
        name: &str,
        f: impl FnOnce(&'a str) -> Result<T, String>,
    ) -> Result<Option<T>, ValidationError> {
        match self.tokens.get(name) {
            None => Ok(None),
            Some(_) => self.parse(name, f).map(Some),
        }
    }

    /// Optional nested record built by `f`; its errors are prefixed with `name`
    fn record<T>(
        &self,
        name: &str,
        f: impl FnOnce(&'a TokenMap) -> Result<T, ValidationError>,
    ) -> Result<Option<T>, ValidationError> {
        match self.tokens.get(name) {
            None => Ok(None),
            Some(Token::Map(map)) => f(map).map(Some).map_err(|e| e.within(name)),
            Some(_) => Err(ValidationError::new(name, MSG_NOT_DICT)),
        }
    }

    fn list(&self, name: &str) -> Result<Option<&'a [Token]>, ValidationError> {
        match self.tokens.get(name) {
            None => Ok(None),
            Some(Token::List(items)) => Ok(Some(items)),
            Some(_) => Err(ValidationError::new(name, MSG_NOT_LIST)),
        }
    }

    fn deny_unknown(&self, declared: &[&str]) -> Result<(), ValidationError> {
        match self
            .tokens
            .keys()
            .find(|key| !declared.contains(&key.as_str()))
        {
            Some(key) => Err(ValidationError::new(key.as_str(), MSG_EXTRA_FIELD)),
            None => Ok(()),
        }
    }
}

fn bounded(min: usize, max: usize) -> impl Fn(&str) -> Result<(), String> {
    move |v: &str| length(v, Some(min), Some(max))
}

fn at_least(min: usize) -> impl Fn(&str) -> Result<(), String> {
    move |v: &str| length(v, Some(min), None)
}

// =============================================================================
// Records
// =============================================================================

impl Validator {
    pub fn metadata(&self, tokens: &TokenMap) -> Result<Metadata, ValidationError> {
        let fields = Fields::new(tokens);

        let author = fields.text("author", bounded(2, 48))?;
        let website = fields.parse("website", https_url)?;
        let year = fields.text("year", constraints::year)?;
        let title = fields.text("title", bounded(24, 60))?;
        let description = fields.text("description", bounded(50, 160))?;
        let keywords = fields.text("keywords", constraints::keywords)?;
        let opt_out = fields.optional("opt_out", |v| Ok(v.to_string()))?;
        fields.deny_unknown(META_FIELDS)?;

        Ok(Metadata {
            author,
            website,
            year,
            title,
            description,
            keywords,
            opt_out,
        })
    }

    pub fn introduction(&self, tokens: &TokenMap) -> Result<Introduction, ValidationError> {
        let fields = Fields::new(tokens);

        let content = fields.text("content", bounded(50, 600))?;
        let appendix = fields.record("appendix", |m| self.appendix(m))?;
        fields.deny_unknown(INTRODUCTION_FIELDS)?;

        Ok(Introduction { content, appendix })
    }

    pub fn chapter(&self, tokens: &TokenMap) -> Result<Chapter, ValidationError> {
        let fields = Fields::new(tokens);

        let author = fields.text("author", bounded(2, 48))?;
        let topic = fields.text("topic", bounded(8, 60))?;
        let date = fields.parse("date", constraints::date)?;
        let website = fields.optional("website", https_url)?;
        let appendix = fields.record("appendix", |m| self.appendix(m))?;
        let picture = fields.record("picture", |m| self.picture(m))?;
        let interactive_example = fields.optional("interactive_example", |v| {
            web_path(&self.content_root, v, PathKind::Directory)
        })?;
        let gallery = fields.record("gallery", |m| self.gallery(m))?;
        let quote = fields.record("quote", |m| self.quote(m))?;
        let paragraphs = match fields.list("paragraphs")? {
            Some(items) => paragraphs(items).map_err(|e| e.within("paragraphs"))?,
            None => Vec::new(),
        };
        fields.deny_unknown(CHAPTER_FIELDS)?;

        Ok(Chapter {
            author,
            topic,
            date,
            website,
            appendix,
            picture,
            interactive_example,
            gallery,
            quote,
            paragraphs,
        })
    }

    /// Remote when the value looks like a URL, otherwise a file under the content root
    fn link(&self, value: &str) -> Result<Link, String> {
        if is_url(value) {
            https_url(value).map(Link::Url)
        } else {
            web_path(&self.content_root, value, PathKind::File).map(Link::File)
        }
    }

    fn appendix(&self, tokens: &TokenMap) -> Result<Appendix, ValidationError> {
        let fields = Fields::new(tokens);

        let description = fields.text("description", bounded(3, 48))?;
        let href = fields.parse("href", |v| self.link(v))?;
        fields.deny_unknown(APPENDIX_FIELDS)?;

        Ok(Appendix { description, href })
    }

    fn picture(&self, tokens: &TokenMap) -> Result<Picture, ValidationError> {
        let fields = Fields::new(tokens);

        let src = fields.parse("src", |v| self.link(v))?;
        let height = fields.text("height", at_least(3))?;
        fields.deny_unknown(PICTURE_FIELDS)?;

        Ok(Picture { src, height })
    }

    fn gallery(&self, tokens: &TokenMap) -> Result<Gallery, ValidationError> {
        let fields = Fields::new(tokens);

        let height = fields.text("height", at_least(3))?;
        let items = match fields.list("items")? {
            Some(items) if !items.is_empty() => items,
            Some(_) => return Err(ValidationError::new("items", MSG_MIN_ITEMS)),
            None => return Err(ValidationError::new("items", MSG_FIELD_REQUIRED)),
        };
        let items = self
            .gallery_items(items)
            .map_err(|e| e.within("items"))?;
        fields.deny_unknown(GALLERY_FIELDS)?;

        Ok(Gallery { height, items })
    }

    /// The first item decides whether every item is a URL or a local file
    fn gallery_items(&self, items: &[Token]) -> Result<GalleryItems, ValidationError> {
        fn each<T>(
            items: &[Token],
            f: impl Fn(&str) -> Result<T, String>,
        ) -> Result<Vec<T>, ValidationError> {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_text()
                        .ok_or_else(|| MSG_NOT_STR.to_string())
                        .and_then(&f)
                        .map_err(|msg| ValidationError::new(i, msg))
                })
                .collect()
        }

        let remote = items
            .first()
            .and_then(Token::as_text)
            .is_some_and(is_url);

        if remote {
            each(items, https_url).map(GalleryItems::Urls)
        } else {
            each(items, |v| web_path(&self.content_root, v, PathKind::File))
                .map(GalleryItems::Files)
        }
    }

    fn quote(&self, tokens: &TokenMap) -> Result<Quotation, ValidationError> {
        let fields = Fields::new(tokens);

        let author = fields.text("author", bounded(2, 48))?;
        let content = fields.text("content", at_least(10))?;
        let reference = fields.parse("reference", https_url)?;
        fields.deny_unknown(QUOTE_FIELDS)?;

        Ok(Quotation {
            author,
            content,
            reference,
        })
    }
}

fn paragraphs(items: &[Token]) -> Result<Vec<Paragraph>, ValidationError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Token::Map(map) => paragraph(map).map_err(|e| e.within(i)),
            _ => Err(ValidationError::new(i, MSG_NOT_DICT)),
        })
        .collect()
}

fn paragraph(tokens: &TokenMap) -> Result<Paragraph, ValidationError> {
    let fields = Fields::new(tokens);

    let kind = fields.required_text("type")?;
    let content = fields.required_text("content")?.to_string();

    match kind {
        "text" => Ok(Paragraph::Text(content)),
        "code" => Ok(Paragraph::Code(content)),
        _ => Err(ValidationError::new("type", MSG_PARAGRAPH_KIND)),
    }
}
