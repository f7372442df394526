//! Validated document records
//!
//! Every record here is produced by [`crate::validate`] and never mutated
//! afterwards. Fields are read through accessors; the only way to build a
//! record is to validate a token map.
//!
//! Properties that may point either at a remote resource or at a file under
//! the content root are modelled as enums ([`Link`], [`GalleryItems`]) whose
//! variant is chosen before the record is validated.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// =============================================================================
// Constrained scalars
// =============================================================================

/// A URL whose scheme is `https`, kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HttpsUrl(pub(crate) String);

impl HttpsUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HttpsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A path under the content root, in root-absolute form (`/gallery/a.png`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WebPath(pub(crate) String);

impl WebPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WebPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Either a remote resource or a local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Link {
    Url(HttpsUrl),
    File(WebPath),
}

impl Link {
    pub fn as_str(&self) -> &str {
        match self {
            Link::Url(url) => url.as_str(),
            Link::File(path) => path.as_str(),
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Link::Url(_))
    }
}

// =============================================================================
// Components
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub(crate) author: String,
    pub(crate) website: HttpsUrl,
    pub(crate) year: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) keywords: String,
    pub(crate) opt_out: Option<String>,
}

impl Metadata {
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn website(&self) -> &HttpsUrl {
        &self.website
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn opt_out(&self) -> Option<&str> {
        self.opt_out.as_deref()
    }

    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords.split(' ').collect()
    }

    /// Feature names switched off for this document
    pub fn opt_out_list(&self) -> Vec<&str> {
        self.opt_out
            .as_deref()
            .map(|s| s.split(' ').filter(|f| !f.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Introduction {
    pub(crate) content: String,
    pub(crate) appendix: Option<Appendix>,
}

impl Introduction {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn appendix(&self) -> Option<&Appendix> {
        self.appendix.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appendix {
    pub(crate) description: String,
    pub(crate) href: Link,
}

impl Appendix {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn href(&self) -> &Link {
        &self.href
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Picture {
    pub(crate) src: Link,
    pub(crate) height: String,
}

impl Picture {
    pub fn src(&self) -> &Link {
        &self.src
    }

    pub fn height(&self) -> &str {
        &self.height
    }
}

/// Gallery items share one kind: all remote or all local
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GalleryItems {
    Urls(Vec<HttpsUrl>),
    Files(Vec<WebPath>),
}

impl GalleryItems {
    pub fn len(&self) -> usize {
        match self {
            GalleryItems::Urls(items) => items.len(),
            GalleryItems::Files(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            GalleryItems::Urls(items) => Box::new(items.iter().map(HttpsUrl::as_str)),
            GalleryItems::Files(items) => Box::new(items.iter().map(WebPath::as_str)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub(crate) height: String,
    pub(crate) items: GalleryItems,
}

impl Gallery {
    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn items(&self) -> &GalleryItems {
        &self.items
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quotation {
    pub(crate) author: String,
    pub(crate) content: String,
    pub(crate) reference: HttpsUrl,
}

impl Quotation {
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn reference(&self) -> &HttpsUrl {
        &self.reference
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Paragraph {
    /// Sentence assembled from consecutive lines
    Text(String),
    /// Verbatim block between code fences
    Code(String),
}

impl Paragraph {
    pub fn content(&self) -> &str {
        match self {
            Paragraph::Text(s) | Paragraph::Code(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub(crate) author: String,
    pub(crate) topic: String,
    pub(crate) date: NaiveDate,
    pub(crate) website: Option<HttpsUrl>,
    pub(crate) appendix: Option<Appendix>,
    pub(crate) picture: Option<Picture>,
    #[serde(rename = "interactive-example")]
    pub(crate) interactive_example: Option<WebPath>,
    pub(crate) gallery: Option<Gallery>,
    pub(crate) quote: Option<Quotation>,
    pub(crate) paragraphs: Vec<Paragraph>,
}

impl Chapter {
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn website(&self) -> Option<&HttpsUrl> {
        self.website.as_ref()
    }

    pub fn appendix(&self) -> Option<&Appendix> {
        self.appendix.as_ref()
    }

    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    pub fn interactive_example(&self) -> Option<&WebPath> {
        self.interactive_example.as_ref()
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    pub fn quote(&self) -> Option<&Quotation> {
        self.quote.as_ref()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

// =============================================================================
// Document
// =============================================================================

/// A fully validated journal file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub(crate) meta: Metadata,
    pub(crate) introduction: Introduction,
    pub(crate) chapters: Vec<Chapter>,
}

impl Document {
    /// Assemble a document; fails unless every non-leading component became a chapter
    pub(crate) fn assemble(
        meta: Metadata,
        introduction: Introduction,
        chapters: Vec<Chapter>,
        component_count: usize,
    ) -> Option<Self> {
        if component_count.checked_sub(2) != Some(chapters.len()) {
            return None;
        }
        Some(Self {
            meta,
            introduction,
            chapters,
        })
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn introduction(&self) -> &Introduction {
        &self.introduction
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Title, chapter topics and text paragraphs as one string
    pub fn content_text(&self) -> String {
        let mut parts = vec![self.meta.title.as_str()];
        for chapter in &self.chapters {
            parts.push(&chapter.topic);
            parts.extend(chapter.paragraphs.iter().filter_map(|p| match p {
                Paragraph::Text(s) => Some(s.as_str()),
                Paragraph::Code(_) => None,
            }));
        }
        parts.join(" ")
    }

    /// Number of distinct keywords across both documents; lower means closer
    pub fn keywords_match_index(&self, other: &Document) -> usize {
        self.meta
            .keyword_list()
            .into_iter()
            .chain(other.meta.keyword_list())
            .collect::<HashSet<_>>()
            .len()
    }
}
