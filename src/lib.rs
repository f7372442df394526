//! Journal Compiler
//!
//! Compiles `.journal` markup files into validated [`Document`] records for
//! downstream renderers. Each file is a sequence of components: exactly one
//! `/meta`, exactly one `/introduction`, then any number of `/chapter`s.
//!
//! ## Pipeline
//!
//! ```text
//! file ─► LineSource ─► Chunker ─► tokenize ─► validate ─► Compiler ─► Document
//!          (rewind)     (chunks)   (tokens)    (records)   (ordering)
//! ```
//!
//! Every failure becomes one [`JournalError`] whose `Display` text is the
//! diagnostic shown to the author. A file with any error yields no document.
//!
//! ## Example
//!
//! ```text
//! /meta
//! author: Robin Gruenke
//! website: https://www.robingruenke.com
//! year: 2021
//! title: What about Elm and functional programming
//! description: A journal about the Elm language and why it makes frontend work enjoyable
//! keywords: elm functional frontend language journal
//!
//! /introduction
//!
//! Elm is a delightful language for reliable web applications ...
//!
//! /chapter
//! author: Robin Gruenke
//! topic: Preface: What about Elm ?
//! date: 2020-12-29
//! picture: 250px gallery/elm.png
//!
//! First paragraph.
//!
//! |code
//! main = text "hello"
//! code|
//! ---
//! drafts below the marker are ignored
//! ```

pub mod batch;
pub mod chunk;
pub mod compiler;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod source;
pub mod tokenize;
pub mod validate;

pub use batch::{compile_files, discover, BatchSummary, FileReport};
pub use chunk::{Chunk, Chunker};
pub use compiler::{Compilation, Compiler};
pub use config::JournalConfig;
pub use error::{Error, JournalError, Result};
pub use features::Features;
pub use model::{
    Appendix, Chapter, Document, Gallery, GalleryItems, HttpsUrl, Introduction, Link, Metadata,
    Paragraph, Picture, Quotation, WebPath,
};
pub use source::LineSource;
pub use tokenize::{ComponentKind, Token, TokenMap};
pub use validate::{ValidationError, Validator};
