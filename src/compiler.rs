//! Document Assembler
//!
//! Drives chunker → tokenizer → validator over one journal file and enforces
//! component order:
//!
//! ```text
//! AwaitingMetadata ─► AwaitingIntroduction ─► CollectingChapters* ─► Done
//! ```
//!
//! A component in the wrong position is reported and then still compiled as
//! whatever it actually is, so one pass surfaces as many independent errors
//! as possible. A [`Document`] is produced only when no component was lost.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::chunk::{Chunk, Chunker};
use crate::error::{JournalError, Result};
use crate::model::{Chapter, Document, Introduction, Metadata};
use crate::tokenize::{tokenize_component, ComponentKind};
use crate::validate::{Component, Validator};

/// Result of compiling one file: the errors in the order they were found,
/// and the document if every component compiled
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub document: Option<Document>,
    pub errors: Vec<JournalError>,
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingMetadata,
    AwaitingIntroduction,
    CollectingChapters,
}

impl Stage {
    fn advance(self) -> Self {
        match self {
            Stage::AwaitingMetadata => Stage::AwaitingIntroduction,
            Stage::AwaitingIntroduction | Stage::CollectingChapters => Stage::CollectingChapters,
        }
    }
}

/// Per-file assembly state
struct Assembler<'v> {
    validator: &'v Validator,
    stage: Stage,
    component_count: usize,
    singletons_seen: HashSet<ComponentKind>,
    meta: Option<Metadata>,
    introduction: Option<Introduction>,
    chapters: Vec<Chapter>,
    errors: Vec<JournalError>,
}

impl<'v> Assembler<'v> {
    fn new(validator: &'v Validator) -> Self {
        Self {
            validator,
            stage: Stage::AwaitingMetadata,
            component_count: 0,
            singletons_seen: HashSet::new(),
            meta: None,
            introduction: None,
            chapters: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn check_position(&mut self, id: &str) {
        let error = match self.stage {
            Stage::AwaitingMetadata if id != ComponentKind::Meta.id() => JournalError::MetaNotFirst,
            Stage::AwaitingIntroduction if id != ComponentKind::Introduction.id() => {
                JournalError::IntroductionNotSecond
            }
            _ => return,
        };

        warn!(component = id, position = self.component_count, "component out of order");
        self.errors.push(error);
    }

    fn accept(&mut self, chunk: &Chunk) {
        let id = chunk.component_id();
        debug!(component = id, lines = chunk.lines().len(), "compiling component");

        self.check_position(id);
        self.stage = self.stage.advance();
        self.component_count += 1;

        // Dispatch on the component's own name, not its position
        let Some(kind) = ComponentKind::from_id(id) else {
            self.errors
                .push(JournalError::TokenizerNotImplemented(id.to_string()));
            return;
        };

        if kind != ComponentKind::Chapter && !self.singletons_seen.insert(kind) {
            warn!(component = id, "repeated component");
            self.errors
                .push(JournalError::DuplicateComponent(id.to_string()));
            return;
        }

        let compiled = tokenize_component(kind, chunk)
            .and_then(|tokens| self.validator.validate(kind, &tokens));

        match compiled {
            Ok(Component::Meta(meta)) => self.meta = Some(meta),
            Ok(Component::Introduction(introduction)) => self.introduction = Some(introduction),
            Ok(Component::Chapter(chapter)) => self.chapters.push(chapter),
            Err(e) => {
                debug!(component = id, error = %e, "component rejected");
                self.errors.push(e);
            }
        }
    }

    fn finish(self) -> Compilation {
        let document = match (self.meta, self.introduction) {
            // Ordering errors alone can leave every component compiled
            _ if !self.errors.is_empty() => None,
            (Some(meta), Some(introduction)) => {
                Document::assemble(meta, introduction, self.chapters, self.component_count)
            }
            _ => None,
        };

        Compilation {
            document,
            errors: self.errors,
        }
    }
}

/// Compiles journal files against one content root
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    validator: Validator,
}

impl Compiler {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            validator: Validator::new(content_root),
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Compile everything a reader yields up to the first draft marker
    pub fn compile_reader<R: BufRead>(&self, reader: R) -> Result<Compilation> {
        let mut assembler = Assembler::new(&self.validator);
        for chunk in Chunker::new(reader) {
            assembler.accept(&chunk?);
        }
        Ok(assembler.finish())
    }

    pub fn compile_str(&self, text: &str) -> Compilation {
        let mut assembler = Assembler::new(&self.validator);
        for chunk in Chunker::new(text.as_bytes()).flatten() {
            assembler.accept(&chunk);
        }
        assembler.finish()
    }

    pub fn compile_path(&self, path: &Path) -> Result<Compilation> {
        let file = File::open(path)?;
        self.compile_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = "/meta
author: Robin Gruenke
website: https://www.robingruenke.com
year: 2021
title: What about Elm and functional programming
description: A journal about the Elm language and why it makes frontend work enjoyable
keywords: elm functional frontend language journal

";

    const INTRODUCTION: &str = "/introduction

Elm is a delightful language for reliable web applications. This journal
collects notes from using it in production.

";

    const CHAPTER: &str = "/chapter
author: Robin Gruenke
topic: Preface: What about Elm ?
date: 2020-12-29

Some text.

";

    fn compile(text: &str) -> Compilation {
        Compiler::default().compile_str(text)
    }

    #[test]
    fn test_complete_document() {
        let text = format!("{}{}{}{}", META, INTRODUCTION, CHAPTER, CHAPTER);
        let result = compile(&text);

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let document = result.document.unwrap();
        assert_eq!(document.chapters().len(), 2);
        assert_eq!(document.meta().year(), "2021");
    }

    #[test]
    fn test_introduction_only_document() {
        let result = compile(&format!("{}{}", META, INTRODUCTION));
        assert!(result.is_success());
        assert!(result.document.unwrap().chapters().is_empty());
    }

    #[test]
    fn test_missing_introduction() {
        let result = compile(&format!("{}{}", META, CHAPTER));

        assert!(result.document.is_none());
        assert_eq!(result.errors, vec![JournalError::IntroductionNotSecond]);
    }

    #[test]
    fn test_meta_not_first() {
        let result = compile(&format!("{}{}{}", INTRODUCTION, META, CHAPTER));

        assert!(result.document.is_none());
        assert_eq!(
            result.errors,
            vec![JournalError::MetaNotFirst, JournalError::IntroductionNotSecond]
        );
    }

    #[test]
    fn test_repeated_introduction_is_reported() {
        let text = format!("{}{}{}{}", META, INTRODUCTION, INTRODUCTION, CHAPTER);
        let result = compile(&text);

        assert!(result.document.is_none());
        assert_eq!(
            result.errors,
            vec![JournalError::DuplicateComponent("/introduction".to_string())]
        );
    }

    #[test]
    fn test_repeated_meta_is_reported() {
        let text = format!("{}{}{}", META, INTRODUCTION, META);
        let result = compile(&text);

        assert!(result.document.is_none());
        assert_eq!(
            result.errors,
            vec![JournalError::DuplicateComponent("/meta".to_string())]
        );
    }

    #[test]
    fn test_unknown_component() {
        let text = format!("{}{}/outro\nsomething\n", META, INTRODUCTION);
        let result = compile(&text);

        assert!(result.document.is_none());
        assert_eq!(
            result.errors,
            vec![JournalError::TokenizerNotImplemented("/outro".to_string())]
        );
    }

    #[test]
    fn test_errors_collected_across_components() {
        let broken = CHAPTER.replace("date: 2020-12-29", "date: 2020-24-31");
        let text = format!("{}{}{}{}", META, INTRODUCTION, broken, broken);
        let result = compile(&text);

        assert!(result.document.is_none());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(
            result.errors[0].to_string(),
            "Error in /chapter: invalid date format: \"date: 2020-24-31 (len=10)\""
        );
    }

    #[test]
    fn test_draft_marker_ends_document() {
        let text = format!("{}{}---\n{}", META, INTRODUCTION, "/chapter\nbroken\n");
        let result = compile(&text);
        assert!(result.is_success());
    }

    #[test]
    fn test_empty_input() {
        let result = compile("");
        assert!(result.document.is_none());
        assert!(result.errors.is_empty());
    }
}
