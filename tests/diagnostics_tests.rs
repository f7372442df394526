//! Diagnostic wording
//!
//! Every diagnostic string is shown to authors verbatim, so these tests pin
//! the exact text for each failure class.

use std::path::{Path, PathBuf};

use journal_compiler::{Compiler, JournalError};

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

const CHAPTER_HEAD: &str = "/chapter
author: Robin Gruenke
topic: Preface: What about Elm ?
date: 2020-12-29
";

fn site_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

fn errors(text: &str) -> Vec<String> {
    let result = Compiler::new(site_root()).compile_str(text);
    assert!(result.document.is_none(), "expected no document for:\n{}", text);
    result.errors.iter().map(JournalError::to_string).collect()
}

fn first_error(text: &str) -> String {
    errors(text).into_iter().next().expect("at least one error")
}

/// A valid document whose only chapter carries `extra` property lines
fn chapter_with(extra: &str) -> String {
    format!("{}{}{}{}\nSome text.\n", META, INTRODUCTION, CHAPTER_HEAD, extra)
}

// =============================================================================
// Tokenization
// =============================================================================

#[test]
fn test_property_notation() {
    assert_eq!(
        first_error("/meta\nno property\n"),
        "Error in /meta properties: expected property notation but found: \"no property\""
    );
}

#[test]
fn test_missing_space_after_colon() {
    assert_eq!(
        first_error("/meta\nprop:value:withcolon\n"),
        "Error in /meta properties: expected space after first colon: \"prop:value:withcolon\""
    );
}

#[test]
fn test_duplicate_property() {
    assert_eq!(
        first_error("/meta\nauthor: Robin Gruenke\nauthor: Robin Gruenke\n"),
        "Error in /meta properties: duplicate of field: \"author: Robin Gruenke\""
    );
}

#[test]
fn test_meta_overflow() {
    let text = META.replace("journal\n\n", "journal\n\nsome text\n");
    assert_eq!(
        first_error(&text),
        "Error in /meta properties: Properties were terminated by blank line, \
         overflowing content not allowed: \"some text\""
    );
}

#[test]
fn test_inline_hints() {
    assert_eq!(
        first_error(&chapter_with("appendix: [What is Elm ? https://en.wikipedia.org\n")),
        "Error in /chapter properties: ensure this value has valid syntax: \"appendix\", \
         like this: \"[description] https://www.robingruenke.com\""
    );
    assert_eq!(
        first_error(&chapter_with("picture: 250p /gallery /img.jpeg\n")),
        "Error in /chapter properties: ensure this value has valid syntax: \"picture\", \
         like this: \"250px /gallery/img.png\""
    );
    assert_eq!(
        first_error(&chapter_with("gallery: 75p\n")),
        "Error in /chapter properties: ensure this value has valid syntax: \"gallery\", \
         like this: \"45px /gallery/img_1.png /gallery/img_2.png\""
    );
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_meta_errors_name_the_field_only() {
    let text = format!(
        "{}{}",
        META.replace("https://www.robingruenke.com", "http://www.robingruenke.com"),
        INTRODUCTION
    );
    assert_eq!(
        first_error(&text),
        "Error in /meta properties: URL scheme not permitted: \"website\""
    );

    let text = format!("{}{}", META.replace("year: 2021\n", ""), INTRODUCTION);
    assert_eq!(
        first_error(&text),
        "Error in /meta properties: field required: \"year\""
    );
}

#[test]
fn test_introduction_too_short() {
    let text = format!("{}/introduction\n\nshort intro\n", META);
    assert_eq!(
        first_error(&text),
        "Error in /introduction: ensure this value has at least 50 characters: \
         \"content: short intro (len=11)\""
    );
}

#[test]
fn test_chapter_date() {
    let text = chapter_with("").replace("date: 2020-12-29", "date: abc");
    assert_eq!(
        first_error(&text),
        "Error in /chapter: invalid date format: \"date: abc (len=3)\""
    );
}

#[test]
fn test_chapter_appendix_scheme() {
    assert_eq!(
        first_error(&chapter_with("appendix: [abc] http://www.robingruenke.com\n")),
        "Error in /chapter: URL scheme not permitted: \"appendix->href: http://www.rob... (len=27)\""
    );
}

#[test]
fn test_chapter_gallery_mixed_items() {
    assert_eq!(
        first_error(&chapter_with(
            "gallery: 3px https://www.robingruenke.com gallery/sample.jpg\n"
        )),
        "Error in /chapter: invalid or missing URL scheme: \
         \"gallery->items->1: gallery/sample... (len=18)\""
    );
}

#[test]
fn test_chapter_missing_picture() {
    let path = site_root().join("gallery/missing.png");
    assert_eq!(
        first_error(&chapter_with("picture: 250px gallery/missing.png\n")),
        format!(
            "Error in /chapter: file or directory at path \"{}\" does not exist: \
             \"picture->src: gallery/missin... (len=19)\"",
            path.display()
        )
    );
}

#[test]
fn test_chapter_dir_navigation() {
    assert_eq!(
        first_error(&chapter_with("interactive-example: ../site\n")),
        "Error in /chapter: dir navigation not allowed: \"interactive-example: ../site (len=7)\""
    );
}

#[test]
fn test_chapter_unknown_property() {
    assert_eq!(
        first_error(&chapter_with("unknown: abc\n")),
        "Error in /chapter: extra fields not permitted: \"unknown: abc (len=3)\""
    );
}

// =============================================================================
// Assembly
// =============================================================================

#[test]
fn test_every_component_reports() {
    let broken = format!("{}date: abc\n\ntext\n", CHAPTER_HEAD.replace("date: 2020-12-29\n", ""));
    let text = format!("{}{}{}/outro\n{}", META, INTRODUCTION, broken, broken);

    assert_eq!(
        errors(&text),
        vec![
            "Error in /chapter: invalid date format: \"date: abc (len=3)\"".to_string(),
            "Error: Tokenizer for \"/outro\" not implemented".to_string(),
            "Error in /chapter: invalid date format: \"date: abc (len=3)\"".to_string(),
        ]
    );
}

#[test]
fn test_missing_introduction() {
    let text = format!("{}{}\ntext\n", META, CHAPTER_HEAD);
    assert_eq!(
        errors(&text),
        vec!["Error: Second component expected to be /introduction component".to_string()]
    );
}

#[test]
fn test_repeated_meta() {
    let text = format!("{}{}{}", META, INTRODUCTION, META);
    assert_eq!(
        errors(&text),
        vec!["Error: /meta component may appear only once".to_string()]
    );
}
