//! Field constraints
//!
//! Each check returns the exact message reported to the author. Messages are
//! plain strings; the caller attaches the field path.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use url::{Host, Url};

use crate::model::{HttpsUrl, WebPath};

static URL_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+://").unwrap());
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+\-.]*)://").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4}|[0-9]{4} - [0-9]{4})$").unwrap());

pub const ALLOWED_SCHEMES: &[&str] = &["https"];
const URL_MAX_LENGTH: usize = 1 << 16;

pub const MSG_URL_SCHEME_MISSING: &str = "invalid or missing URL scheme";
pub const MSG_URL_SCHEME_NOT_PERMITTED: &str = "URL scheme not permitted";
pub const MSG_URL_HOST_INVALID: &str = "URL host invalid";
pub const MSG_URL_TLD_REQUIRED: &str = "URL host invalid, top level domain required";
pub const MSG_DIR_NAVIGATION: &str = "dir navigation not allowed";
pub const MSG_DATE_FORMAT: &str = "invalid date format";
pub const MSG_YEAR_FORMAT: &str =
    "ensure this value has these formats of integers \"2020 - 2021\" or \"2020\"";
pub const MSG_KEYWORDS_SHAPE: &str =
    "ensure this value has exactly 5 words with at least 3 characters and up to 16 for each word";
pub const MSG_KEYWORDS_DUPLICATES: &str = "ensure this value has no duplicates in it";

/// What a local path must point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Looks like `scheme://...`; used to pick the URL or file variant of a field
pub fn is_url(value: &str) -> bool {
    URL_LIKE_RE.is_match(value)
}

/// Character-count bounds, min checked first
pub fn length(value: &str, min: Option<usize>, max: Option<usize>) -> Result<(), String> {
    let len = value.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(format!("ensure this value has at least {} characters", min));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("ensure this value has at most {} characters", max));
        }
    }
    Ok(())
}

/// An absolute URL with an `https` scheme and a host with a top level domain
pub fn https_url(value: &str) -> Result<HttpsUrl, String> {
    let value = value.trim();
    length(value, Some(1), Some(URL_MAX_LENGTH))?;

    let scheme = SCHEME_RE
        .captures(value)
        .map(|caps| caps[1].to_lowercase())
        .ok_or(MSG_URL_SCHEME_MISSING)?;

    if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
        return Err(MSG_URL_SCHEME_NOT_PERMITTED.to_string());
    }

    let parsed = Url::parse(value).map_err(|_| MSG_URL_HOST_INVALID)?;
    match parsed.host() {
        None => Err(MSG_URL_HOST_INVALID.to_string()),
        Some(Host::Domain(domain)) if !domain.trim_end_matches('.').contains('.') => {
            Err(MSG_URL_TLD_REQUIRED.to_string())
        }
        Some(_) => Ok(HttpsUrl(value.to_string())),
    }
}

/// A path below `root` that exists and has the expected kind.
///
/// Absolute paths and any `..` segment are rejected before touching the
/// filesystem. The result is the root-absolute form (`/gallery/a.png`).
pub fn web_path(root: &Path, value: &str, kind: PathKind) -> Result<WebPath, String> {
    if value.starts_with('/') || value.split('/').any(|segment| segment == "..") {
        return Err(MSG_DIR_NAVIGATION.to_string());
    }

    let full = root.join(value);
    let shown = full.display();

    if !full.exists() {
        return Err(format!("file or directory at path \"{}\" does not exist", shown));
    }

    match kind {
        PathKind::File if !full.is_file() => {
            Err(format!("path \"{}\" does not point to a file", shown))
        }
        PathKind::Directory if !full.is_dir() => {
            Err(format!("path \"{}\" does not point to a directory", shown))
        }
        _ => Ok(WebPath(format!("/{}", value))),
    }
}

/// `YYYY-MM-DD` naming a real calendar day
pub fn date(value: &str) -> Result<NaiveDate, String> {
    let caps = DATE_RE.captures(value).ok_or(MSG_DATE_FORMAT)?;
    let year: i32 = caps[1].parse().map_err(|_| MSG_DATE_FORMAT)?;
    let month: u32 = caps[2].parse().map_err(|_| MSG_DATE_FORMAT)?;
    let day: u32 = caps[3].parse().map_err(|_| MSG_DATE_FORMAT)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| MSG_DATE_FORMAT.to_string())
}

/// `2020` or `2020 - 2021`
pub fn year(value: &str) -> Result<(), String> {
    length(value, Some(4), None)?;
    if !YEAR_RE.is_match(value) {
        return Err(MSG_YEAR_FORMAT.to_string());
    }
    Ok(())
}

/// Exactly five space-separated words of 3..=16 characters, all distinct
pub fn keywords(value: &str) -> Result<(), String> {
    let words: Vec<&str> = value.split(' ').collect();

    let well_formed = words.len() == 5
        && words
            .iter()
            .all(|w| (3..=16).contains(&w.chars().count()));
    if !well_formed {
        return Err(MSG_KEYWORDS_SHAPE.to_string());
    }

    if words.iter().collect::<HashSet<_>>().len() != words.len() {
        return Err(MSG_KEYWORDS_DUPLICATES.to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://example.com"));
        assert!(!is_url("gallery/img.png"));
        assert!(!is_url("HTTPS://example.com"));
    }

    #[test]
    fn test_length() {
        assert!(length("ab", Some(2), Some(48)).is_ok());
        assert_eq!(
            length("a", Some(2), Some(48)).unwrap_err(),
            "ensure this value has at least 2 characters"
        );
        assert_eq!(
            length(&"a".repeat(49), Some(2), Some(48)).unwrap_err(),
            "ensure this value has at most 48 characters"
        );
    }

    #[test]
    fn test_https_url() {
        assert_eq!(
            https_url("https://www.robingruenke.com").unwrap().as_str(),
            "https://www.robingruenke.com"
        );
        assert_eq!(https_url("abcdefg").unwrap_err(), MSG_URL_SCHEME_MISSING);
        assert_eq!(
            https_url("http://www.robingruenke.com").unwrap_err(),
            MSG_URL_SCHEME_NOT_PERMITTED
        );
        assert_eq!(https_url("https://localhost").unwrap_err(), MSG_URL_TLD_REQUIRED);
        assert_eq!(
            https_url("").unwrap_err(),
            "ensure this value has at least 1 characters"
        );
    }

    #[test]
    fn test_web_path_rejects_navigation() {
        let root = tempdir().unwrap();
        for value in ["../gallery/sample.jpg", "/gallery/sample.jpg", "a/../../b"] {
            assert_eq!(
                web_path(root.path(), value, PathKind::File).unwrap_err(),
                MSG_DIR_NAVIGATION
            );
        }
    }

    #[test]
    fn test_web_path_kinds() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("gallery")).unwrap();
        fs::write(root.path().join("gallery/sample.jpg"), b"jpg").unwrap();

        let ok = web_path(root.path(), "gallery/sample.jpg", PathKind::File).unwrap();
        assert_eq!(ok.as_str(), "/gallery/sample.jpg");

        let dir = web_path(root.path(), "gallery", PathKind::Directory).unwrap();
        assert_eq!(dir.as_str(), "/gallery");

        let not_file = web_path(root.path(), "gallery", PathKind::File).unwrap_err();
        assert!(not_file.ends_with("does not point to a file"));

        let not_dir = web_path(root.path(), "gallery/sample.jpg", PathKind::Directory).unwrap_err();
        assert!(not_dir.ends_with("does not point to a directory"));

        let missing = web_path(root.path(), "abc", PathKind::File).unwrap_err();
        assert_eq!(
            missing,
            format!(
                "file or directory at path \"{}\" does not exist",
                root.path().join("abc").display()
            )
        );
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("2020-12-29").unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 29).unwrap()
        );
        assert_eq!(date("abc").unwrap_err(), MSG_DATE_FORMAT);
        assert_eq!(date("2020-24-31").unwrap_err(), MSG_DATE_FORMAT);
        assert_eq!(date("07.03.2020").unwrap_err(), MSG_DATE_FORMAT);
    }

    #[test]
    fn test_year() {
        assert!(year("2021").is_ok());
        assert!(year("2020 - 2021").is_ok());
        assert_eq!(year("").unwrap_err(), "ensure this value has at least 4 characters");
        assert_eq!(year("20144").unwrap_err(), MSG_YEAR_FORMAT);
        assert_eq!(year("abcd").unwrap_err(), MSG_YEAR_FORMAT);
    }

    #[test]
    fn test_keywords() {
        assert!(keywords("html text python generate tool").is_ok());
        assert_eq!(keywords("").unwrap_err(), MSG_KEYWORDS_SHAPE);
        assert_eq!(keywords("abc def").unwrap_err(), MSG_KEYWORDS_SHAPE);
        assert_eq!(keywords("ab ded ca a gty").unwrap_err(), MSG_KEYWORDS_SHAPE);
        assert_eq!(keywords("abf dew cax gef gta tya").unwrap_err(), MSG_KEYWORDS_SHAPE);
        assert_eq!(keywords("abc abc cax gef gta").unwrap_err(), MSG_KEYWORDS_DUPLICATES);
    }
}
