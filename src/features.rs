//! Per-document feature flags
//!
//! Renderers switch optional page sections on and off through these flags.
//! The configured defaults apply to every document; a document can switch
//! flags off through its metadata `opt-out` property.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::Metadata;

pub const FEEDBACK: &str = "feedback";
pub const JOURNAL_LIKE: &str = "journal-like";
pub const INTERACTIVE_EXAMPLE: &str = "interactive-example";
pub const RELATED_TOPICS: &str = "related-topics";
pub const MISSING_CHAPTERS_HINT: &str = "missing-chapters-hint";
pub const CHAPTER_INDEX: &str = "chapter-index";
pub const SUBSCRIPTIONS: &str = "subscriptions";

/// Flag name → enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Features(BTreeMap<String, bool>);

impl Default for Features {
    fn default() -> Self {
        [
            (FEEDBACK, true),
            (JOURNAL_LIKE, true),
            (INTERACTIVE_EXAMPLE, true),
            (RELATED_TOPICS, true),
            (MISSING_CHAPTERS_HINT, true),
            (CHAPTER_INDEX, true),
            (SUBSCRIPTIONS, false),
        ]
        .into_iter()
        .collect()
    }
}

/// A `[features]` table only overrides the flags it names
impl<'de> Deserialize<'de> for Features {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut features = Features::default();
        for (name, enabled) in overrides {
            features.set(name, enabled);
        }
        Ok(features)
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Features {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Features {
    /// Flags for one document: `defaults` minus everything it opts out of.
    ///
    /// Opt-out names without a default are recorded as disabled.
    pub fn resolve(defaults: &Features, meta: &Metadata) -> Self {
        let mut features = defaults.clone();
        for name in meta.opt_out_list() {
            features.set(name, false);
        }
        features
    }

    /// Unknown flags are disabled
    pub fn enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
