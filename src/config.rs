//! Configuration management for the journal compiler
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (journal.toml)
//! - Environment variables (JOURNAL__*)
//!
//! ## Example config file (journal.toml):
//! ```toml
//! [content]
//! root = "site"
//!
//! [compile]
//! journal_dir = "journal"
//! extension = "journal"
//! parallel = true
//! verbose = false
//!
//! [features]
//! feedback = true
//! subscriptions = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::features::Features;

/// Main configuration for the journal compiler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Content root settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Compilation settings
    #[serde(default)]
    pub compile: CompileConfig,

    /// Default feature flags for every document
    #[serde(default)]
    pub features: Features,
}

/// Where local hrefs, picture sources and gallery items resolve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory that root-relative paths resolve against
    #[serde(default = "default_content_root")]
    pub root: PathBuf,
}

/// Compilation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Directory searched for journal files, relative to the content root
    #[serde(default = "default_journal_dir")]
    pub journal_dir: PathBuf,

    /// File extension of journal files (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Compile files on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Report every error of a file instead of only the first
    #[serde(default)]
    pub verbose: bool,
}

// Default value functions
fn default_content_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_journal_dir() -> PathBuf {
    PathBuf::from("journal")
}

fn default_extension() -> String {
    "journal".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            journal_dir: default_journal_dir(),
            extension: default_extension(),
            parallel: true,
            verbose: false,
        }
    }
}

impl JournalConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["journal.toml", ".journal.toml", "config/journal.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "journal", "journal") {
            let xdg_config = config_dir.config_dir().join("journal.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // JOURNAL__COMPILE__PARALLEL=false
        builder = builder.add_source(
            Environment::with_prefix("JOURNAL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Directory searched for journal files
    pub fn journal_dir(&self) -> PathBuf {
        if self.compile.journal_dir.is_absolute() {
            self.compile.journal_dir.clone()
        } else {
            self.content.root.join(&self.compile.journal_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{CHAPTER_INDEX, FEEDBACK, JOURNAL_LIKE, SUBSCRIPTIONS};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = JournalConfig::default();
        assert_eq!(config.content.root, PathBuf::from("."));
        assert_eq!(config.compile.extension, "journal");
        assert!(config.compile.parallel);
        assert!(!config.compile.verbose);
        assert!(!config.features.enabled(SUBSCRIPTIONS));
        assert_eq!(config.journal_dir(), PathBuf::from("./journal"));
    }

    #[test]
    fn test_serialize_config() {
        let toml_str = JournalConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[content]"));
        assert!(toml_str.contains("[compile]"));
        assert!(toml_str.contains("[features]"));
        assert!(toml_str.contains("journal-like = true"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[content]\nroot = \"site\"\n\n[compile]\nverbose = true\n\n[features]\nfeedback = false\n",
        )
        .unwrap();

        let config = JournalConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.content.root, PathBuf::from("site"));
        assert!(config.compile.verbose);
        assert_eq!(config.compile.extension, "journal");
        assert!(!config.features.enabled("feedback"));
    }

    #[test]
    fn test_features_table_overlays_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[features]\nfeedback = false\n").unwrap();

        let config = JournalConfig::load_from(Some(&path)).unwrap();
        assert!(!config.features.enabled(FEEDBACK));
        assert!(config.features.enabled(JOURNAL_LIKE));
        assert!(config.features.enabled(CHAPTER_INDEX));
        assert!(!config.features.enabled(SUBSCRIPTIONS));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.toml");

        let mut config = JournalConfig::default();
        config.compile.parallel = false;
        config.save(&path).unwrap();

        let loaded = JournalConfig::load_from(Some(&path)).unwrap();
        assert!(!loaded.compile.parallel);
    }
}
