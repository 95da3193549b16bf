//! Host configuration loaded from TOML.
//!
//! ```toml
//! locale = "fr"
//! data_file = "records.json"
//!
//! [search]
//! record_search_limit = 50
//! default_sort = "last_changed_desc"
//!
//! [translations.fr]
//! "Most relevant" = "Les plus pertinents"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelter_search::{MessageCatalog, SearchConfig, SearchContext};

use crate::error::{HostError, Result};

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Locale for explanations and sort labels.
    pub locale: String,
    /// JSON file of records per result type.
    pub data_file: PathBuf,
    pub search: SearchConfig,
    /// locale → English message → translated message.
    pub translations: HashMap<String, HashMap<String, String>>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_owned(),
            data_file: PathBuf::from("records.json"),
            search: SearchConfig::default(),
            translations: HashMap::new(),
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `data_file` is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| HostError::Config(e.to_string()))?;
        if config.data_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_file = dir.join(&config.data_file);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the host settings and the embedded search settings.
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(HostError::Config("locale must not be empty".into()));
        }
        self.search.validate()?;
        Ok(())
    }

    /// The per-call search context for this host.
    pub fn search_context(&self) -> SearchContext {
        SearchContext::new(self.locale.clone(), self.search.clone())
    }

    /// Message catalogue built from `translations`.
    pub fn catalog(&self) -> MessageCatalog {
        MessageCatalog::from_messages(self.translations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelter_search::{SortMode, Translator};

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("shelter.toml");
        std::fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn defaults_are_valid() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locale, "en");
        assert_eq!(config.search.record_search_limit, 100);
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            r#"
locale = "fr"

[search]
default_sort = "last_changed_desc"

[translations.fr]
"Most recently changed" = "Modifiés récemment"
"#,
        );
        let config = HostConfig::from_file(&path).expect("load config");
        assert_eq!(config.locale, "fr");
        assert_eq!(config.search.default_sort, SortMode::LastChangedDesc);
        assert_eq!(config.search.record_search_limit, 100);
        assert_eq!(config.data_file, dir.path().join("records.json"));

        let label = config
            .catalog()
            .translate("Most recently changed", "fr", &[])
            .expect("translate");
        assert_eq!(label, "Modifiés récemment");
    }

    #[test]
    fn absolute_data_file_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "data_file = \"/srv/shelter/records.json\"\n");
        let config = HostConfig::from_file(&path).expect("load config");
        assert_eq!(config.data_file, PathBuf::from("/srv/shelter/records.json"));
    }

    #[test]
    fn invalid_search_settings_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "[search]\nrecord_search_limit = 0\n");
        let err = HostConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("record_search_limit"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "locale = [unterminated");
        assert!(matches!(HostConfig::from_file(&path), Err(HostError::Config(_))));
    }

    #[test]
    fn empty_locale_rejected() {
        let config = HostConfig {
            locale: " ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn search_context_carries_locale() {
        let config = HostConfig {
            locale: "de".into(),
            ..Default::default()
        };
        let context = config.search_context();
        assert_eq!(context.locale, "de");
        assert_eq!(context.config, config.search);
    }
}
