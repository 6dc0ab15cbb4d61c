//! TOML configuration for every MedSearch front end.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration. Unknown keys are rejected to surface typos.
//!
//! ```toml
//! [search]
//! debounce_ms = 300
//! min_query_chars = 2
//!
//! [catalog]
//! data_file = "data/catalog.json"
//!
//! [[auth.accounts]]
//! email = "test@example.com"
//! password_sha256 = "..."
//!
//! [upload]
//! max_bytes = 10485760
//! allowed_extensions = ["xlsx", "xls", "csv"]
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use medsearch_contracts::error::{MedSearchError, MedSearchResult};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MedSearchConfig {
    pub search: SearchSettings,
    pub auth: AuthSettings,
    pub catalog: CatalogSettings,
    pub upload: UploadSettings,
}

/// Suggestion debouncing knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before suggestions are fetched.
    pub debounce_ms: u64,
    /// Queries shorter than this (in characters) never trigger a lookup.
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
        }
    }
}

impl SearchSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// One login account. Passwords are stored as a SHA-256 hex digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub email: String,
    pub password_sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// Empty means "use the built-in test account".
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSettings {
    /// JSON file with `drugs`, `insurances` and `sales`. `None` selects the
    /// built-in mock dataset.
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadSettings {
    pub max_bytes: u64,
    /// Lowercase file extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_extensions: vec!["xlsx".to_string(), "xls".to_string(), "csv".to_string()],
        }
    }
}

impl MedSearchConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `MedSearchError::ConfigError` if the document is malformed or
    /// fails validation.
    pub fn from_toml_str(s: &str) -> MedSearchResult<Self> {
        let config: MedSearchConfig = toml::from_str(s).map_err(|e| MedSearchError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    pub fn from_file(path: &Path) -> MedSearchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedSearchError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` when given, otherwise fall back to the defaults.
    pub fn load(path: Option<&Path>) -> MedSearchResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> MedSearchResult<()> {
        if self.search.min_query_chars == 0 {
            return Err(MedSearchError::ConfigError {
                reason: "search.min_query_chars must be at least 1".to_string(),
            });
        }
        if self.upload.max_bytes == 0 {
            return Err(MedSearchError::ConfigError {
                reason: "upload.max_bytes must be positive".to_string(),
            });
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(MedSearchError::ConfigError {
                reason: "upload.allowed_extensions must list at least one extension".to_string(),
            });
        }
        for account in &self.auth.accounts {
            let digest = &account.password_sha256;
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(MedSearchError::ConfigError {
                    reason: format!(
                        "auth account '{}' must have a 64-character hex password_sha256",
                        account.email
                    ),
                });
            }
        }
        Ok(())
    }
}
