//! Error types shared by every MedSearch crate.
//!
//! All fallible operations return `MedSearchResult<T>`. None of these errors
//! are meant to escape to the top of an application: the component that
//! issued the call converts them into local view state (a message or an empty
//! result set).

use thiserror::Error;

/// The unified error type for the MedSearch workspace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MedSearchError {
    /// No record with the given identifier exists.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// The email/password pair did not match a configured account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A transient failure while fetching suggestions, search results or
    /// insurance options.
    #[error("lookup failed: {reason}")]
    LookupFailure { reason: String },

    /// A selection that would break a session invariant (an NDC that does not
    /// belong to the selected drug, an insurance that was not offered, ...).
    #[error("invalid selection: {reason}")]
    InvalidSelection { reason: String },

    /// An uploaded file was refused before it reached the inbox.
    #[error("upload rejected: {reason}")]
    UploadRejected { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl MedSearchError {
    /// Shorthand for a `NotFound` on a drug id.
    pub fn drug_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "drug".to_string(),
            id: id.into(),
        }
    }

    /// Wrap any error as a `LookupFailure`, leaving existing ones untouched.
    pub fn into_lookup_failure(self, what: &str) -> Self {
        match self {
            Self::LookupFailure { .. } => self,
            other => Self::LookupFailure {
                reason: format!("{}: {}", what, other),
            },
        }
    }
}

/// Convenience alias used throughout the MedSearch crates.
pub type MedSearchResult<T> = Result<T, MedSearchError>;
