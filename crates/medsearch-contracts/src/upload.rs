//! Receipts for accepted spreadsheet uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(pub uuid::Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

/// What the upload view reports back after a file was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub upload_id: UploadId,
    pub file_name: String,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    pub received_at: DateTime<Utc>,
}
