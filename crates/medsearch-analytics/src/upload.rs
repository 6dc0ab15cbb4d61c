//! Spreadsheet upload intake.
//!
//! `UploadInbox` validates a file's name and size, fingerprints its contents
//! with SHA-256 and keeps a receipt. Contents are not parsed or retained.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use medsearch_contracts::{
    error::{MedSearchError, MedSearchResult},
    upload::{UploadId, UploadReceipt},
};
use medsearch_core::config::UploadSettings;

// ── Internal state ────────────────────────────────────────────────────────────

struct InboxState {
    receipts: Vec<UploadReceipt>,
}

// ── Public inbox ──────────────────────────────────────────────────────────────

/// Accepted uploads, in arrival order.
///
/// Clones share the same receipts.
#[derive(Clone)]
pub struct UploadInbox {
    settings: UploadSettings,
    state: Arc<Mutex<InboxState>>,
}

impl UploadInbox {
    pub fn new(settings: UploadSettings) -> Self {
        Self {
            settings,
            state: Arc::new(Mutex::new(InboxState { receipts: Vec::new() })),
        }
    }

    /// Validate and record an upload held in memory.
    pub fn accept_bytes(&self, file_name: &str, contents: &[u8]) -> MedSearchResult<UploadReceipt> {
        self.check_name(file_name)?;
        self.check_size(file_name, contents.len() as u64)?;

        let receipt = UploadReceipt {
            upload_id: UploadId::new(),
            file_name: file_name.to_string(),
            size_bytes: contents.len() as u64,
            sha256: hex::encode(Sha256::digest(contents)),
            received_at: Utc::now(),
        };

        let mut state = self.state.lock().map_err(|e| MedSearchError::UploadRejected {
            reason: format!("upload inbox lock poisoned: {}", e),
        })?;
        state.receipts.push(receipt.clone());

        info!(
            file_name = %receipt.file_name,
            size_bytes = receipt.size_bytes,
            sha256 = %receipt.sha256,
            "upload accepted"
        );
        Ok(receipt)
    }

    /// Validate and record the file at `path`.
    ///
    /// Name and size are checked before the contents are read.
    pub fn accept_file(&self, path: &Path) -> MedSearchResult<UploadReceipt> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MedSearchError::UploadRejected {
                reason: format!("'{}' is not a file name", path.display()),
            })?;
        self.check_name(file_name)?;

        let metadata = std::fs::metadata(path).map_err(|e| self.unreadable(path, e))?;
        self.check_size(file_name, metadata.len())?;

        let contents = std::fs::read(path).map_err(|e| self.unreadable(path, e))?;
        self.accept_bytes(file_name, &contents)
    }

    pub fn receipts(&self) -> MedSearchResult<Vec<UploadReceipt>> {
        let state = self.state.lock().map_err(|e| MedSearchError::UploadRejected {
            reason: format!("upload inbox lock poisoned: {}", e),
        })?;
        Ok(state.receipts.clone())
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    fn check_name(&self, file_name: &str) -> MedSearchResult<()> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let allowed = extension.as_deref().is_some_and(|ext| {
            self.settings
                .allowed_extensions
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        });
        if allowed {
            return Ok(());
        }
        warn!(file_name = %file_name, "upload rejected: file type");
        Err(MedSearchError::UploadRejected {
            reason: format!(
                "'{}' is not one of: {}",
                file_name,
                self.settings.allowed_extensions.join(", ")
            ),
        })
    }

    fn check_size(&self, file_name: &str, size: u64) -> MedSearchResult<()> {
        let reason = if size == 0 {
            format!("'{}' is empty", file_name)
        } else if size > self.settings.max_bytes {
            format!(
                "'{}' is {} bytes, the limit is {}",
                file_name, size, self.settings.max_bytes
            )
        } else {
            return Ok(());
        };
        warn!(file_name = %file_name, size, "upload rejected: size");
        Err(MedSearchError::UploadRejected { reason })
    }

    fn unreadable(&self, path: &Path, e: std::io::Error) -> MedSearchError {
        MedSearchError::UploadRejected {
            reason: format!("failed to read '{}': {}", path.display(), e),
        }
    }
}

impl Default for UploadInbox {
    fn default() -> Self {
        Self::new(UploadSettings::default())
    }
}
