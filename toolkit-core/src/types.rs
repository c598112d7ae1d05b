use serde::{Deserialize, Serialize};

/// A file persisted by the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Name on disk inside the upload directory
    pub new_file_name: String,
    /// Name the client submitted
    pub original_file_name: String,
    /// Bytes actually written
    pub file_size: u64,
}

/// Per-call upload behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Store under a random 25-character name plus the original extension
    /// (default `true`). When `false` the submitted name is used verbatim,
    /// and the caller owns any collision or path-traversal risk.
    pub rename: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self { rename: true }
    }
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the submitted file name
    pub fn keep_original_name(mut self) -> Self {
        self.rename = false;
        self
    }
}
