//! Object storage models

use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

/// `POST /api/upload` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored object
    pub url: String,
    /// Object path inside the bucket
    pub path: String,
}
