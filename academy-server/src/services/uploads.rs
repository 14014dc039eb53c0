//! File uploads to object storage

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{DEFAULT_UPLOAD_FOLDER, UploadResponse};

use crate::error::ServiceResult;
use crate::storage::{MAX_URL_LIFETIME, ObjectStorage, StorageError};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Normalize a caller-supplied path segment: no leading slash, no `..`
fn clean_segment(raw: &str) -> Result<String, StorageError> {
    let trimmed = raw.trim().trim_start_matches('/');
    if trimmed.split(['/', '\\']).any(|part| part == "..") {
        return Err(StorageError::InvalidPath(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// `<folder>/<millis>-<filename>`
pub fn object_path(folder: Option<&str>, filename: &str, millis: i64) -> Result<String, StorageError> {
    let folder = match folder.map(clean_segment).transpose()? {
        Some(f) if !f.is_empty() => f,
        _ => DEFAULT_UPLOAD_FOLDER.to_string(),
    };
    let filename = clean_segment(filename)?.replace('/', "_");
    if filename.is_empty() {
        return Err(StorageError::InvalidPath("empty file name".into()));
    }
    Ok(format!("{folder}/{millis}-{filename}"))
}

/// Store an uploaded file publicly and return where it lives
pub async fn upload_file(
    storage: &dyn ObjectStorage,
    folder: Option<&str>,
    filename: &str,
    data: Vec<u8>,
    content_type: &str,
) -> ServiceResult<UploadResponse> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile).into());
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::new(ErrorCode::FileTooLarge).into());
    }

    let path = object_path(folder, filename, Utc::now().timestamp_millis())?;
    let size = data.len();
    let url = storage.upload(&path, data, content_type).await?;

    tracing::info!(path = %path, size, content_type = %content_type, "File uploaded");
    Ok(UploadResponse { url, path })
}

pub async fn delete_file(storage: &dyn ObjectStorage, path: &str) -> ServiceResult<()> {
    let path = clean_segment(path)?;
    storage.delete(&path).await?;
    tracing::info!(path = %path, "File deleted");
    Ok(())
}

/// Signed read URL valid for the longest lifetime the backend allows
pub async fn download_url(storage: &dyn ObjectStorage, path: &str) -> ServiceResult<String> {
    let path = clean_segment(path)?;
    Ok(storage.download_url(&path, MAX_URL_LIFETIME).await?)
}
