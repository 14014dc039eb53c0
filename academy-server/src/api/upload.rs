//! File upload API
//!
//! POST /api/upload - multipart `file` (+ optional `folder`) → object storage
//!
//! Objects are stored at `{folder}/{millis}-{filename}` and made public.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::routing::post;
use axum::{Router, middleware};
use http::StatusCode;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::UploadResponse;

use super::ApiResult;
use crate::auth::user_auth_middleware;
use crate::services::uploads::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Room for multipart boundaries and the text fields around the file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload))
        .route_layer(middleware::from_fn_with_state(state.clone(), user_auth_middleware))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(ErrorCode::FileTooLarge);
    }
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}

/// Wrong content type or a missing boundary
fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(ErrorCode::FileTooLarge);
    }
    AppError::invalid("Invalid request body. Expected multipart/form-data.")
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadResponse> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let mut file: Option<UploadedFile> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let stored = uploads::upload_file(
        state.storage.as_ref(),
        folder.as_deref(),
        &file.filename,
        file.data,
        &file.content_type,
    )
    .await?;

    Ok(ApiResponse::success(stored).with_message("File uploaded successfully"))
}
