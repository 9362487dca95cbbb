use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::{FileId, FileRecord, StoragePath};
use crate::presentation::state::AppState;

/// Upload size ceiling; larger payloads are rejected with 413.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub size: u64,
    pub mime: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        // A body that trips the framework's length limit surfaces here as a
        // read failure; report it as the same 413 as an in-handler rejection.
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse {
                    error: "File too large (max 25MB)".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let filename = field.file_name().unwrap_or("uploaded").to_string();
    let media_type = field.content_type().map(String::from);

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse {
                    error: "File too large (max 25MB)".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    if data.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Empty file".to_string(),
            }),
        )
            .into_response();
    }

    if data.len() > MAX_UPLOAD_BYTES {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse {
                error: "File too large (max 25MB)".to_string(),
            }),
        )
            .into_response();
    }

    let file_id = FileId::new();
    let storage_path = StoragePath::for_upload(&file_id, &filename);
    let size = data.len() as u64;

    if let Err(e) = state.uploads.put(&storage_path, data).await {
        tracing::error!(error = %e, "Failed to persist upload");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store file: {}", e),
            }),
        )
            .into_response();
    }

    let record = FileRecord::new(
        file_id,
        filename.clone(),
        size,
        media_type.clone(),
        storage_path,
    );
    if let Err(e) = state.files.create(&record).await {
        tracing::error!(error = %e, "Failed to create file record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to record file: {}", e),
            }),
        )
            .into_response();
    }

    tracing::info!(
        file_id = %file_id.as_uuid(),
        filename = %filename,
        bytes = size,
        "File uploaded"
    );

    (
        StatusCode::OK,
        Json(UploadResponse {
            file_id: file_id.as_uuid().to_string(),
            filename,
            size,
            mime: media_type,
        }),
    )
        .into_response()
}
