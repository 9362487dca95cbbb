use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{ConversionMessage, ConversionStrategy};
use crate::domain::{FileId, Job, TargetFormat};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ConvertRequest {
    pub file_id: String,
    pub target_format: String,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub job_id: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Submits a conversion job. All validation happens here, synchronously,
/// before a job record exists: an unknown file id, an unparseable target or
/// an unsupported pairing is rejected without any job being created.
#[tracing::instrument(skip(state, request), fields(file_id = %request.file_id, target = %request.target_format))]
pub async fn convert_handler(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> impl IntoResponse {
    let file_id = match Uuid::parse_str(&request.file_id) {
        Ok(uuid) => FileId::from_uuid(uuid),
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid file ID: {}", request.file_id),
                }),
            )
                .into_response();
        }
    };

    let file = match state.files.get_by_id(file_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "file_id not found".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up file record");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to look up file: {}", e),
                }),
            )
                .into_response();
        }
    };

    let target = match TargetFormat::from_str(&request.target_format) {
        Ok(t) => t,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    let source_ext = file.extension().unwrap_or_default();
    if ConversionStrategy::resolve(&source_ext, target).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unsupported conversion: {} -> {}", source_ext, target),
            }),
        )
            .into_response();
    }

    let job = Job::new(file_id, target);
    let job_id = job.id;

    if let Err(e) = state.jobs.create(&job).await {
        tracing::error!(error = %e, "Failed to create job record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    if let Err(e) = state
        .conversion_queue
        .send(ConversionMessage { job_id })
        .await
    {
        tracing::error!(error = %e, "Failed to enqueue conversion job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Conversion queue unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(
        job_id = %job_id.as_uuid(),
        file_id = %file_id.as_uuid(),
        target = %target,
        "Conversion job enqueued"
    );

    (
        StatusCode::ACCEPTED,
        Json(ConvertResponse {
            job_id: job_id.as_uuid().to_string(),
        }),
    )
        .into_response()
}
