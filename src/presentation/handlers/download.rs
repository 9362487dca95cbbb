use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::ArtifactStoreError;
use crate::domain::{JobId, JobStatus, StoragePath};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serves the output artifact of a completed job. Succeeds only once the job
/// is done and the artifact still exists; the content type is inferred from
/// the output filename's extension.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };
    let job_id = JobId::from_uuid(uuid);

    let job = match state.jobs.get_by_id(job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "job_id not found".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    if job.status != JobStatus::Done {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Job not complete".to_string(),
            }),
        )
            .into_response();
    }

    // output_filename is present whenever status is done.
    let output_filename = match job.output_filename {
        Some(name) => name,
        None => {
            tracing::error!(job_id = %job_id.as_uuid(), "Done job without output filename");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Job record is inconsistent".to_string(),
                }),
            )
                .into_response();
        }
    };

    let path = StoragePath::for_output(&job_id, &output_filename);
    let bytes = match state.outputs.fetch(&path).await {
        Ok(b) => b,
        Err(ArtifactStoreError::NotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Output file missing".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read output artifact");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to read output: {}", e),
                }),
            )
                .into_response();
        }
    };

    let content_type = mime_guess::from_path(&output_filename)
        .first_or_octet_stream()
        .to_string();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", output_filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
