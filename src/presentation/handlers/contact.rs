use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::StoragePath;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Persists a contact message as a text file in the message store. No
/// outbound mail is sent.
#[tracing::instrument(skip(state, request))]
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() || request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name and message must not be empty".to_string(),
            }),
        )
            .into_response();
    }
    if !request.email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid email address".to_string(),
            }),
        )
            .into_response();
    }

    let body = format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
        request.name, request.email, request.message
    );
    let path = StoragePath::for_message(Utc::now().timestamp());

    if let Err(e) = state.messages.put(&path, Bytes::from(body)).await {
        tracing::error!(error = %e, "Failed to persist contact message");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store message: {}", e),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(ContactResponse {
            status: "sent".to_string(),
        }),
    )
        .into_response()
}
