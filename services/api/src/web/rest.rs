//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the share endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use vod_notes_core::domain::{AvailableNotes, Note, ShareToken, SharedRecord};
use vod_notes_core::export::{ExportError, ExportFormat};
use vod_notes_core::share::ShareError;
use vod_notes_core::url::share_url;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_share_handler,
        get_share_handler,
        update_share_handler,
        verify_pin_handler,
        list_available_handler,
        export_handler,
    ),
    components(
        schemas(
            CreateShareRequest,
            CreateShareResponse,
            UpdateShareRequest,
            SharedNotesResponse,
            VerifyPinRequest,
            VerifyPinResponse,
            AvailableNotesResponse,
            ExportRequest,
        )
    ),
    tags(
        (name = "VOD Notes API", description = "Share, load and export timestamped video notes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    pub video_id: String,
    pub author_name: String,
    #[schema(value_type = Vec<Object>)]
    pub notes: Vec<Note>,
    /// Exactly four digits.
    pub pin: String,
}

/// The response payload sent after successfully sharing notes.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    share_id: String,
    share_url: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShareRequest {
    pub author_name: String,
    #[schema(value_type = Vec<Object>)]
    pub notes: Vec<Note>,
    pub pin: String,
}

/// A shared record as viewers see it. The PIN is never included.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SharedNotesResponse {
    share_id: String,
    video_id: String,
    author_name: String,
    #[schema(value_type = Vec<Object>)]
    notes: Vec<Note>,
    created_at: DateTime<Utc>,
}

impl From<SharedRecord> for SharedNotesResponse {
    fn from(record: SharedRecord) -> Self {
        Self {
            share_id: record.share_token.to_string(),
            video_id: record.video_id,
            author_name: record.author_name,
            notes: record.notes,
            created_at: record.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyPinRequest {
    pub pin: String,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyPinResponse {
    valid: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableNotesResponse {
    author_name: String,
    created_at: DateTime<Utc>,
    share_id: String,
}

impl From<AvailableNotes> for AvailableNotesResponse {
    fn from(summary: AvailableNotes) -> Self {
        Self {
            author_name: summary.author_name,
            created_at: summary.created_at,
            share_id: summary.share_token.to_string(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub video_id: String,
    #[schema(value_type = Vec<Object>)]
    pub notes: Vec<Note>,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Turns a gateway failure into a status and a user-facing message. Store
/// failures are logged and replaced by `context`.
fn share_error(context: &'static str) -> impl Fn(ShareError) -> (StatusCode, String) {
    move |e| {
        if e.is_validation() {
            return (StatusCode::BAD_REQUEST, e.to_string());
        }
        match e {
            ShareError::IncorrectPin => (StatusCode::FORBIDDEN, "Incorrect PIN code".to_string()),
            ShareError::NotFound(_) => (StatusCode::NOT_FOUND, "Shared notes not found".to_string()),
            other => {
                error!("{}: {:?}", context, other);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Share a set of notes and receive the link that opens them.
#[utoipa::path(
    post,
    path = "/shared",
    request_body = CreateShareRequest,
    responses(
        (status = 201, description = "Notes shared", body = CreateShareResponse),
        (status = 400, description = "Missing author, malformed PIN or no notes"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_share_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateShareRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let token = app_state
        .gateway
        .create(&req.video_id, &req.author_name, &req.notes, &req.pin)
        .await
        .map_err(share_error("Failed to share notes"))?;

    let response = CreateShareResponse {
        share_url: share_url(&app_state.config.public_origin, &token),
        share_id: token.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Load the notes behind a share link.
#[utoipa::path(
    get,
    path = "/shared/{share_id}",
    responses(
        (status = 200, description = "Shared notes", body = SharedNotesResponse),
        (status = 404, description = "No record for this share id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("share_id" = String, Path, description = "Token from the share link.")
    )
)]
pub async fn get_share_handler(
    State(app_state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = app_state
        .gateway
        .load(&ShareToken::new(share_id))
        .await
        .map_err(share_error("Failed to load shared notes"))?;
    Ok(Json(SharedNotesResponse::from(record)))
}

/// Replace the notes of an existing share. Requires the share's PIN.
#[utoipa::path(
    put,
    path = "/shared/{share_id}",
    request_body = UpdateShareRequest,
    responses(
        (status = 204, description = "Notes updated"),
        (status = 400, description = "Missing author, malformed PIN or no notes"),
        (status = 403, description = "Incorrect PIN code"),
        (status = 404, description = "No record for this share id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("share_id" = String, Path, description = "Token from the share link.")
    )
)]
pub async fn update_share_handler(
    State(app_state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
    Json(req): Json<UpdateShareRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .gateway
        .update(&ShareToken::new(share_id), &req.author_name, &req.notes, &req.pin)
        .await
        .map_err(share_error("Failed to update shared notes"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check a PIN against a share without changing anything.
#[utoipa::path(
    post,
    path = "/shared/{share_id}/verify-pin",
    request_body = VerifyPinRequest,
    responses(
        (status = 200, description = "Comparison result", body = VerifyPinResponse),
        (status = 400, description = "PIN is not exactly four digits"),
        (status = 404, description = "No record for this share id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("share_id" = String, Path, description = "Token from the share link.")
    )
)]
pub async fn verify_pin_handler(
    State(app_state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
    Json(req): Json<VerifyPinRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let valid = app_state
        .gateway
        .verify_pin(&ShareToken::new(share_id), &req.pin)
        .await
        .map_err(share_error("Failed to verify PIN code"))?;
    Ok(Json(VerifyPinResponse { valid }))
}

/// List every share recorded for a video, newest first.
#[utoipa::path(
    get,
    path = "/videos/{video_id}/shared",
    responses(
        (status = 200, description = "Available shared notes", body = [AvailableNotesResponse]),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("video_id" = String, Path, description = "Video identifier.")
    )
)]
pub async fn list_available_handler(
    State(app_state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let list = app_state
        .gateway
        .list_available(&video_id)
        .await
        .map_err(share_error("Failed to load available notes"))?;
    let body: Vec<AvailableNotesResponse> = list.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Render notes as Markdown or JSON text.
#[utoipa::path(
    post,
    path = "/export/{format}",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Rendered notes", body = String),
        (status = 400, description = "Unknown format or no notes"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("format" = String, Path, description = "`markdown` or `json`.")
    )
)]
pub async fn export_handler(
    Path(format): Path<String>,
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: ExportError| (StatusCode::BAD_REQUEST, e.to_string()))?;

    if req.video_id.trim().is_empty() || req.notes.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No notes to export".to_string()));
    }

    let text = format.format(&req.notes, &req.video_id).map_err(|e| {
        error!("Failed to export notes: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to export notes".to_string(),
        )
    })?;

    let content_type = match format {
        ExportFormat::Markdown => "text/markdown; charset=utf-8",
        ExportFormat::Json => "application/json",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], text))
}
