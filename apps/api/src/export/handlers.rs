use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::editor::session::{Edit, MutationOutcome};
use crate::editor::handlers::MutationResponse;
use crate::errors::AppError;
use crate::export::portable::{PortableSnapshot, JSON_EXPORT_FILENAME};
use crate::export::{ExportStatus, ExportTrigger};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ExportTriggerResponse {
    pub status: ExportTrigger,
}

/// POST /api/v1/export/pdf
/// 202 when a run starts, 200 when one is already in flight.
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let trigger = state.editor.start_export().await?;
    let code = match trigger {
        ExportTrigger::Started => StatusCode::ACCEPTED,
        ExportTrigger::AlreadyRunning => StatusCode::OK,
    };
    Ok((code, Json(ExportTriggerResponse { status: trigger })).into_response())
}

/// GET /api/v1/export/status
pub async fn handle_export_status(
    State(state): State<AppState>,
) -> Result<Json<ExportStatus>, AppError> {
    Ok(Json(state.editor.export_status().await?))
}

/// GET /api/v1/export/json
pub async fn handle_export_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = state.editor.portable().await?;
    let body = snapshot
        .to_json()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing snapshot: {e}")))?;
    let disposition = format!("attachment; filename=\"{JSON_EXPORT_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/v1/import/json
pub async fn handle_import_json(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let snapshot: PortableSnapshot = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("invalid resume data: {e}")))?;
    let outcome: MutationOutcome = state.editor.apply(Edit::Import(snapshot)).await?;
    Ok(outcome.into())
}
