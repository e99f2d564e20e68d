use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::editor::navigation::{ActiveSection, ViewMode};
use crate::editor::session::{Edit, MutationOutcome, SessionSnapshot};
use crate::errors::AppError;
use crate::models::design::{DesignConfig, LayoutConfig};
use crate::models::list::{Direction, ItemId};
use crate::models::resume::{ItemField, ListSection, NewItem};
use crate::scoring::CompletenessReport;
use crate::state::AppState;

#[derive(Serialize)]
pub struct MutationResponse {
    pub outcome: MutationOutcome,
}

impl From<MutationOutcome> for Json<MutationResponse> {
    fn from(outcome: MutationOutcome) -> Self {
        Json(MutationResponse { outcome })
    }
}

fn noop() -> Json<MutationResponse> {
    MutationOutcome::Noop.into()
}

/// Unknown sections or malformed ids address nothing, so they are no-ops.
fn resolve_entry(section: &str, id: &str) -> Option<(ListSection, ItemId)> {
    let section = ListSection::parse(section)?;
    let id = id.parse().ok()?;
    Some((section, id))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Value, what: &str) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(format!("invalid {what}: {e}")))
}

/// GET /api/v1/editor
pub async fn handle_get_editor(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.editor.snapshot().await?))
}

#[derive(Deserialize)]
pub struct UpdateFieldRequest {
    pub section: String,
    pub field: String,
    pub value: String,
}

/// PATCH /api/v1/editor/fields
pub async fn handle_update_field(
    State(state): State<AppState>,
    Json(req): Json<UpdateFieldRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let edit = Edit::UpdateField {
        section: req.section,
        field: req.field,
        value: req.value,
    };
    Ok(state.editor.apply(edit).await?.into())
}

/// POST /api/v1/editor/lists/:section
pub async fn handle_add_list_item(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let Some(section) = ListSection::parse(&section) else {
        return Ok(noop());
    };
    let item = NewItem::from_json(section, body)
        .map_err(|e| AppError::Validation(format!("invalid {} entry: {e}", section_name(section))))?;
    Ok(state.editor.apply(Edit::AddListItem(item)).await?.into())
}

#[derive(Deserialize)]
pub struct UpdateListItemRequest {
    pub field: String,
    pub value: String,
}

/// PATCH /api/v1/editor/lists/:section/:id
pub async fn handle_update_list_item(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, String)>,
    Json(req): Json<UpdateListItemRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let Some((section, id)) = resolve_entry(&section, &id) else {
        return Ok(noop());
    };
    let Some(field) = ItemField::parse(&req.field) else {
        return Ok(noop());
    };
    let edit = Edit::UpdateListItem {
        section,
        id,
        field,
        value: req.value,
    };
    Ok(state.editor.apply(edit).await?.into())
}

/// DELETE /api/v1/editor/lists/:section/:id
pub async fn handle_remove_list_item(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, String)>,
) -> Result<Json<MutationResponse>, AppError> {
    let Some((section, id)) = resolve_entry(&section, &id) else {
        return Ok(noop());
    };
    Ok(state
        .editor
        .apply(Edit::RemoveListItem { section, id })
        .await?
        .into())
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// POST /api/v1/editor/lists/:section/:id/move
pub async fn handle_move_list_item(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let req: MoveRequest = parse_body(body, "move request")?;
    let Some((section, id)) = resolve_entry(&section, &id) else {
        return Ok(noop());
    };
    let edit = Edit::MoveListItem {
        section,
        id,
        direction: req.direction,
    };
    Ok(state.editor.apply(edit).await?.into())
}

/// PUT /api/v1/editor/photo (multipart, field `photo`)
pub async fn handle_set_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MutationResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?;
        return Ok(state.editor.set_photo(bytes).await?.into());
    }
    Err(AppError::Validation("missing multipart field 'photo'".into()))
}

/// DELETE /api/v1/editor/photo
pub async fn handle_clear_photo(
    State(state): State<AppState>,
) -> Result<Json<MutationResponse>, AppError> {
    Ok(state.editor.apply(Edit::ClearPhoto).await?.into())
}

/// PUT /api/v1/editor/design
pub async fn handle_set_design(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let design: DesignConfig = parse_body(body, "design")?;
    Ok(state.editor.apply(Edit::SetDesign(design)).await?.into())
}

/// PUT /api/v1/editor/layout
pub async fn handle_set_layout(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let layout: LayoutConfig = parse_body(body, "layout")?;
    Ok(state.editor.apply(Edit::SetLayout(layout)).await?.into())
}

#[derive(Deserialize)]
pub struct NavigationRequest {
    pub view: Option<ViewMode>,
    pub section: Option<ActiveSection>,
}

/// POST /api/v1/editor/navigation
pub async fn handle_navigate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>, AppError> {
    let req: NavigationRequest = parse_body(body, "navigation")?;
    let edit = Edit::Navigate {
        view: req.view,
        section: req.section,
    };
    Ok(state.editor.apply(edit).await?.into())
}

/// GET /api/v1/preview
pub async fn handle_get_preview(State(state): State<AppState>) -> Result<Response, AppError> {
    let page = state
        .editor
        .preview()
        .await?
        .ok_or_else(|| AppError::NotFound("No preview has been rendered".into()))?;
    Ok(Json(page.as_ref()).into_response())
}

/// GET /api/v1/score
pub async fn handle_get_score(
    State(state): State<AppState>,
) -> Result<Json<CompletenessReport>, AppError> {
    Ok(Json(state.editor.score().await?))
}

fn section_name(section: ListSection) -> &'static str {
    match section {
        ListSection::Experience => "experience",
        ListSection::Projects => "project",
        ListSection::Education => "education",
        ListSection::Skills => "skill",
    }
}
