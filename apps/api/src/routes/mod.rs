pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::editor::handlers;
use crate::export::handlers as export_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Editor session
        .route("/api/v1/editor", get(handlers::handle_get_editor))
        .route("/api/v1/editor/fields", patch(handlers::handle_update_field))
        .route(
            "/api/v1/editor/lists/:section",
            post(handlers::handle_add_list_item),
        )
        .route(
            "/api/v1/editor/lists/:section/:id",
            patch(handlers::handle_update_list_item).delete(handlers::handle_remove_list_item),
        )
        .route(
            "/api/v1/editor/lists/:section/:id/move",
            post(handlers::handle_move_list_item),
        )
        .route(
            "/api/v1/editor/photo",
            put(handlers::handle_set_photo).delete(handlers::handle_clear_photo),
        )
        .route("/api/v1/editor/design", put(handlers::handle_set_design))
        .route("/api/v1/editor/layout", put(handlers::handle_set_layout))
        .route("/api/v1/editor/navigation", post(handlers::handle_navigate))
        // Rendering and scoring
        .route("/api/v1/preview", get(handlers::handle_get_preview))
        .route("/api/v1/score", get(handlers::handle_get_score))
        // Export / import
        .route("/api/v1/export/json", get(export_handlers::handle_export_json))
        .route("/api/v1/import/json", post(export_handlers::handle_import_json))
        .route("/api/v1/export/pdf", post(export_handlers::handle_export_pdf))
        .route(
            "/api/v1/export/status",
            get(export_handlers::handle_export_status),
        )
        .with_state(state)
}
