use crate::editor::EditorHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one editing session this process serves.
    pub editor: EditorHandle,
}
