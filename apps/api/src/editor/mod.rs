//! Editor Orchestrator — the session state, its mutations, and the actor that owns it.

pub mod actor;
pub mod handlers;
pub mod navigation;
pub mod photo;
pub mod session;

pub use actor::EditorHandle;
pub use session::Editor;
