mod config;
mod editor;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::editor::{Editor, EditorHandle};
use crate::export::download::FsDownloadSink;
use crate::export::pdf::LopdfEncoder;
use crate::export::raster::ImageRasterizer;
use crate::export::ExportPipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder v{}", env!("CARGO_PKG_VERSION"));

    // Export pipeline: software rasterizer → lopdf → files under EXPORT_DIR
    let pipeline = ExportPipeline::new(
        Arc::new(ImageRasterizer),
        Arc::new(LopdfEncoder::default()),
        Arc::new(FsDownloadSink::new(config.export_dir.clone())),
        config.export_scale,
    );
    info!(
        "Exports go to {} at {}x scale",
        config.export_dir.display(),
        config.export_scale
    );

    // One editing session per process, seeded with the sample resume
    let editor = EditorHandle::spawn(Editor::new(), pipeline);

    let state = AppState { editor };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
