//! Snapshot export: capture the rendered preview, rasterize it, wrap it in a one-page
//! A4 PDF and hand the file to a download sink.
//!
//! Stages:
//! 1. `locate_surface`: the preview the orchestrator last rendered.
//! 2. [`Rasterizer`]: page → RGBA buffer at `scale`× (CPU-bound, `spawn_blocking`).
//! 3. [`PageEncoder`]: raster → PDF bytes (CPU-bound, same blocking task).
//! 4. [`DownloadSink`]: deliver `(file name, bytes)`.
//!
//! Any stage failure surfaces as one [`ExportError`]; callers show the generic
//! [`EXPORT_FAILURE_MESSAGE`] and log the detail.

pub mod download;
pub mod handlers;
pub mod pdf;
pub mod portable;
pub mod raster;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::export::download::sanitize_filename;
use crate::layout::PageLayout;

pub const EXPORT_FAILURE_MESSAGE: &str = "Failed to generate PDF. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no rendered preview to capture")]
    TargetNotFound,

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Stage traits
// ────────────────────────────────────────────────────────────────────────────

pub trait Rasterizer: Send + Sync {
    /// Renders `page` into a buffer of `page.width × scale` by `page.height × scale` pixels.
    fn rasterize(&self, page: &PageLayout, scale: u32) -> Result<RgbaImage, ExportError>;
}

pub trait PageEncoder: Send + Sync {
    /// Embeds `raster` so it exactly covers one A4 page.
    fn encode(&self, raster: &RgbaImage) -> Result<Vec<u8>, ExportError>;
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Delivers the finished file. Must leave nothing behind on failure.
    async fn deliver(&self, file_name: &str, payload: Bytes) -> Result<(), ExportError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Status
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub file_name: String,
    pub bytes: usize,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExportOutcome {
    Succeeded(ExportReceipt),
    #[serde(rename_all = "camelCase")]
    Failed {
        message: String,
        finished_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    pub busy: bool,
    pub last: Option<ExportOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTrigger {
    Started,
    AlreadyRunning,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    encoder: Arc<dyn PageEncoder>,
    sink: Arc<dyn DownloadSink>,
    scale: u32,
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        encoder: Arc<dyn PageEncoder>,
        sink: Arc<dyn DownloadSink>,
        scale: u32,
    ) -> Self {
        Self {
            rasterizer,
            encoder,
            sink,
            scale,
        }
    }

    /// Runs every stage against `surface`. The file is named after `full_name`.
    pub async fn run(
        &self,
        surface: Option<Arc<PageLayout>>,
        full_name: &str,
    ) -> Result<ExportReceipt, ExportError> {
        let page = locate_surface(surface)?;
        let rasterizer = Arc::clone(&self.rasterizer);
        let encoder = Arc::clone(&self.encoder);
        let scale = self.scale;

        let pdf = tokio::task::spawn_blocking(move || {
            let raster = rasterizer.rasterize(&page, scale)?;
            encoder.encode(&raster)
        })
        .await
        .map_err(|e| ExportError::CaptureFailed(format!("export task failed: {e}")))??;

        let file_name = sanitize_filename(full_name);
        let bytes = pdf.len();
        self.sink.deliver(&file_name, Bytes::from(pdf)).await?;
        info!(file_name = %file_name, bytes, "export delivered");

        Ok(ExportReceipt {
            file_name,
            bytes,
            finished_at: Utc::now(),
        })
    }
}

pub fn locate_surface(surface: Option<Arc<PageLayout>>) -> Result<Arc<PageLayout>, ExportError> {
    surface.ok_or(ExportError::TargetNotFound)
}
