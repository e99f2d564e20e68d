use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::info;

use crate::export::{DownloadSink, ExportError};

pub const FALLBACK_FILENAME: &str = "Resume.pdf";

/// `"Jane  Doe"` → `"Jane_Doe_Resume.pdf"`. Whitespace runs collapse to one
/// underscore; separators and other characters unsafe in file names become `_`.
pub fn sanitize_filename(full_name: &str) -> String {
    let mut stem = String::with_capacity(full_name.len());
    let mut in_whitespace = false;
    for c in full_name.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        let unsafe_char = c.is_control()
            || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
        stem.push(if unsafe_char { '_' } else { c });
    }

    if stem.chars().all(|c| c == '_' || c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{stem}_Resume.pdf")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filesystem sink
// ────────────────────────────────────────────────────────────────────────────

/// Saves exports into a directory. Each file is written to a temporary sibling and
/// renamed into place, so readers never observe a partial PDF.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn deliver(&self, file_name: &str, payload: Bytes) -> Result<(), ExportError> {
        let dir = self.dir.clone();
        let target = dir.join(file_name);

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
            let io = |e: std::io::Error| ExportError::DownloadFailed(e.to_string());
            std::fs::create_dir_all(&dir).map_err(io)?;
            let mut tmp = NamedTempFile::new_in(&dir).map_err(io)?;
            tmp.write_all(&payload).map_err(io)?;
            tmp.as_file().sync_all().map_err(io)?;
            // A failed persist hands the temp file back; dropping it deletes it.
            tmp.persist(&target)
                .map_err(|e| ExportError::DownloadFailed(e.error.to_string()))?;
            Ok(target)
        })
        .await
        .map_err(|e| ExportError::DownloadFailed(format!("download task failed: {e}")))??;

        info!(path = %path.display(), "export written");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory sink
// ────────────────────────────────────────────────────────────────────────────

/// Keeps delivered files in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryDownloadSink {
    files: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryDownloadSink {
    pub fn files(&self) -> Vec<(String, Bytes)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloadSink {
    async fn deliver(&self, file_name: &str, payload: Bytes) -> Result<(), ExportError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ExportError::DownloadFailed("memory sink poisoned".into()))?;
        files.push((file_name.to_string(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("Jane Doe"), "Jane_Doe_Resume.pdf");
        assert_eq!(sanitize_filename("  Jane \t\n Q  Doe "), "Jane_Q_Doe_Resume.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d_Resume.pdf");
        assert_eq!(sanitize_filename("José Núñez"), "José_Núñez_Resume.pdf");
    }

    #[test]
    fn test_sanitize_empty_name_falls_back() {
        assert_eq!(sanitize_filename(""), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("   "), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename(".."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("//"), FALLBACK_FILENAME);
    }

    #[tokio::test]
    async fn test_fs_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path().join("exports"));
        sink.deliver("Jane_Doe_Resume.pdf", Bytes::from_static(b"%PDF-1.5 test"))
            .await
            .unwrap();
        let written = std::fs::read(dir.path().join("exports/Jane_Doe_Resume.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.5 test");
        let entries = std::fs::read_dir(dir.path().join("exports")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_fs_sink_failure_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the target name makes the final rename fail.
        std::fs::create_dir(dir.path().join("Jane_Doe_Resume.pdf")).unwrap();
        let sink = FsDownloadSink::new(dir.path());
        let result = sink
            .deliver("Jane_Doe_Resume.pdf", Bytes::from_static(b"%PDF-1.5 test"))
            .await;
        assert!(matches!(result, Err(ExportError::DownloadFailed(_))));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Jane_Doe_Resume.pdf")]);
    }
}
