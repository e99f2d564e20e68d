use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::export::raster::{MAX_SCALE, MIN_SCALE};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory exported PDFs are written into.
    pub export_dir: PathBuf,
    /// Rasterization factor over the 794 × 1123 px page, 2 to 4.
    pub export_scale: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let export_scale = lookup("EXPORT_SCALE")
            .unwrap_or_else(|| MIN_SCALE.to_string())
            .parse::<u32>()
            .context("EXPORT_SCALE must be a positive integer")?;
        ensure!(
            (MIN_SCALE..=MAX_SCALE).contains(&export_scale),
            "EXPORT_SCALE must be between {MIN_SCALE} and {MAX_SCALE}, got {export_scale}"
        );

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            export_dir: lookup("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./exports")),
            export_scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.export_dir, PathBuf::from("./exports"));
        assert_eq!(config.export_scale, 2);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("EXPORT_DIR", "/tmp/out"),
            ("EXPORT_SCALE", "3"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.export_scale, 3);
    }

    #[test]
    fn test_out_of_range_scale_is_rejected() {
        assert!(config_from(&[("EXPORT_SCALE", "1")]).is_err());
        assert!(config_from(&[("EXPORT_SCALE", "5")]).is_err());
        assert!(config_from(&[("EXPORT_SCALE", "100")]).is_err());
        assert_eq!(config_from(&[("EXPORT_SCALE", "4")]).unwrap().export_scale, 4);
        assert!(config_from(&[("EXPORT_SCALE", "two")]).is_err());
        assert!(config_from(&[("PORT", "99999")]).is_err());
    }
}
