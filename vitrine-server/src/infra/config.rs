use std::{env, path::PathBuf};

use anyhow::Context;
use vitrine_core::{MAX_IMAGE_WIDTH, MAX_PRODUCT_IMAGES};

use crate::infra::upload::UploadLimits;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Server configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Upload settings
    pub uploads_dir: PathBuf,
    pub max_upload_file_bytes: usize,
    pub image_max_width: u32,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    /// Whether a `.env` file was found and loaded.
    pub env_file_loaded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: DEFAULT_PORT,
            database_url: "sqlite://database.sqlite".to_string(),
            uploads_dir: PathBuf::from("./public/uploads"),
            max_upload_file_bytes: DEFAULT_MAX_FILE_BYTES,
            image_max_width: MAX_IMAGE_WIDTH,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            env_file_loaded: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let env_file_loaded = dotenvy::dotenv().is_ok();
        let defaults = Self::default();

        let server_port = match env::var("PORT").or_else(|_| env::var("SERVER_PORT"))
        {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid server port `{raw}`"))?,
            Err(_) => defaults.server_port,
        };

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            max_upload_file_bytes: env::var("MAX_UPLOAD_FILE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_file_bytes),
            image_max_width: env::var("IMAGE_MAX_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|w| *w > 0)
                .unwrap_or(defaults.image_max_width),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_allowed_origins),
            env_file_loaded,
        })
    }

    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.uploads_dir).with_context(|| {
            format!(
                "failed to create uploads directory {}",
                self.uploads_dir.display()
            )
        })?;
        Ok(())
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_files: MAX_PRODUCT_IMAGES,
            max_file_bytes: self.max_upload_file_bytes,
            ..UploadLimits::default()
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test, ,http://b.test "),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn upload_limits_follow_config() {
        let config = Config {
            max_upload_file_bytes: 1024,
            ..Config::default()
        };
        let limits = config.upload_limits();
        assert_eq!(limits.max_file_bytes, 1024);
        assert_eq!(limits.max_files, 6);
        assert_eq!(limits.field, "imagens");
    }

    #[test]
    fn ensure_directories_creates_nested_uploads_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            uploads_dir: tmp.path().join("public").join("uploads"),
            ..Config::default()
        };
        config.ensure_directories().unwrap();
        assert!(config.uploads_dir.is_dir());
    }
}
