//! Multipart intake for product images.
//!
//! Files are streamed to the uploads directory before the image pipeline sees
//! them. Type and size checks happen while streaming, so a rejected request
//! never reaches the pipeline.

use std::path::Path;

use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;
use vitrine_core::{MAX_PRODUCT_IMAGES, StagedUpload};

use crate::infra::errors::AppError;

const ACCEPTED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "svg"];

/// Slack on top of the file payloads for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// Form field carrying the files.
    pub field: &'static str,
    pub max_files: usize,
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            field: "imagens",
            max_files: MAX_PRODUCT_IMAGES,
            max_file_bytes: 5 * 1024 * 1024,
        }
    }
}

impl UploadLimits {
    /// Request body ceiling for a maximal valid upload.
    pub fn body_limit(&self) -> usize {
        self.max_files
            .saturating_mul(self.max_file_bytes)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

#[derive(Debug, Error)]
pub enum UploadRejection {
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("unexpected file field `{0}`")]
    UnexpectedField(String),

    #[error("at most {0} files may be uploaded at once")]
    TooManyFiles(usize),

    #[error("Error: Images only! (`{0}` is not jpeg, jpg, png or svg)")]
    UnsupportedType(String),

    #[error("`{filename}` exceeds the {limit} byte limit")]
    FileTooLarge { filename: String, limit: usize },

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            UploadRejection::Multipart(err) => {
                if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::payload_too_large(message)
                } else {
                    AppError::bad_request(message)
                }
            }
            UploadRejection::FileTooLarge { .. } => {
                AppError::payload_too_large(message)
            }
            UploadRejection::Io(err) => {
                AppError::internal("Erro ao fazer upload de imagens")
                    .with_detail(err.to_string())
            }
            UploadRejection::UnexpectedField(_)
            | UploadRejection::TooManyFiles(_)
            | UploadRejection::UnsupportedType(_) => {
                AppError::bad_request(message)
            }
        }
    }
}

/// Stream every file part of `limits.field` into `dir`.
///
/// Plain text parts are ignored. On rejection, every file this call already
/// wrote is removed again.
pub async fn receive_images(
    mut multipart: Multipart,
    dir: &Path,
    limits: &UploadLimits,
) -> Result<Vec<StagedUpload>, UploadRejection> {
    let mut staged = Vec::new();

    if let Err(rejection) =
        receive_into(&mut multipart, dir, limits, &mut staged).await
    {
        warn!(error = %rejection, "rejecting image upload");
        discard(&staged).await;
        return Err(rejection);
    }

    Ok(staged)
}

async fn receive_into(
    multipart: &mut Multipart,
    dir: &Path,
    limits: &UploadLimits,
    staged: &mut Vec<StagedUpload>,
) -> Result<(), UploadRejection> {
    while let Some(mut field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != limits.field {
            return Err(UploadRejection::UnexpectedField(field_name));
        }
        if staged.len() >= limits.max_files {
            return Err(UploadRejection::TooManyFiles(limits.max_files));
        }

        let extension =
            accepted_extension(&original_name, field.content_type())?;
        let filename = stored_filename(&extension);
        let path = dir.join(&filename);

        let mut file = tokio::fs::File::create(&path).await?;
        staged.push(StagedUpload {
            path: path.clone(),
            filename,
        });

        let mut written = 0usize;
        while let Some(chunk) = field.chunk().await? {
            written += chunk.len();
            if written > limits.max_file_bytes {
                return Err(UploadRejection::FileTooLarge {
                    filename: original_name,
                    limit: limits.max_file_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(%original_name, path = %path.display(), bytes = written, "stored upload");
    }

    Ok(())
}

/// Both the extension and the declared MIME type must name an accepted image
/// type. Returns the lower-cased extension.
fn accepted_extension(
    original_name: &str,
    content_type: Option<&str>,
) -> Result<String, UploadRejection> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ACCEPTED_TYPES.contains(&ext.as_str()));

    let mime_ok = content_type
        .map(str::to_ascii_lowercase)
        .is_some_and(|mime| ACCEPTED_TYPES.iter().any(|t| mime.contains(t)));

    match extension {
        Some(ext) if mime_ok => Ok(ext),
        _ => Err(UploadRejection::UnsupportedType(original_name.to_string())),
    }
}

fn stored_filename(extension: &str) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}

async fn discard(staged: &[StagedUpload]) {
    for upload in staged {
        if let Err(err) = tokio::fs::remove_file(&upload.path).await {
            warn!(
                path = %upload.path.display(),
                error = %err,
                "failed to remove rejected upload"
            );
        }
    }
}
