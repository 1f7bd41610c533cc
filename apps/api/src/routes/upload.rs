use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::assets::{AssetError, AssetUpload, ResourceType, MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::state::AppState;

/// Slack on top of the file limit for multipart boundaries and headers.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub public_id: String,
    pub resource_type: ResourceType,
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "File too large (max {} MB)",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Declared part type first, then a guess from the file name.
fn content_type_of(field: &Field<'_>) -> String {
    field
        .content_type()
        .map(str::to_string)
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .or_else(|| {
            field
                .file_name()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.essence_str().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// POST /api/upload
///
/// Reads the `file` part, checks size and type, and forwards the bytes to the
/// asset host. Nothing is written to local disk.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = content_type_of(&field);
        let file_name = field.file_name().map(str::to_string);
        let resource_type = ResourceType::classify(&content_type).ok_or_else(|| {
            AppError::UnsupportedMedia(format!(
                "Unsupported file type '{content_type}': only images and PDF are allowed"
            ))
        })?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(too_large());
        }
        upload = Some(AssetUpload {
            bytes,
            content_type,
            file_name,
            resource_type,
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let size = upload.bytes.len();
    let asset = tokio::time::timeout(state.config.request_timeout, state.assets.upload(upload))
        .await
        .map_err(|_| AssetError::Timeout)??;

    info!("Uploaded {} bytes as {}", size, asset.public_id);
    Ok(Json(UploadResponse {
        success: true,
        url: asset.url,
        public_id: asset.public_id,
        resource_type: asset.resource_type,
    }))
}
