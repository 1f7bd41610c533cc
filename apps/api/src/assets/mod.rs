//! Upload passthrough to an external asset host.
//!
//! `AppState` carries an `Arc<dyn AssetHost>`: the S3 host when a bucket is
//! configured, `DisabledAssetHost` otherwise. Nothing is written locally.

pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub use s3::S3AssetHost;

/// Uploads above this size are rejected before reaching the host.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset host is not configured")]
    NotConfigured,

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("upload timed out")]
    Timeout,
}

/// How the host should treat the bytes: renderable image or opaque file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Raw,
}

impl ResourceType {
    /// Images of any subtype are accepted; PDF is the only non-image allowed.
    pub fn classify(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.starts_with("image/") {
            Some(ResourceType::Image)
        } else if essence == "application/pdf" {
            Some(ResourceType::Raw)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: String,
    pub resource_type: ResourceType,
}

#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, upload: AssetUpload) -> Result<UploadedAsset, AssetError>;
}

/// Stands in when no bucket is configured; every upload fails server-side.
pub struct DisabledAssetHost;

#[async_trait]
impl AssetHost for DisabledAssetHost {
    async fn upload(&self, _upload: AssetUpload) -> Result<UploadedAsset, AssetError> {
        Err(AssetError::NotConfigured)
    }
}
