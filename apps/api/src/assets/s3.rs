use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use super::{AssetError, AssetHost, AssetUpload, UploadedAsset};
use crate::config::Config;

/// Stores uploads in an S3-compatible bucket (AWS, MinIO, R2) and hands back
/// a public URL built from the configured base.
pub struct S3AssetHost {
    client: aws_sdk_s3::Client,
    bucket: String,
    folder: String,
    public_base_url: String,
}

impl S3AssetHost {
    /// Returns `None` when no bucket is configured.
    pub async fn from_config(config: &Config) -> Option<Self> {
        let bucket = config.s3_bucket.clone()?;
        let public_base_url = config.asset_base_url()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()));
        if let (Some(key_id), Some(secret)) =
            (&config.aws_access_key_id, &config.aws_secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "portfolio-static",
            ));
        }
        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        // Path-style addressing keeps MinIO and other self-hosted endpoints working.
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        info!("S3 asset host initialized (bucket: {bucket})");
        Some(S3AssetHost {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket,
            folder: config.asset_folder.trim_matches('/').to_string(),
            public_base_url,
        })
    }
}

/// Lower-cased alphanumeric extension from the file name, else from the MIME type.
fn extension_for(file_name: Option<&str>, content_type: &str) -> Option<String> {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    from_name.or_else(|| {
        mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    })
}

/// Returns `(public_id, key)`; the key is the public id plus extension.
fn object_key(folder: &str, file_name: Option<&str>, content_type: &str) -> (String, String) {
    let public_id = if folder.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{folder}/{}", Uuid::new_v4())
    };
    let key = match extension_for(file_name, content_type) {
        Some(ext) => format!("{public_id}.{ext}"),
        None => public_id.clone(),
    };
    (public_id, key)
}

#[async_trait]
impl AssetHost for S3AssetHost {
    async fn upload(&self, upload: AssetUpload) -> Result<UploadedAsset, AssetError> {
        let (public_id, key) = object_key(&self.folder, upload.file_name.as_deref(), &upload.content_type);
        let size = upload.bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(upload.bytes))
            .content_type(&upload.content_type)
            .send()
            .await
            .map_err(|e| AssetError::Upload(format!("{e:?}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);

        Ok(UploadedAsset {
            url: format!("{}/{}", self.public_base_url, key),
            public_id,
            resource_type: upload.resource_type,
        })
    }
}
