use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5500,http://localhost:3000,http://127.0.0.1:5500";

/// Application configuration loaded from environment variables.
/// Everything except the asset host and database has a usable default, so the
/// API can boot locally against the in-memory store with no `.env` at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service falls back to the in-memory document store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub asset_public_base_url: Option<String>,
    pub asset_folder: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            db_max_connections: 10,
            port: 8080,
            rust_log: "info".to_string(),
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
            s3_bucket: None,
            s3_endpoint: None,
            s3_region: "us-east-1".to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            asset_public_base_url: None,
            asset_folder: "portfolio".to_string(),
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            cors_origins: optional_env("CORS_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.cors_origins),
            s3_bucket: optional_env("S3_BUCKET"),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            s3_region: optional_env("S3_REGION").unwrap_or(defaults.s3_region),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            asset_public_base_url: optional_env("ASSET_PUBLIC_BASE_URL"),
            asset_folder: optional_env("ASSET_FOLDER").unwrap_or(defaults.asset_folder),
            request_timeout: Duration::from_secs(parse_env(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            cache_ttl: Duration::from_secs(parse_env(
                "CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
        })
    }

    /// Base URL that uploaded keys are appended to. Falls back to path-style
    /// addressing on the configured endpoint, then to the public AWS host.
    pub fn asset_base_url(&self) -> Option<String> {
        if let Some(base) = &self.asset_public_base_url {
            return Some(base.trim_end_matches('/').to_string());
        }
        let bucket = self.s3_bucket.as_ref()?;
        Some(match &self.s3_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            None => format!("https://{bucket}.s3.{}.amazonaws.com", self.s3_region),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
