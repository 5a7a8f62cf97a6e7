//! Configuration module for the Pokélist backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default Cloudinary folder for uploaded card photos.
pub const DEFAULT_UPLOAD_FOLDER: &str = "pokelist";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Cloudinary account credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Image store credentials; uploads are disabled when absent
    pub cloudinary: Option<CloudinaryConfig>,
    /// Largest accepted request body for photo uploads
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("POKELIST_DB_PATH")
            .unwrap_or_else(|_| "./data/pokelist.sqlite".to_string())
            .into();

        let bind_addr = env::var("POKELIST_BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let log_level = env::var("POKELIST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("POKELIST_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Pretty);

        let folder = env::var("POKELIST_UPLOAD_FOLDER")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_FOLDER.to_string());

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_API_KEY"),
            env::var("CLOUDINARY_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                folder,
            }),
            _ => None,
        };

        let max_upload_bytes = env::var("POKELIST_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024);

        Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            cloudinary,
            max_upload_bytes,
        }
    }
}
