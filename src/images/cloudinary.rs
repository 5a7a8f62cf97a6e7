//! Cloudinary upload client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageStore, UploadedImage};
use crate::config::CloudinaryConfig;
use crate::errors::AppError;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Subset of the upload API response we rely on.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadApiError>,
}

#[derive(Debug, Deserialize)]
struct UploadApiError {
    message: String,
}

/// Signed uploads to a Cloudinary account.
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: Client,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: CloudinaryConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", API_BASE, self.config.cloud_name)
    }

    /// Parameters that are part of the signature, already sorted by name.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.to_string()),
        ]
    }

    fn build_form(&self, bytes: Vec<u8>, timestamp: i64) -> multipart::Form {
        let params = self.signed_params(timestamp);
        let signature = sign(&params, &self.config.api_secret);

        let mut form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name("card"))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        for (name, value) in params {
            form = form.text(name, value);
        }
        form
    }
}

/// SHA-256 signature over `a=1&b=2` followed by the API secret.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedImage, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Upload("Image is empty".to_string()));
        }

        let size = bytes.len();
        let timestamp = chrono::Utc::now().timestamp();
        let form = self.build_form(bytes, timestamp);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body: UploadResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(AppError::Upload(format!(
                "Cloudinary rejected upload ({}): {}",
                status, error.message
            )));
        }

        let secure_url = body.secure_url.ok_or_else(|| {
            AppError::Upload(format!("Cloudinary response ({}) had no secure_url", status))
        })?;

        tracing::info!("Uploaded {} byte image to {}", size, secure_url);
        Ok(UploadedImage { secure_url })
    }
}
