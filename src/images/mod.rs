//! Image store for card photos.
//!
//! Photos are uploaded once, before the card row is written, and referenced
//! afterwards only by the URL the store hands back.

mod cloudinary;

pub use cloudinary::CloudinaryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub secure_url: String,
}

/// Anything that can take image bytes and return a permanent public URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedImage, AppError>;
}

/// Store used when no image backend is configured. Every upload fails.
#[derive(Debug, Default)]
pub struct DisabledImageStore;

#[async_trait]
impl ImageStore for DisabledImageStore {
    async fn upload(&self, _bytes: Vec<u8>) -> Result<UploadedImage, AppError> {
        Err(AppError::Upload(
            "Image store is not configured (set CLOUDINARY_* variables)".to_string(),
        ))
    }
}

const CLOUDINARY_HOST: &str = "res.cloudinary.com";
const UPLOAD_SEGMENT: &str = "/image/upload/";

/// Transformation prefixes that mean a URL already carries a transformation.
const TRANSFORM_PREFIXES: [&str; 6] = ["w_", "h_", "c_", "q_", "f_", "ar_"];

/// Split a Cloudinary delivery URL around its `/image/upload/` segment.
fn split_delivery_url(url: &str) -> Option<(&str, &str)> {
    if !url.contains(CLOUDINARY_HOST) {
        return None;
    }
    url.split_once(UPLOAD_SEGMENT)
}

/// Rewrite a Cloudinary URL for full-size display.
///
/// With `pad` the image is letterboxed onto a white `width`x`height` canvas,
/// otherwise it is only limited to `width`. URLs from other hosts, or that
/// already carry a transformation, are returned unchanged.
pub fn normalize_delivery_url(url: &str, width: u32, height: u32, pad: bool) -> String {
    let Some((before, after)) = split_delivery_url(url) else {
        return url.to_string();
    };

    let first_segment = after.split('/').next().unwrap_or_default();
    let already_transformed = first_segment
        .split(',')
        .any(|part| TRANSFORM_PREFIXES.iter().any(|p| part.starts_with(p)));
    if already_transformed {
        return url.to_string();
    }

    let transform = if pad {
        format!("f_auto,q_auto,c_pad,b_white,w_{},h_{}", width, height)
    } else {
        format!("f_auto,q_auto,c_limit,w_{}", width)
    };
    format!("{}{}{}/{}", before, UPLOAD_SEGMENT, transform, after)
}

/// Rewrite a Cloudinary URL into a square, subject-centred thumbnail.
pub fn thumbnail_url(url: &str, size: u32) -> String {
    match split_delivery_url(url) {
        Some((before, after)) => format!(
            "{}{}f_auto,q_auto,c_fill,g_auto,w_{},h_{}/{}",
            before, UPLOAD_SEGMENT, size, size, after
        ),
        None => url.to_string(),
    }
}
