//! Image upload endpoint.

use axum::extract::{multipart::{Multipart, MultipartRejection}, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::images::UploadedImage;
use crate::AppState;

/// POST /api/images - Upload a photo and return its permanent URL.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadedImage> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("photo") {
            let bytes = field.bytes().await?.to_vec();
            return success(state.catalog.upload_image(bytes).await?);
        }
    }

    Err(AppError::Validation("Missing 'photo' part".to_string()))
}
