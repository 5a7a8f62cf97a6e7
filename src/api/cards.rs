//! Card API endpoints.

use axum::extract::{multipart::{Multipart, MultipartRejection}, Path, State};

use super::{success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Card, CardAttributes, CardDetail, CreateCardRequest, MoveCardRequest,
};
use crate::AppState;

/// GET /api/lists/:id/cards - Cards of a list in display order.
pub async fn list_cards(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<Vec<Card>> {
    success(state.catalog.list_cards(&list_id).await?)
}

/// POST /api/lists/:id/cards - Add a card whose photo is already uploaded.
pub async fn create_card(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    ApiJson(request): ApiJson<CreateCardRequest>,
) -> ApiResult<Card> {
    success(
        state
            .catalog
            .add_card(&list_id, &request.photo_url, &request.attributes)
            .await?,
    )
}

/// POST /api/lists/:id/cards/upload - Add a card and upload its photo.
///
/// Multipart body: a `card` part holding the attributes as JSON and a
/// `photo` part holding the image bytes.
pub async fn upload_card(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Card> {
    let mut multipart = multipart?;
    let mut attrs: Option<CardAttributes> = None;
    let mut photo: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "card" => attrs = Some(serde_json::from_str(&field.text().await?)?),
            "photo" => photo = Some(field.bytes().await?.to_vec()),
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let attrs = attrs.ok_or_else(|| AppError::BadRequest("Missing 'card' part".to_string()))?;
    let photo = photo.ok_or_else(|| AppError::Validation("Card photo is required".to_string()))?;

    success(
        state
            .catalog
            .add_card_with_photo(&list_id, &attrs, photo)
            .await?,
    )
}

/// GET /api/cards/:id - A card with its list name.
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CardDetail> {
    success(state.catalog.get_card(&id).await?)
}

/// PUT /api/cards/:id - Overwrite a card's editable attributes.
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CardAttributes>,
) -> ApiResult<Card> {
    success(state.catalog.edit_card(&id, &request).await?)
}

/// DELETE /api/cards/:id - Delete a card.
pub async fn delete_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.catalog.delete_card(&id).await?;
    success(())
}

/// POST /api/cards/:id/toggle-owned - Flip between owned and wanted.
pub async fn toggle_owned(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Card> {
    success(state.catalog.toggle_owned(&id).await?)
}

/// POST /api/cards/:id/move - Move a card one step up or down.
pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MoveCardRequest>,
) -> ApiResult<Vec<Card>> {
    success(state.catalog.move_card(&id, request.direction).await?)
}
