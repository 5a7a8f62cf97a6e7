//! Catalog service: the validated read/write API over lists and cards.
//!
//! [`Catalog`] backs the editing surface. [`CatalogReader`] backs the shared
//! view surface and holds a read-only repository, so it has no write path.

mod reader;
mod validate;

pub use reader::CatalogReader;

use std::sync::Arc;

use crate::db::Repository;
use crate::errors::AppError;
use crate::images::{ImageStore, UploadedImage};
use crate::models::{
    Card, CardAttributes, CardDetail, CardList, ListSummary, MoveDirection, SearchFilters,
};

/// Read/write catalog operations.
#[derive(Clone)]
pub struct Catalog {
    repo: Repository,
    images: Arc<dyn ImageStore>,
}

impl Catalog {
    pub fn new(repo: Repository, images: Arc<dyn ImageStore>) -> Self {
        Self { repo, images }
    }

    // ==================== LISTS ====================

    pub async fn list_lists(&self) -> Result<Vec<ListSummary>, AppError> {
        self.repo.list_lists().await
    }

    pub async fn get_list(&self, id: &str) -> Result<CardList, AppError> {
        self.repo
            .get_list(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("List {} not found", id)))
    }

    pub async fn create_list(&self, name: &str) -> Result<CardList, AppError> {
        let name = validate::list_name(name)?;
        let list = self.repo.create_list(name).await?;
        tracing::info!("Created list {} ({})", list.id, list.name);
        Ok(list)
    }

    pub async fn rename_list(&self, id: &str, name: &str) -> Result<CardList, AppError> {
        let name = validate::list_name(name)?;
        let list = self.repo.rename_list(id, name).await?;
        tracing::info!("Renamed list {} to {}", list.id, list.name);
        Ok(list)
    }

    /// Delete a list and its cards. Deleting a missing list is not an error.
    pub async fn delete_list(&self, id: &str) -> Result<(), AppError> {
        if self.repo.delete_list(id).await? {
            tracing::info!("Deleted list {}", id);
        } else {
            tracing::debug!("Delete of missing list {} ignored", id);
        }
        Ok(())
    }

    // ==================== CARDS ====================

    /// Cards of a list in display order. An unknown list has no cards.
    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, AppError> {
        self.repo.list_cards(list_id).await
    }

    pub async fn get_card(&self, id: &str) -> Result<CardDetail, AppError> {
        self.repo
            .get_card_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", id)))
    }

    /// Add a card whose photo is already in the image store.
    pub async fn add_card(
        &self,
        list_id: &str,
        photo_url: &str,
        attrs: &CardAttributes,
    ) -> Result<Card, AppError> {
        validate::photo_url(photo_url)?;
        let attrs = validate::card_attributes(attrs)?;

        let card = self.repo.insert_card(list_id, photo_url.trim(), &attrs).await?;
        tracing::info!(
            "Added card {} ({}) to list {} at position {}",
            card.id,
            card.name,
            list_id,
            card.card_order
        );
        Ok(card)
    }

    /// Validate, upload the photo, then add the card.
    ///
    /// Nothing is written when validation or the upload fails.
    pub async fn add_card_with_photo(
        &self,
        list_id: &str,
        attrs: &CardAttributes,
        photo: Vec<u8>,
    ) -> Result<Card, AppError> {
        let attrs = validate::card_attributes(attrs)?;
        if photo.is_empty() {
            return Err(AppError::Validation("Card photo is required".to_string()));
        }

        let uploaded = self.images.upload(photo).await?;
        self.add_card(list_id, &uploaded.secure_url, &attrs).await
    }

    pub async fn upload_image(&self, bytes: Vec<u8>) -> Result<UploadedImage, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Image is empty".to_string()));
        }
        self.images.upload(bytes).await
    }

    /// Overwrite a card's editable attributes. Photo and position are kept.
    pub async fn edit_card(&self, id: &str, attrs: &CardAttributes) -> Result<Card, AppError> {
        let attrs = validate::card_attributes(attrs)?;
        let card = self.repo.update_card(id, &attrs).await?;
        tracing::info!("Updated card {}", id);
        Ok(card)
    }

    /// Delete a card. Deleting a missing card is not an error.
    pub async fn delete_card(&self, id: &str) -> Result<(), AppError> {
        if self.repo.delete_card(id).await? {
            tracing::info!("Deleted card {}", id);
        } else {
            tracing::debug!("Delete of missing card {} ignored", id);
        }
        Ok(())
    }

    pub async fn toggle_owned(&self, id: &str) -> Result<Card, AppError> {
        let card = self.repo.toggle_owned(id).await?;
        tracing::info!("Card {} owned = {}", id, card.owned);
        Ok(card)
    }

    /// Move a card one step and return its list in the new order.
    pub async fn move_card(
        &self,
        id: &str,
        direction: MoveDirection,
    ) -> Result<Vec<Card>, AppError> {
        let cards = self.repo.move_card(id, direction).await?;
        tracing::info!("Moved card {} {:?}", id, direction);
        Ok(cards)
    }

    pub async fn search_cards(&self, filters: &SearchFilters) -> Result<Vec<CardDetail>, AppError> {
        validate::search_filters(filters)?;
        self.repo.search_cards(filters).await
    }
}
