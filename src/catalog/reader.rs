//! Read-only catalog access for the shared view.

use crate::db::Repository;
use crate::errors::AppError;
use crate::images::{normalize_delivery_url, thumbnail_url};
use crate::models::{
    Card, CardDetail, CardDetailView, CardList, CardView, ListSummary, SearchFilters,
};

use super::validate;

const DISPLAY_WIDTH: u32 = 900;
const DISPLAY_HEIGHT: u32 = 1200;
const THUMBNAIL_SIZE: u32 = 80;

fn view(card: Card) -> CardView {
    CardView {
        display_url: normalize_delivery_url(&card.photo_url, DISPLAY_WIDTH, DISPLAY_HEIGHT, true),
        thumbnail_url: thumbnail_url(&card.photo_url, THUMBNAIL_SIZE),
        card,
    }
}

fn detail_view(detail: CardDetail) -> CardDetailView {
    CardDetailView {
        card: view(detail.card),
        list_name: detail.list_name,
    }
}

/// Catalog queries over a read-only connection pool.
#[derive(Clone)]
pub struct CatalogReader {
    repo: Repository,
}

impl CatalogReader {
    /// `repo` should sit on a pool from [`crate::db::open_read_only`].
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list_lists(&self) -> Result<Vec<ListSummary>, AppError> {
        self.repo.list_lists().await
    }

    pub async fn get_list(&self, id: &str) -> Result<CardList, AppError> {
        self.repo
            .get_list(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("List {} not found", id)))
    }

    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<CardView>, AppError> {
        let cards = self.repo.list_cards(list_id).await?;
        Ok(cards.into_iter().map(view).collect())
    }

    pub async fn get_card(&self, id: &str) -> Result<CardDetailView, AppError> {
        self.repo
            .get_card_detail(id)
            .await?
            .map(detail_view)
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", id)))
    }

    pub async fn search_cards(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<CardDetailView>, AppError> {
        validate::search_filters(filters)?;
        let results = self.repo.search_cards(filters).await?;
        Ok(results.into_iter().map(detail_view).collect())
    }
}
