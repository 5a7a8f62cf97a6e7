//! Read-only view endpoints for browsing and sharing.

use axum::extract::{Path, State};

use super::{success, ApiQuery, ApiResult};
use crate::models::{CardDetailView, CardList, CardView, ListSummary, SearchFilters};
use crate::AppState;

/// GET /view/lists
pub async fn list_lists(State(state): State<AppState>) -> ApiResult<Vec<ListSummary>> {
    success(state.reader.list_lists().await?)
}

/// GET /view/lists/:id
pub async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CardList> {
    success(state.reader.get_list(&id).await?)
}

/// GET /view/lists/:id/cards
pub async fn list_cards(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<Vec<CardView>> {
    success(state.reader.list_cards(&list_id).await?)
}

/// GET /view/cards/:id
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CardDetailView> {
    success(state.reader.get_card(&id).await?)
}

/// GET /view/search
pub async fn search_cards(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<SearchFilters>,
) -> ApiResult<Vec<CardDetailView>> {
    success(state.reader.search_cards(&filters).await?)
}
