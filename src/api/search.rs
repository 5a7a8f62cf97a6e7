//! Search API endpoint.

use axum::extract::State;

use super::{success, ApiQuery, ApiResult};
use crate::models::{CardDetail, SearchFilters};
use crate::AppState;

/// GET /api/search - Search cards across all lists.
///
/// Query parameters: `nameContains`, `language`, `owned`, `condition`,
/// `cardType`, `gradingMin`, `gradingMax`, `sort` (`list_name`, `card_number`, `grade`).
pub async fn search_cards(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<SearchFilters>,
) -> ApiResult<Vec<CardDetail>> {
    success(state.catalog.search_cards(&filters).await?)
}
