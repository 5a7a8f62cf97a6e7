//! List API endpoints.

use axum::extract::{Path, State};

use super::{success, ApiJson, ApiResult};
use crate::models::{CardList, CreateListRequest, ListSummary, RenameListRequest};
use crate::AppState;

/// GET /api/lists - List all lists with card counts.
pub async fn list_lists(State(state): State<AppState>) -> ApiResult<Vec<ListSummary>> {
    success(state.catalog.list_lists().await?)
}

/// POST /api/lists - Create a new list.
pub async fn create_list(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateListRequest>,
) -> ApiResult<CardList> {
    success(state.catalog.create_list(&request.name).await?)
}

/// GET /api/lists/:id - Get a single list.
pub async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CardList> {
    success(state.catalog.get_list(&id).await?)
}

/// PUT /api/lists/:id - Rename a list.
pub async fn rename_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RenameListRequest>,
) -> ApiResult<CardList> {
    success(state.catalog.rename_list(&id, &request.name).await?)
}

/// DELETE /api/lists/:id - Delete a list and all its cards.
pub async fn delete_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.catalog.delete_list(&id).await?;
    success(())
}
