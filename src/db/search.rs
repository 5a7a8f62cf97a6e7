//! Card search over the card/list join.
//!
//! Exact filters translate to `AND` clauses on a single query; an unset filter
//! adds no clause. The name filter is applied to the fetched rows with Unicode
//! case folding, which SQLite's `LOWER` does not do.

use sqlx::{QueryBuilder, Sqlite};

use super::repository::card_detail_from_row;
use super::Repository;
use crate::errors::AppError;
use crate::models::{CardDetail, SearchFilters, SearchSort};

const SEARCH_SELECT: &str = r#"SELECT c.id, c.list_id, c.name, c.photo_url, c.card_number, c.collection_total,
       c.language, c.condition, c.card_type, c.grading_note, c.owned, c.card_order,
       l.name AS list_name
FROM cards c
JOIN lists l ON l.id = c.list_id
WHERE 1=1"#;

fn order_clause(sort: SearchSort) -> &'static str {
    match sort {
        SearchSort::ListName => " ORDER BY l.name ASC, c.name ASC, c.id ASC",
        SearchSort::CardNumber => {
            " ORDER BY l.name ASC, CAST(c.card_number AS INTEGER) ASC, c.card_number ASC, c.name ASC, c.id ASC"
        }
        SearchSort::Grade => {
            " ORDER BY c.grading_note IS NULL ASC, c.grading_note DESC, l.name ASC, c.name ASC, c.id ASC"
        }
    }
}

/// Build the search statement for every filter except `name_contains`.
pub(crate) fn build_search_query(filters: &SearchFilters) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::<Sqlite>::new(SEARCH_SELECT);

    if let Some(language) = filters.language {
        builder.push(" AND c.language = ");
        builder.push_bind(language.as_str());
    }

    if let Some(condition) = filters.condition {
        builder.push(" AND c.condition = ");
        builder.push_bind(condition.as_str());
    }

    if let Some(card_type) = filters.card_type {
        builder.push(" AND c.card_type = ");
        builder.push_bind(card_type.as_str());
    }

    if let Some(owned) = filters.owned {
        builder.push(" AND c.owned = ");
        builder.push_bind(owned as i32);
    }

    if filters.grading_min.is_some() || filters.grading_max.is_some() {
        builder.push(" AND c.grading_note IS NOT NULL");
    }

    if let Some(min) = filters.grading_min {
        builder.push(" AND c.grading_note >= ");
        builder.push_bind(min);
    }

    if let Some(max) = filters.grading_max {
        builder.push(" AND c.grading_note <= ");
        builder.push_bind(max);
    }

    builder.push(order_clause(filters.sort));
    builder
}

impl Repository {
    /// Search cards across all lists.
    pub async fn search_cards(&self, filters: &SearchFilters) -> Result<Vec<CardDetail>, AppError> {
        let mut builder = build_search_query(filters);
        let rows = builder.build().fetch_all(&self.pool).await?;
        let results = rows
            .iter()
            .map(card_detail_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let needle = filters
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(match needle {
            Some(needle) => results
                .into_iter()
                .filter(|r| r.card.name.to_lowercase().contains(&needle))
                .collect(),
            None => results,
        })
    }
}
