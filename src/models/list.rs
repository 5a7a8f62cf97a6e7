//! Card list model.

use serde::{Deserialize, Serialize};

/// A user-defined, named collection of cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardList {
    pub id: String,
    pub name: String,
}

/// A list as shown on the home listing, with its card count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub card_count: i64,
}

/// Request body for creating a new list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: String,
}

/// Request body for renaming a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameListRequest {
    pub name: String,
}
