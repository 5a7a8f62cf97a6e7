//! Data models for the Pokélist card catalog.
//!
//! Field names serialize as camelCase for the JSON API.

mod card;
mod list;
mod search;

pub use card::*;
pub use list::*;
pub use search::*;
