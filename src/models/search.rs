//! Card search filters.

use serde::Deserialize;

use super::{CardType, Condition, Language};

/// Result ordering for a card search.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    /// List name, then card name
    #[default]
    ListName,
    /// List name, then card number, then card name
    CardNumber,
    /// Grading note descending, ungraded last
    Grade,
}

/// Query-string values where an empty parameter (`language=`) means unset,
/// as submitted by a plain HTML form.
mod blank_as_unset {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::value::StrDeserializer;
    use serde::de::{DeserializeOwned, Error, IntoDeserializer};
    use serde::{Deserialize, Deserializer};

    fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    /// Scalars parsed with `FromStr`.
    pub fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        non_blank(deserializer)?
            .map(|s| s.parse().map_err(D::Error::custom))
            .transpose()
    }

    /// Unit enums matched on their serde names.
    pub fn variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        non_blank(deserializer)?
            .map(|s| {
                let de: StrDeserializer<'_, D::Error> = s.as_str().into_deserializer();
                T::deserialize(de)
            })
            .transpose()
    }

    /// Unit enum falling back to its default when blank.
    pub fn variant_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(variant(deserializer)?.unwrap_or_default())
    }
}

/// Sparse search filters. A field left unset, or sent blank, does not
/// constrain the result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, deserialize_with = "blank_as_unset::parsed")]
    pub name_contains: Option<String>,
    #[serde(default, deserialize_with = "blank_as_unset::variant")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "blank_as_unset::parsed")]
    pub owned: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_unset::variant")]
    pub condition: Option<Condition>,
    #[serde(default, deserialize_with = "blank_as_unset::variant")]
    pub card_type: Option<CardType>,
    #[serde(default, deserialize_with = "blank_as_unset::parsed")]
    pub grading_min: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_unset::parsed")]
    pub grading_max: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_unset::variant_or_default")]
    pub sort: SearchSort,
}

#[cfg(test)]
impl SearchFilters {
    /// Filters matching names that contain `needle`, case-insensitively.
    pub fn name(needle: impl Into<String>) -> Self {
        Self {
            name_contains: Some(needle.into()),
            ..Self::default()
        }
    }
}
