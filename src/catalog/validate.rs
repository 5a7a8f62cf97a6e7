//! Input checks run before anything reaches the database.

use crate::errors::AppError;
use crate::models::{CardAttributes, SearchFilters};

pub const MIN_GRADE: i64 = 1;
pub const MAX_GRADE: i64 = 10;

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", what)));
    }
    Ok(trimmed)
}

fn grade(value: i64, what: &str) -> Result<(), AppError> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}, got {}",
            what, MIN_GRADE, MAX_GRADE, value
        )));
    }
    Ok(())
}

/// Trimmed, non-empty list name.
pub fn list_name(name: &str) -> Result<&str, AppError> {
    required(name, "List name")
}

pub fn photo_url(url: &str) -> Result<(), AppError> {
    required(url, "Card photo URL").map(|_| ())
}

/// Checked attributes, with the name and number trimmed.
pub fn card_attributes(attrs: &CardAttributes) -> Result<CardAttributes, AppError> {
    let name = required(&attrs.name, "Card name")?;
    let card_number = required(&attrs.card_number, "Card number")?;

    if let Some(total) = attrs.collection_total {
        if total < 1 {
            return Err(AppError::Validation(format!(
                "Collection total must be positive, got {}",
                total
            )));
        }
    }

    if let Some(note) = attrs.grading_note {
        grade(note, "Grading note")?;
    }

    Ok(CardAttributes {
        name: name.to_string(),
        card_number: card_number.to_string(),
        ..attrs.clone()
    })
}

pub fn search_filters(filters: &SearchFilters) -> Result<(), AppError> {
    if let Some(min) = filters.grading_min {
        grade(min, "Minimum grade")?;
    }
    if let Some(max) = filters.grading_max {
        grade(max, "Maximum grade")?;
    }
    if let (Some(min), Some(max)) = (filters.grading_min, filters.grading_max) {
        if min > max {
            return Err(AppError::Validation(format!(
                "Minimum grade {} is above maximum grade {}",
                min, max
            )));
        }
    }
    Ok(())
}
