//! Database repository for list and card operations.
//!
//! Uses prepared statements and transactions for data integrity.

use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Card, CardAttributes, CardDetail, CardList, CardType, Condition, Language, ListSummary,
};

/// Card columns in the order `card_from_row` expects them.
pub(crate) const CARD_COLUMNS: &str = "id, list_id, name, photo_url, card_number, collection_total, language, condition, card_type, grading_note, owned, card_order";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(crate) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== LIST OPERATIONS ====================

    /// List all lists with their card counts, ordered by name.
    pub async fn list_lists(&self) -> Result<Vec<ListSummary>, AppError> {
        let rows = sqlx::query(
            r#"SELECT l.id, l.name, COUNT(c.id) AS card_count
               FROM lists l
               LEFT JOIN cards c ON c.list_id = l.id
               GROUP BY l.id, l.name
               ORDER BY l.name ASC, l.id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok::<_, AppError>(ListSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    card_count: row.try_get("card_count")?,
                })
            })
            .collect()
    }

    /// Get a list by ID.
    pub async fn get_list(&self, id: &str) -> Result<Option<CardList>, AppError> {
        let row = sqlx::query("SELECT id, name FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(list_from_row).transpose()
    }

    /// Create a new list.
    pub async fn create_list(&self, name: &str) -> Result<CardList, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO lists (id, name) VALUES (?, ?)")
            .bind(&id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(CardList {
            id,
            name: name.to_string(),
        })
    }

    /// Rename a list.
    pub async fn rename_list(&self, id: &str, name: &str) -> Result<CardList, AppError> {
        let result = sqlx::query("UPDATE lists SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("List {} not found", id)));
        }

        Ok(CardList {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Delete a list and every card in it. Returns whether the list existed.
    pub async fn delete_list(&self, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cards WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== CARD OPERATIONS ====================

    /// All cards of a list in display order.
    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM cards WHERE list_id = ? ORDER BY card_order ASC",
            CARD_COLUMNS
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(card_from_row).collect()
    }

    /// Get a card by ID.
    pub async fn get_card(&self, id: &str) -> Result<Option<Card>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM cards WHERE id = ?", CARD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(card_from_row).transpose()
    }

    /// Get a card by ID together with its list's name.
    pub async fn get_card_detail(&self, id: &str) -> Result<Option<CardDetail>, AppError> {
        let row = sqlx::query(
            r#"SELECT c.id, c.list_id, c.name, c.photo_url, c.card_number, c.collection_total,
                      c.language, c.condition, c.card_type, c.grading_note, c.owned, c.card_order,
                      l.name AS list_name
               FROM cards c
               JOIN lists l ON l.id = c.list_id
               WHERE c.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(card_detail_from_row).transpose()
    }

    /// Insert a card at the end of its list.
    ///
    /// The list check and the `max + 1` order allocation run as one write
    /// statement, so concurrent inserts into a list serialize on the write lock.
    pub async fn insert_card(
        &self,
        list_id: &str,
        photo_url: &str,
        attrs: &CardAttributes,
    ) -> Result<Card, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        let card_order: Option<i64> = sqlx::query_scalar(
            r#"INSERT INTO cards (id, list_id, name, photo_url, card_number, collection_total,
                                  language, card_order, condition, card_type, grading_note, owned)
               SELECT ?, l.id, ?, ?, ?, ?, ?,
                      (SELECT COALESCE(MAX(c.card_order), 0) + 1 FROM cards c WHERE c.list_id = l.id),
                      ?, ?, ?, ?
               FROM lists l
               WHERE l.id = ?
               RETURNING card_order"#,
        )
        .bind(&id)
        .bind(&attrs.name)
        .bind(photo_url)
        .bind(&attrs.card_number)
        .bind(attrs.collection_total)
        .bind(attrs.language.as_str())
        .bind(attrs.condition.as_str())
        .bind(attrs.card_type.as_str())
        .bind(attrs.grading_note)
        .bind(attrs.owned as i32)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        let card_order =
            card_order.ok_or_else(|| AppError::NotFound(format!("List {} not found", list_id)))?;

        Ok(Card {
            id,
            list_id: list_id.to_string(),
            name: attrs.name.clone(),
            photo_url: photo_url.to_string(),
            card_number: attrs.card_number.clone(),
            collection_total: attrs.collection_total,
            language: attrs.language,
            condition: attrs.condition,
            card_type: attrs.card_type,
            grading_note: attrs.grading_note,
            owned: attrs.owned,
            card_order,
        })
    }

    /// Overwrite the editable attributes of a card.
    ///
    /// `photo_url`, `card_order` and `list_id` are left as they are.
    pub async fn update_card(&self, id: &str, attrs: &CardAttributes) -> Result<Card, AppError> {
        let row = sqlx::query(&format!(
            r#"UPDATE cards SET
                name = ?, card_number = ?, collection_total = ?, language = ?,
                condition = ?, card_type = ?, grading_note = ?, owned = ?
               WHERE id = ?
               RETURNING {}"#,
            CARD_COLUMNS
        ))
        .bind(&attrs.name)
        .bind(&attrs.card_number)
        .bind(attrs.collection_total)
        .bind(attrs.language.as_str())
        .bind(attrs.condition.as_str())
        .bind(attrs.card_type.as_str())
        .bind(attrs.grading_note)
        .bind(attrs.owned as i32)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => card_from_row(&row),
            None => Err(AppError::NotFound(format!("Card {} not found", id))),
        }
    }

    /// Flip a card between owned and wanted in a single statement.
    pub async fn toggle_owned(&self, id: &str) -> Result<Card, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE cards SET owned = NOT owned WHERE id = ? RETURNING {}",
            CARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => card_from_row(&row),
            None => Err(AppError::NotFound(format!("Card {} not found", id))),
        }
    }

    /// Delete a card. Remaining cards keep their order values.
    pub async fn delete_card(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Helper functions for row conversion

fn list_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<CardList, AppError> {
    Ok(CardList {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

pub(crate) fn card_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Card, AppError> {
    let language: String = row.try_get("language")?;
    let condition: String = row.try_get("condition")?;
    let card_type: String = row.try_get("card_type")?;
    let owned: i32 = row.try_get("owned")?;

    Ok(Card {
        id: row.try_get("id")?,
        list_id: row.try_get("list_id")?,
        name: row.try_get("name")?,
        photo_url: row.try_get("photo_url")?,
        card_number: row.try_get("card_number")?,
        collection_total: row.try_get("collection_total")?,
        language: Language::from_str(&language)
            .ok_or_else(|| AppError::Storage(format!("Unknown language '{}'", language)))?,
        condition: Condition::from_str(&condition)
            .ok_or_else(|| AppError::Storage(format!("Unknown condition '{}'", condition)))?,
        card_type: CardType::from_str(&card_type)
            .ok_or_else(|| AppError::Storage(format!("Unknown card type '{}'", card_type)))?,
        grading_note: row.try_get("grading_note")?,
        owned: owned != 0,
        card_order: row.try_get("card_order")?,
    })
}

pub(crate) fn card_detail_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<CardDetail, AppError> {
    Ok(CardDetail {
        card: card_from_row(row)?,
        list_name: row.try_get("list_name")?,
    })
}
