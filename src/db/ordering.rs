//! Per-list card ordering.
//!
//! Cards are displayed by ascending `card_order`. Reordering is a swap between
//! neighbours; order values are never renumbered, so gaps left by deletions stay.

use super::Repository;
use crate::errors::AppError;
use crate::models::{Card, MoveDirection};

/// Order value a card is parked on while its slot is being handed over.
///
/// Allocated orders start at 1, so no card rests here.
const PARKED_ORDER: i64 = -1;

/// Resolve which two positions a move swaps.
///
/// `cards` must be sorted by `card_order`. Returns `Ok(None)` when the card is
/// already at the edge the move points to.
pub(crate) fn plan_move(
    cards: &[Card],
    card_id: &str,
    direction: MoveDirection,
) -> Result<Option<(usize, usize)>, AppError> {
    let index = cards
        .iter()
        .position(|c| c.id == card_id)
        .ok_or_else(|| AppError::NotFound(format!("Card {} not found", card_id)))?;

    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&n| n < cards.len()),
    };

    Ok(neighbour.map(|n| (index, n)))
}

impl Repository {
    /// Exchange the order values of two cards in the same list.
    ///
    /// Both rows are matched on id, list and their expected order; if either has
    /// moved or vanished the transaction rolls back and nothing changes.
    pub async fn swap_adjacent(
        &self,
        list_id: &str,
        (a_id, order_a): (&str, i64),
        (b_id, order_b): (&str, i64),
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let steps = [
            (a_id, order_a, PARKED_ORDER),
            (b_id, order_b, order_a),
            (a_id, PARKED_ORDER, order_b),
        ];

        for (id, from, to) in steps {
            let result = sqlx::query(
                "UPDATE cards SET card_order = ? WHERE id = ? AND list_id = ? AND card_order = ?",
            )
            .bind(to)
            .bind(id)
            .bind(list_id)
            .bind(from)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(AppError::NotFound(format!(
                    "Card {} is not at position {} in list {}",
                    id, from, list_id
                )));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Move a card one step up or down within its list.
    ///
    /// Moving the first card up or the last card down leaves the list unchanged.
    /// Returns the list's cards in their new order.
    pub async fn move_card(
        &self,
        card_id: &str,
        direction: MoveDirection,
    ) -> Result<Vec<Card>, AppError> {
        let card = self
            .get_card(card_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", card_id)))?;

        let cards = self.list_cards(&card.list_id).await?;

        let Some((from, to)) = plan_move(&cards, card_id, direction)? else {
            tracing::debug!("Card {} already at the edge, move {:?} ignored", card_id, direction);
            return Ok(cards);
        };

        let (a, b) = (&cards[from], &cards[to]);
        self.swap_adjacent(&card.list_id, (&a.id, a.card_order), (&b.id, b.card_order))
            .await?;

        self.list_cards(&card.list_id).await
    }
}
