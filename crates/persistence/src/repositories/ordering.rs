//! Shared sort-order swap for manually ordered tables.

use sqlx::PgPool;
use uuid::Uuid;

use domain::services::{MoveDirection, SortSlot, SortSwap};

use crate::metrics::QueryTimer;

/// Tables whose rows carry a manual `sort_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortableTable {
    Products,
    Testimonials,
}

impl SortableTable {
    fn select_current(&self) -> &'static str {
        match self {
            SortableTable::Products => "SELECT id, sort_order FROM products WHERE id = $1 FOR UPDATE",
            SortableTable::Testimonials => {
                "SELECT id, sort_order FROM testimonials WHERE id = $1 FOR UPDATE"
            }
        }
    }

    fn select_neighbour(&self, direction: MoveDirection) -> &'static str {
        match (self, direction) {
            (SortableTable::Products, MoveDirection::Up) => {
                "SELECT id, sort_order FROM products WHERE sort_order < $1 \
                 ORDER BY sort_order DESC, created_at DESC LIMIT 1 FOR UPDATE"
            }
            (SortableTable::Products, MoveDirection::Down) => {
                "SELECT id, sort_order FROM products WHERE sort_order > $1 \
                 ORDER BY sort_order ASC, created_at ASC LIMIT 1 FOR UPDATE"
            }
            (SortableTable::Testimonials, MoveDirection::Up) => {
                "SELECT id, sort_order FROM testimonials WHERE sort_order < $1 \
                 ORDER BY sort_order DESC, created_at DESC LIMIT 1 FOR UPDATE"
            }
            (SortableTable::Testimonials, MoveDirection::Down) => {
                "SELECT id, sort_order FROM testimonials WHERE sort_order > $1 \
                 ORDER BY sort_order ASC, created_at ASC LIMIT 1 FOR UPDATE"
            }
        }
    }

    fn update_sort_order(&self) -> &'static str {
        match self {
            SortableTable::Products => {
                "UPDATE products SET sort_order = $2, updated_at = NOW() WHERE id = $1"
            }
            SortableTable::Testimonials => "UPDATE testimonials SET sort_order = $2 WHERE id = $1",
        }
    }
}

/// Outcome of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Already first (up) or last (down).
    AtEdge,
    NotFound,
}

/// Swaps the row's sort order with its nearest neighbour in one transaction.
pub async fn move_row(
    pool: &PgPool,
    table: SortableTable,
    id: Uuid,
    direction: MoveDirection,
) -> Result<MoveOutcome, sqlx::Error> {
    let timer = QueryTimer::new("move_sort_order");
    let mut tx = pool.begin().await?;

    let current: Option<(Uuid, i32)> = sqlx::query_as(table.select_current())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((current_id, current_order)) = current else {
        timer.record();
        return Ok(MoveOutcome::NotFound);
    };

    let neighbour: Option<(Uuid, i32)> = sqlx::query_as(table.select_neighbour(direction))
        .bind(current_order)
        .fetch_optional(&mut *tx)
        .await?;

    let current = SortSlot {
        id: current_id,
        sort_order: current_order,
    };
    let neighbour = neighbour.map(|(id, sort_order)| SortSlot { id, sort_order });

    let Some(swap) = SortSwap::plan(current, neighbour, direction) else {
        timer.record();
        return Ok(MoveOutcome::AtEdge);
    };

    for slot in [swap.moved, swap.displaced] {
        sqlx::query(table.update_sort_order())
            .bind(slot.id)
            .bind(slot.sort_order)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    timer.record();
    Ok(MoveOutcome::Moved)
}
