//! Entitlement window entity (product_durations rows).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::services::EntitlementWindow;

/// Database row mapping for the product_durations table.
#[derive(Debug, Clone, FromRow)]
pub struct EntitlementEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl EntitlementEntity {
    pub fn window(&self) -> EntitlementWindow {
        EntitlementWindow {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
