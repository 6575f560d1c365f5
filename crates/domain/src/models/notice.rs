//! Site notice domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::validate_not_blank;
use uuid::Uuid;
use validator::Validate;

/// A banner message. At most one notice is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notice {
    pub id: Uuid,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notices are created inactive and activated separately.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, max = 1000, message = "Notice must be 1-1000 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNoticeRequest {
    #[validate(length(min = 1, max = 1000, message = "Notice must be 1-1000 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_notice_validation() {
        let ok = CreateNoticeRequest {
            content: "Black Friday: 20% off".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = CreateNoticeRequest {
            content: " ".to_string(),
        };
        assert!(blank.validate().is_err());
    }
}
