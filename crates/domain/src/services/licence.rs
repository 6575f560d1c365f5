//! Licence durations and entitlement windows.
//!
//! Products carry a free-text duration label such as `"4 Weeks"` for display.
//! The label is parsed once, when the product is written, into a structured
//! [`LicenceDuration`]; confirmation only ever reads the structured value.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref DURATION_REGEX: regex::Regex =
        regex::Regex::new(r"(?i)(\d+)\s*(day|week|month)").unwrap();
}

/// Days granted per unit. Months are approximated as 30 days.
const DAYS_PER_WEEK: u32 = 7;
const DAYS_PER_MONTH: u32 = 30;

/// Upper bound on a parsed licence, roughly one hundred years.
pub const MAX_LICENCE_DAYS: u32 = 36_500;

/// Structured licence length in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenceDuration {
    days: u32,
}

impl LicenceDuration {
    /// Builds a duration, rejecting zero and anything past [`MAX_LICENCE_DAYS`].
    pub fn from_days(days: u32) -> Option<Self> {
        if days == 0 || days > MAX_LICENCE_DAYS {
            None
        } else {
            Some(Self { days })
        }
    }

    /// Builds a duration from a stored column value.
    pub fn from_db(days: Option<i32>) -> Option<Self> {
        days.and_then(|d| u32::try_from(d).ok())
            .and_then(Self::from_days)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Parses a display label like `"12 Weeks"` or `"Access for 3 months"`.
    ///
    /// The first `<int> <unit>` match wins. Returns `None` for labels without a
    /// recognisable duration.
    pub fn parse_label(label: &str) -> Option<Self> {
        let caps = DURATION_REGEX.captures(label)?;
        let value: u32 = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps.get(2)?.as_str().to_lowercase();

        let multiplier = match unit.as_str() {
            "day" => 1,
            "week" => DAYS_PER_WEEK,
            "month" => DAYS_PER_MONTH,
            _ => return None,
        };

        value.checked_mul(multiplier).and_then(Self::from_days)
    }

    /// Computes the entitlement window that starts on `start`.
    pub fn window_from(&self, start: NaiveDate) -> EntitlementWindow {
        EntitlementWindow {
            start_date: start,
            end_date: start + Duration::days(i64::from(self.days)),
        }
    }
}

/// Start and end dates of a purchased licence (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl EntitlementWindow {
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Whether `today` still falls inside the window.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        today >= self.start_date && today <= self.end_date
    }
}

/// Resolves the stored duration for a product write.
///
/// An explicit day count wins over the label; otherwise the label is parsed.
pub fn resolve_duration(label: Option<&str>, explicit_days: Option<u32>) -> Option<LicenceDuration> {
    match explicit_days {
        Some(days) => LicenceDuration::from_days(days),
        None => label.and_then(LicenceDuration::parse_label),
    }
}
