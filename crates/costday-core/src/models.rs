//! Data models for costday
//!
//! Defines the single record type, `Asset`, and the day-count helpers that
//! derive "days owned" and "average daily cost" from it.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchased item being tracked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique identifier, assigned once at creation
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Calendar date of the purchase
    pub purchase_date: NaiveDate,
    /// Amount paid
    pub purchase_price: f64,
}

impl Asset {
    /// Create a new asset with a freshly generated ID
    pub fn new(name: impl Into<String>, purchase_date: NaiveDate, purchase_price: f64) -> Self {
        Self::with_id(Uuid::new_v4(), name, purchase_date, purchase_price)
    }

    /// Create an asset with a specific ID
    ///
    /// Used when building a full replacement for an existing record.
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        purchase_date: NaiveDate,
        purchase_price: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            purchase_date,
            purchase_price,
        }
    }

    /// Whole days owned as of `reference`, never less than 1
    pub fn days_since_purchase(&self, reference: NaiveDate) -> i64 {
        days_between(self.purchase_date, reference)
    }

    /// Purchase price spread over the days owned
    pub fn average_daily_price(&self, reference: NaiveDate) -> f64 {
        self.purchase_price / self.days_since_purchase(reference) as f64
    }

    /// Price rendered with exactly two decimals, as shown and searched
    pub fn formatted_price(&self) -> String {
        format!("{:.2}", self.purchase_price)
    }
}

/// Calendar days from `from` to `to`, clamped to a minimum of 1
///
/// Same-day and future-dated purchases both count as one day so that
/// per-day figures never divide by zero.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(1)
}

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
