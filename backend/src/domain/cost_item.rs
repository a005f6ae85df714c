//! Shared trip expenses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::validation::{DraftValidationError, monetary_amount, required_text};
use super::{CostItemId, TripId, UserId};

/// A single expense split evenly across the trip's current participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub id: CostItemId,
    pub label: String,
    pub total_amount: Decimal,
    pub trip_id: TripId,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Validated cost item input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostItemDraft {
    pub trip_id: TripId,
    pub label: String,
    pub total_amount: Decimal,
}

impl CostItemDraft {
    /// Validate raw cost item input.
    pub fn try_new(
        trip_id: TripId,
        label: &str,
        total_amount: Decimal,
    ) -> Result<Self, DraftValidationError> {
        Ok(Self {
            trip_id,
            label: required_text("label", label)?,
            total_amount: monetary_amount("totalAmount", total_amount)?,
        })
    }

    /// Materialise a new cost item recorded by `creator_id`.
    pub fn into_cost_item(self, creator_id: UserId, now: DateTime<Utc>) -> CostItem {
        CostItem {
            id: CostItemId::random(),
            label: self.label,
            total_amount: self.total_amount,
            trip_id: self.trip_id,
            creator_id,
            created_at: now,
        }
    }

    /// Overwrite label and amount. Items never move between trips.
    pub fn apply_to(self, item: &mut CostItem) {
        item.label = self.label;
        item.total_amount = self.total_amount;
    }
}
