//! Read-time cost derivations.
//!
//! Nothing here is stored: shares follow the current head count, so they
//! change as participants join or leave.

use rust_decimal::Decimal;

use super::CostItem;

/// Split `total` evenly across `participant_count` people.
///
/// An empty trip yields the undivided total rather than an error. Full
/// [`Decimal`] precision is kept; no rounding is applied.
///
/// # Examples
/// ```
/// use eventgo::domain::per_person_share;
/// use rust_decimal::Decimal;
///
/// assert_eq!(per_person_share(Decimal::from(100), 2), Decimal::from(50));
/// assert_eq!(per_person_share(Decimal::from(100), 0), Decimal::from(100));
/// ```
pub fn per_person_share(total: Decimal, participant_count: i64) -> Decimal {
    if participant_count <= 0 {
        return total;
    }
    total / Decimal::from(participant_count)
}

/// Sum of all item totals; zero for an empty slice and `None` when the sum
/// does not fit in a [`Decimal`].
pub fn trip_total(items: &[CostItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.total_amount))
}
