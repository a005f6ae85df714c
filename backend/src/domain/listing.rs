//! Listing filters and offset pagination.
//!
//! The persistence adapter translates filters into SQL predicates; the
//! `matches` methods here define the reference semantics used by the
//! in-memory store and by tests.

use chrono::{DateTime, Utc};

use super::{Error, Event, EventId, Trip};

/// Default number of rows returned by listing queries.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Offset page. Offset is a raw row skip, not a stable cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Build a page, clamping `limit` to `1..=MAX_LIMIT`.
    ///
    /// # Examples
    /// ```
    /// use eventgo::domain::Page;
    ///
    /// let page = Page::new(Some(500), None).unwrap();
    /// assert_eq!(page.limit(), 100);
    /// assert!(Page::new(None, Some(-1)).is_err());
    /// ```
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, Error> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(Error::invalid_request("offset must not be negative")
                .with_details(serde_json::json!({ "field": "offset" })));
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Ok(Self { limit, offset })
    }

    /// Rows to return.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Apply the page to an already ordered iterator.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(0))
            .collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn within(date: DateTime<Utc>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Event listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsFilter {
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of title, description or venue.
    pub search: Option<String>,
}

impl EventsFilter {
    /// Drop blank text criteria so they do not filter anything.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            city: non_blank(self.city),
            search: non_blank(self.search),
            ..self
        }
    }

    /// Reference predicate for the filter.
    pub fn matches(&self, event: &Event) -> bool {
        let city = self
            .city
            .as_deref()
            .is_none_or(|city| contains_ci(&event.city, city));
        let search = self.search.as_deref().is_none_or(|term| {
            contains_ci(&event.title, term)
                || event
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, term))
                || contains_ci(&event.venue, term)
        });
        city && search && within(event.date, self.date_from, self.date_to)
    }
}

/// Trip listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripsFilter {
    pub event_id: Option<EventId>,
    /// Case-insensitive substring of the origin or destination city.
    pub city: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl TripsFilter {
    /// Drop blank text criteria so they do not filter anything.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            city: non_blank(self.city),
            search: non_blank(self.search),
            ..self
        }
    }

    /// Reference predicate for the filter.
    pub fn matches(&self, trip: &Trip) -> bool {
        let event = self.event_id.is_none_or(|id| trip.event_id == id);
        let city = self.city.as_deref().is_none_or(|city| {
            contains_ci(&trip.origin_city, city) || contains_ci(&trip.destination_city, city)
        });
        let search = self
            .search
            .as_deref()
            .is_none_or(|term| contains_ci(&trip.title, term));
        event && city && search && within(trip.date, self.date_from, self.date_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventDraft, JoinCode, TripDraft, UserId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, day, 18, 0, 0)
            .single()
            .expect("valid date")
    }

    #[fixture]
    fn event() -> Event {
        EventDraft::try_new(
            "Summer Rock",
            Some("Three stages of guitars"),
            "Lisbon",
            "Alameda Park",
            at(10),
            None,
        )
        .expect("valid")
        .into_event(at(1))
    }

    #[fixture]
    fn trip() -> Trip {
        TripDraft::try_new("Coach from Porto", EventId::random(), "Porto", "Lisbon", at(10))
            .expect("valid")
            .into_trip(UserId::random(), JoinCode::generate(), at(1))
    }

    #[rstest]
    #[case(Some(1), Some(0), 1, 0)]
    #[case(None, None, DEFAULT_LIMIT, 0)]
    #[case(Some(0), None, 1, 0)]
    #[case(Some(1000), Some(40), MAX_LIMIT, 40)]
    fn page_clamps_limit(
        #[case] limit: Option<i64>,
        #[case] offset: Option<i64>,
        #[case] expected_limit: i64,
        #[case] expected_offset: i64,
    ) {
        let page = Page::new(limit, offset).expect("valid page");
        assert_eq!((page.limit(), page.offset()), (expected_limit, expected_offset));
    }

    #[rstest]
    fn negative_offset_is_rejected() {
        let err = Page::new(None, Some(-5)).expect_err("negative offset");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn page_slices_rows() {
        let page = Page::new(Some(2), Some(1)).expect("valid page");
        assert_eq!(page.slice(1..=5), vec![2, 3]);
    }

    #[rstest]
    #[case(EventsFilter::default(), true)]
    #[case(EventsFilter { city: Some("lis".into()), ..Default::default() }, true)]
    #[case(EventsFilter { city: Some("porto".into()), ..Default::default() }, false)]
    #[case(EventsFilter { search: Some("GUITAR".into()), ..Default::default() }, true)]
    #[case(EventsFilter { search: Some("alameda".into()), ..Default::default() }, true)]
    #[case(EventsFilter { search: Some("jazz".into()), ..Default::default() }, false)]
    #[case(EventsFilter { date_from: Some(at(10)), date_to: Some(at(10)), ..Default::default() }, true)]
    #[case(EventsFilter { date_from: Some(at(11)), ..Default::default() }, false)]
    #[case(EventsFilter { date_to: Some(at(9)), ..Default::default() }, false)]
    fn event_filter(event: Event, #[case] filter: EventsFilter, #[case] expected: bool) {
        assert_eq!(filter.normalised().matches(&event), expected);
    }

    #[rstest]
    #[case(TripsFilter { city: Some("PORTO".into()), ..Default::default() }, true)]
    #[case(TripsFilter { city: Some("lisbon".into()), ..Default::default() }, true)]
    #[case(TripsFilter { city: Some("faro".into()), ..Default::default() }, false)]
    #[case(TripsFilter { search: Some("coach".into()), ..Default::default() }, true)]
    #[case(TripsFilter { search: Some("  ".into()), ..Default::default() }, true)]
    #[case(TripsFilter { event_id: Some(EventId::random()), ..Default::default() }, false)]
    fn trip_filter(trip: Trip, #[case] filter: TripsFilter, #[case] expected: bool) {
        assert_eq!(filter.normalised().matches(&trip), expected);
    }
}
