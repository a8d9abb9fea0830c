// Stay length and date-range validity
// All dates are calendar days; "today" is always supplied by the caller.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// A date selection that may still be in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    // Drops the time-of-day component of both endpoints
    pub fn from_datetimes(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self::new(from.date(), to.date())
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    // Both endpoints, if present
    pub fn endpoints(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }
}

// Validation state of a booking quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteStatus {
    Incomplete,
    TooShort,
    Overlapping,
    Valid,
}

impl QuoteStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, QuoteStatus::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightsOutcome {
    pub nights: u32,
    pub status: QuoteStatus,
}

impl NightsOutcome {
    fn incomplete() -> Self {
        Self {
            nights: 0,
            status: QuoteStatus::Incomplete,
        }
    }
}

// A range is `Incomplete` when an endpoint is missing, when it is empty or
// inverted, or when it starts before `today`. An unavailable night anywhere
// in `[from, to)` makes the range `Overlapping` whatever its length.
pub fn calculate_nights(
    range: &DateRange,
    min_nights: u32,
    unavailable_dates: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> NightsOutcome {
    let Some((from, to)) = range.endpoints() else {
        return NightsOutcome::incomplete();
    };

    if to <= from || from < today {
        return NightsOutcome::incomplete();
    }

    let nights = u32::try_from((to - from).num_days()).unwrap_or(u32::MAX);

    let status = if touches_unavailable(from, to, unavailable_dates) {
        QuoteStatus::Overlapping
    } else if nights < min_nights {
        QuoteStatus::TooShort
    } else {
        QuoteStatus::Valid
    };

    NightsOutcome { nights, status }
}

// The checkout day itself is not a night of the stay
fn touches_unavailable(from: NaiveDate, to: NaiveDate, unavailable: &BTreeSet<NaiveDate>) -> bool {
    unavailable.range(from..to).next().is_some()
}
