// Search query string: parsed from the results-page URL, rendered back for
// the router on a new search

use crate::nights::DateRange;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid date for '{field}': {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid guest count: {0}")]
    InvalidGuests(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub destination: String,
    pub date_range: Option<DateRange>,
    pub guests: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            destination: String::new(),
            date_range: None,
            guests: 1,
        }
    }
}

impl SearchQuery {
    // Parses `destination`, `from`, `to` and `guests`. A leading `?` is
    // allowed and unknown keys are ignored. Dates take `YYYY-MM-DD` or a
    // full RFC 3339 timestamp; the date range is kept only when both
    // dates are present.
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = SearchQuery::default();
        let mut from = None;
        let mut to = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "destination" => parsed.destination = value.into_owned(),
                "from" => from = Some(parse_date("from", &value)?),
                "to" => to = Some(parse_date("to", &value)?),
                "guests" => parsed.guests = parse_guests(&value)?,
                _ => (),
            }
        }

        if let (Some(from), Some(to)) = (from, to) {
            parsed.date_range = Some(DateRange::new(from, to));
        }

        Ok(parsed)
    }

    // Empty destination and partial ranges are left out; guests is always written
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !self.destination.is_empty() {
            serializer.append_pair("destination", &self.destination);
        }
        if let Some((from, to)) = self.date_range.and_then(|range| range.endpoints()) {
            serializer.append_pair("from", &from.format("%Y-%m-%d").to_string());
            serializer.append_pair("to", &to.format("%Y-%m-%d").to_string());
        }
        serializer.append_pair("guests", &self.guests.to_string());

        serializer.finish()
    }

    // Path the host router should navigate to
    pub fn results_path(&self) -> String {
        format!("/search-results?{}", self.to_query_string())
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| QueryError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_guests(value: &str) -> Result<u32, QueryError> {
    if value.is_empty() {
        return Ok(1);
    }
    value
        .parse::<u32>()
        .map(|guests| guests.max(1))
        .map_err(|_| QueryError::InvalidGuests(value.to_string()))
}
