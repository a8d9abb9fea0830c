// Booking widget state machine
// Turns date picks, guest changes and host updates into a fresh configuration
// and quote. Nothing here mutates a published snapshot.

use crate::guests::{adjust_guests, clamp_guests};
use crate::nights::{calculate_nights, DateRange, QuoteStatus};
use crate::pricing::{price_stay, FeeLine, FeeSchedule};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Price per night must not be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("Maximum guests must be at least 1, got {0}")]
    InvalidMaxGuests(u32),

    #[error("Minimum nights must be at least 1, got {0}")]
    InvalidMinNights(u32),

    #[error("Initial guests must be at least 1, got {0}")]
    InvalidInitialGuests(u32),

    #[error("Price slider minimum {min} is above its maximum {max}")]
    InvalidPriceDomain { min: u32, max: u32 },

    #[error("Price slider step must be at least 1")]
    InvalidPriceStep,
}

// What the host hands to the booking widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingWidgetConfig {
    pub price_per_night: Decimal,
    pub min_nights: u32,
    pub max_guests: u32,
    pub unavailable_dates: Vec<NaiveDate>,
    pub initial_date_range: Option<DateRange>,
    pub initial_guests: u32,
}

impl Default for BookingWidgetConfig {
    fn default() -> Self {
        Self {
            price_per_night: Decimal::ZERO,
            min_nights: 1,
            max_guests: 4,
            unavailable_dates: Vec::new(),
            initial_date_range: None,
            initial_guests: 1,
        }
    }
}

impl BookingWidgetConfig {
    // Caller-side check; the machine itself clamps rather than fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_per_night.is_sign_negative() && !self.price_per_night.is_zero() {
            return Err(ConfigError::NegativePrice(self.price_per_night));
        }
        if self.max_guests < 1 {
            return Err(ConfigError::InvalidMaxGuests(self.max_guests));
        }
        if self.min_nights < 1 {
            return Err(ConfigError::InvalidMinNights(self.min_nights));
        }
        if self.initial_guests < 1 {
            return Err(ConfigError::InvalidInitialGuests(self.initial_guests));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfiguration {
    pub date_range: DateRange,
    pub guests: u32,
    pub price_per_night: Decimal,
    pub min_nights: u32,
    pub max_guests: u32,
    pub unavailable_dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    // Billable nights; zero unless the quote is valid
    pub nights: u32,
    // Length of the selected span, kept for messages
    pub selected_nights: u32,
    pub subtotal: Decimal,
    pub fees: Vec<FeeLine>,
    pub total: Decimal,
    pub status: QuoteStatus,
}

impl BookingQuote {
    // Inline message shown under the widget, if any
    pub fn validation_message(&self, min_nights: u32) -> Option<String> {
        match self.status {
            QuoteStatus::Valid | QuoteStatus::Incomplete => None,
            QuoteStatus::TooShort => Some(format!("Minimum stay is {} nights.", min_nights)),
            QuoteStatus::Overlapping => {
                Some("Selected dates include unavailable nights.".to_string())
            }
        }
    }
}

// The pair published after every event
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSnapshot {
    pub configuration: Arc<BookingConfiguration>,
    pub quote: BookingQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    SelectDates(DateRange),
    ChangeGuests(i64),
    UpdatePricePerNight(Decimal),
    UpdateMinNights(u32),
    UpdateMaxGuests(u32),
    SetUnavailableDates(BTreeSet<NaiveDate>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub snapshot: BookingSnapshot,
    // Both endpoints were just picked; the date picker must close
    pub collapse_date_picker: bool,
}

// Emitted to the host on a successful reserve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: Decimal,
    pub total_nights: u32,
}

impl ReservationRequest {
    // The reserved stay as the widget's date range
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.check_in, self.check_out)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reservation rejected ({status:?}): {message}")]
pub struct ReservationRejected {
    pub status: QuoteStatus,
    pub message: String,
}

// A stay is never shorter than one night, whatever the host sends
const MIN_NIGHTS: u32 = 1;

const INCOMPLETE_RESERVE_MESSAGE: &str =
    "Please select valid dates and meet the minimum night stay.";

// Holds only the fee schedule; every configuration lives in the snapshots it
// returns, and `today` is passed on each call
#[derive(Debug, Clone, Default)]
pub struct BookingStateMachine {
    fee_schedule: FeeSchedule,
}

impl BookingStateMachine {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self { fee_schedule }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    // Builds the first snapshot from the widget boundary values
    pub fn start(&self, config: &BookingWidgetConfig, today: NaiveDate) -> BookingSnapshot {
        let min_nights = config.min_nights.max(MIN_NIGHTS);
        let date_range = config.initial_date_range.unwrap_or_else(|| DateRange {
            from: Some(today),
            to: today.checked_add_days(Days::new(u64::from(min_nights))),
        });

        let configuration = BookingConfiguration {
            date_range,
            guests: clamp_guests(config.initial_guests, config.max_guests),
            price_per_night: config.price_per_night,
            min_nights,
            max_guests: config.max_guests,
            unavailable_dates: config.unavailable_dates.iter().copied().collect(),
        };

        let quote = self.quote(&configuration, today);
        debug!(status = ?quote.status, total = %quote.total, "booking widget started");

        BookingSnapshot {
            configuration: Arc::new(configuration),
            quote,
        }
    }

    // Pure: same configuration and day, same quote
    pub fn quote(&self, configuration: &BookingConfiguration, today: NaiveDate) -> BookingQuote {
        let outcome = calculate_nights(
            &configuration.date_range,
            configuration.min_nights,
            &configuration.unavailable_dates,
            today,
        );

        let billable = if outcome.status.is_valid() {
            outcome.nights
        } else {
            0
        };
        let breakdown = price_stay(billable, configuration.price_per_night, &self.fee_schedule);

        BookingQuote {
            nights: billable,
            selected_nights: outcome.nights,
            subtotal: breakdown.subtotal,
            fees: breakdown.fees,
            total: breakdown.total,
            status: outcome.status,
        }
    }

    pub fn apply(
        &self,
        snapshot: &BookingSnapshot,
        event: BookingEvent,
        today: NaiveDate,
    ) -> Transition {
        debug!(?event, "booking event");

        let mut next = (*snapshot.configuration).clone();
        let mut collapse_date_picker = false;

        match event {
            BookingEvent::SelectDates(range) => {
                collapse_date_picker = range.is_complete();
                next.date_range = range;
            }
            BookingEvent::ChangeGuests(delta) => {
                next.guests = adjust_guests(next.guests, delta, next.max_guests);
            }
            BookingEvent::UpdatePricePerNight(price) => {
                next.price_per_night = price;
            }
            BookingEvent::UpdateMinNights(min_nights) => {
                next.min_nights = min_nights.max(MIN_NIGHTS);
            }
            BookingEvent::UpdateMaxGuests(max_guests) => {
                next.max_guests = max_guests;
                next.guests = clamp_guests(next.guests, max_guests);
            }
            BookingEvent::SetUnavailableDates(dates) => {
                next.unavailable_dates = dates;
            }
        }

        let quote = self.quote(&next, today);
        if quote.status != snapshot.quote.status {
            info!(
                from = ?snapshot.quote.status,
                to = ?quote.status,
                nights = quote.selected_nights,
                "booking quote status changed"
            );
        }

        Transition {
            snapshot: BookingSnapshot {
                configuration: Arc::new(next),
                quote,
            },
            collapse_date_picker,
        }
    }

    // Only a valid quote yields a request; otherwise the current validation
    // message is handed back and nothing is emitted
    pub fn reserve(&self, snapshot: &BookingSnapshot) -> Result<ReservationRequest, ReservationRejected> {
        let configuration = &snapshot.configuration;
        let quote = &snapshot.quote;

        let endpoints = configuration.date_range.endpoints();
        let (check_in, check_out) = match endpoints {
            Some(dates) if quote.status.is_valid() => dates,
            _ => {
                let message = quote
                    .validation_message(configuration.min_nights)
                    .unwrap_or_else(|| INCOMPLETE_RESERVE_MESSAGE.to_string());
                warn!(status = ?quote.status, %message, "reserve rejected");
                return Err(ReservationRejected {
                    status: quote.status,
                    message,
                });
            }
        };

        let request = ReservationRequest {
            check_in,
            check_out,
            guests: configuration.guests,
            total_price: quote.total,
            total_nights: quote.nights,
        };
        info!(
            %check_in,
            %check_out,
            guests = request.guests,
            total = %request.total_price,
            "reservation requested"
        );
        Ok(request)
    }
}
