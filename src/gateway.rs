// Reservation submission seam
// The booking core hands a finished ReservationRequest to a gateway; retries,
// transport and payment belong to the gateway implementation.

use crate::booking::ReservationRequest;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid reservation: {0}")]
    InvalidReservation(String),

    #[error("Idempotency key reused with a different reservation: {0}")]
    IdempotencyConflict(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationReceipt {
    pub booking_id: String,
    pub confirmation_code: String,
    pub request: ReservationRequest,
}

#[async_trait]
pub trait ReservationGateway: Send + Sync + 'static {
    // Submitting the same key twice must not book twice
    async fn submit(
        &self,
        request: ReservationRequest,
        idempotency_key: &str,
    ) -> Result<ReservationReceipt, GatewayError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GatewayStats {
    pub submitted: usize,
    pub confirmed: usize,
    pub replayed: usize,
    pub rejected: usize,
}

// Gateway that confirms everything in memory. Used by hosts without a
// backend and by tests.
#[derive(Debug, Default)]
pub struct InMemoryReservationGateway {
    receipts: DashMap<String, ReservationReceipt>,
    submitted: AtomicUsize,
    replayed: AtomicUsize,
    rejected: AtomicUsize,
}

impl InMemoryReservationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipt(&self, idempotency_key: &str) -> Option<ReservationReceipt> {
        self.receipts.get(idempotency_key).map(|entry| entry.value().clone())
    }

    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            submitted: self.submitted.load(Ordering::SeqCst),
            confirmed: self.receipts.len(),
            replayed: self.replayed.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
        }
    }

    fn check(request: &ReservationRequest) -> Result<(), GatewayError> {
        if request.check_out <= request.check_in || request.total_nights == 0 {
            return Err(GatewayError::InvalidReservation(
                "stay must cover at least one night".to_string(),
            ));
        }
        if request.guests == 0 {
            return Err(GatewayError::InvalidReservation(
                "at least one guest is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationGateway for InMemoryReservationGateway {
    async fn submit(
        &self,
        request: ReservationRequest,
        idempotency_key: &str,
    ) -> Result<ReservationReceipt, GatewayError> {
        self.submitted.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = Self::check(&request) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(e);
        }

        let receipt = match self.receipts.entry(idempotency_key.to_string()) {
            Entry::Occupied(existing) => {
                let receipt = existing.get().clone();
                drop(existing);
                if receipt.request != request {
                    self.rejected.fetch_add(1, Ordering::SeqCst);
                    return Err(GatewayError::IdempotencyConflict(idempotency_key.to_string()));
                }
                self.replayed.fetch_add(1, Ordering::SeqCst);
                return Ok(receipt);
            }
            Entry::Vacant(slot) => slot
                .insert(ReservationReceipt {
                    booking_id: format!("booking-{}", rand::random::<u32>()),
                    confirmation_code: format!("CONF{:05}", rand::random::<u16>()),
                    request,
                })
                .value()
                .clone(),
        };

        info!(
            booking_id = %receipt.booking_id,
            confirmation = %receipt.confirmation_code,
            "reservation confirmed"
        );
        Ok(receipt)
    }
}
