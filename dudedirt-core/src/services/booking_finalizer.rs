// File: dudedirt-core/src/services/booking_finalizer.rs
//
// Turns a fully validated wizard into persisted records: one booking row
// (status `pending`, price snapshotted from the catalog) plus one +25
// `booking_confirmed` ledger entry, atomically. On a lost slot race the
// wizard stays at the confirmation step so the user can pick a new time.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use dudedirt_common::models::{BOOKING_CONFIRMED_SEEDS, Booking, BookingStatus};
use dudedirt_common::traits::repository_traits::{BookingRepository, CatalogRepository};

use super::booking_wizard::{WizardHandle, WizardState, WizardStatus, WizardStep, WizardStore};
use crate::Error;

pub struct BookingFinalizer {
    wizards: Arc<WizardStore>,
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingFinalizer {
    pub fn new(
        wizards: Arc<WizardStore>,
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            wizards,
            catalog,
            bookings,
        }
    }

    /// Commit the wizard behind `handle`. Only callable once all four steps
    /// have validated; a second call after success fails with
    /// `AlreadyCommitted`.
    pub async fn commit(&self, handle: WizardHandle) -> Result<Booking, Error> {
        let state = self.wizards.get_state(handle)?;
        match state.status {
            WizardStatus::InProgress(WizardStep::Confirmation) => {}
            WizardStatus::InProgress(step) => {
                return Err(Error::validation(
                    "step",
                    format!("booking is still at step {}", step.number()),
                ));
            }
            WizardStatus::Committed => return Err(Error::AlreadyCommitted),
            WizardStatus::Abandoned => return Err(Error::WizardExpired),
        }

        let booking = self.finalize(&state).await?;
        self.wizards.mark_committed(handle);
        Ok(booking)
    }

    async fn finalize(&self, state: &WizardState) -> Result<Booking, Error> {
        let service_id = state
            .service_id
            .ok_or_else(|| Error::validation("service_id", "no service selected"))?;
        let scheduled_at = state
            .scheduled_at
            .ok_or_else(|| Error::validation("scheduled_at", "no date/time selected"))?;

        let service = self
            .catalog
            .get_service(service_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("service {}", service_id)))?;

        // Price snapshot: service plus add-ons, frozen at commit time.
        let mut total_price_cents = service.price_cents;
        for product_id in &state.product_ids {
            let product = self
                .catalog
                .get_product(*product_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("product {}", product_id)))?;
            total_price_cents += product.price_cents;
        }

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            user_id: state.user_id,
            service_id,
            scheduled_at,
            status: BookingStatus::Pending,
            special_instructions: state.special_instructions.clone(),
            total_price_cents,
            created_at: Utc::now(),
        };

        match self
            .bookings
            .create_with_award(&booking, BOOKING_CONFIRMED_SEEDS)
            .await
        {
            Ok(entry) => {
                info!(
                    "finalized booking {} for user {} (+{} seeds, tx {})",
                    booking.booking_id, booking.user_id, entry.amount, entry.transaction_id
                );
                Ok(booking)
            }
            Err(Error::SlotConflict) => {
                warn!(
                    "slot conflict for service {} at {}; wizard {} stays open",
                    service_id, scheduled_at, state.handle
                );
                Err(Error::SlotConflict)
            }
            Err(e) => Err(e),
        }
    }
}
