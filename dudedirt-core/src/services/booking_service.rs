// File: dudedirt-core/src/services/booking_service.rs
//
// Booking status transitions and the read side for the dashboard, receipts,
// and stats pages. Each points-earning transition calls into the rewards
// ledger; the ledger itself stays idempotent per booking.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use dudedirt_common::models::{Booking, BookingStatus};
use dudedirt_common::traits::repository_traits::BookingRepository;

use super::rewards::RewardsLedger;
use crate::Error;

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    rewards: Arc<RewardsLedger>,
}

#[derive(Debug, Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    pub completed_bookings: usize,
    /// Across confirmed and completed bookings.
    pub total_spent_cents: i64,
    pub next_booking: Option<Booking>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, rewards: Arc<RewardsLedger>) -> Self {
        Self { bookings, rewards }
    }

    pub async fn confirm(&self, booking_id: Uuid) -> Result<Booking, Error> {
        self.transition(booking_id, BookingStatus::Confirmed).await
    }

    /// Marks the service as done and awards the completion seeds.
    pub async fn complete(&self, booking_id: Uuid) -> Result<Booking, Error> {
        let booking = self.transition(booking_id, BookingStatus::Completed).await?;
        self.rewards.award_completion(booking_id).await?;
        Ok(booking)
    }

    pub async fn cancel(&self, booking_id: Uuid) -> Result<Booking, Error> {
        self.transition(booking_id, BookingStatus::Cancelled).await
    }

    async fn transition(&self, booking_id: Uuid, next: BookingStatus) -> Result<Booking, Error> {
        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("booking {}", booking_id)))?;

        if !booking.status.can_transition_to(next) {
            return Err(Error::validation(
                "status",
                format!("cannot move a {} booking to {}", booking.status, next),
            ));
        }

        self.bookings.update_status(booking_id, next).await?;
        info!("booking {} moved {} -> {}", booking_id, booking.status, next);
        booking.status = next;
        Ok(booking)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, Error> {
        self.bookings.list_for_user(user_id).await
    }

    /// Completed bookings only, newest first.
    pub async fn receipts(&self, user_id: Uuid) -> Result<Vec<Booking>, Error> {
        self.bookings.list_completed_for_user(user_id).await
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<BookingStats, Error> {
        let bookings = self.bookings.list_for_user(user_id).await?;
        let now = Utc::now();

        let count_with = |status: BookingStatus| {
            bookings.iter().filter(|b| b.status == status).count()
        };
        let total_spent_cents = bookings
            .iter()
            .filter(|b| {
                matches!(b.status, BookingStatus::Confirmed | BookingStatus::Completed)
            })
            .map(|b| b.total_price_cents)
            .sum();
        let next_booking = bookings
            .iter()
            .filter(|b| {
                b.scheduled_at > now
                    && matches!(b.status, BookingStatus::Pending | BookingStatus::Confirmed)
            })
            .min_by_key(|b| b.scheduled_at)
            .cloned();

        Ok(BookingStats {
            total_bookings: bookings.len(),
            pending_bookings: count_with(BookingStatus::Pending),
            confirmed_bookings: count_with(BookingStatus::Confirmed),
            completed_bookings: count_with(BookingStatus::Completed),
            total_spent_cents,
            next_booking,
        })
    }
}
