// File: dudedirt-core/src/services/rewards.rs
//
// The seeds ledger. Balances are always derived from the append-only
// transaction log; there is no stored running total to drift.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use dudedirt_common::models::{
    PointReason, PointTransaction, RedemptionOption, SERVICE_COMPLETED_SEEDS, WELCOME_BONUS_SEEDS,
};
use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, PointTransactionRepository,
};

use crate::Error;

pub struct RewardsLedger {
    points: Arc<dyn PointTransactionRepository>,
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl RewardsLedger {
    pub fn new(
        points: Arc<dyn PointTransactionRepository>,
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            points,
            catalog,
            bookings,
        }
    }

    pub async fn balance(&self, user_id: Uuid) -> Result<i64, Error> {
        self.points.balance(user_id).await
    }

    /// Full statement, newest first (the points page).
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<PointTransaction>, Error> {
        self.points.list_for_user(user_id).await
    }

    /// Every redemption whose cost fits within the current balance.
    pub async fn eligible_redemptions(&self, user_id: Uuid) -> Result<Vec<RedemptionOption>, Error> {
        let balance = self.points.balance(user_id).await?;
        let options = self.catalog.list_redemption_options().await?;
        Ok(options.into_iter().filter(|o| o.cost <= balance).collect())
    }

    /// Spend seeds on a redemption option. The balance is re-checked against
    /// the latest ledger state inside the repository transaction, so two
    /// concurrent redemptions cannot both succeed against one balance.
    pub async fn redeem(&self, user_id: Uuid, option_id: i64) -> Result<PointTransaction, Error> {
        let option = self
            .catalog
            .get_redemption_option(option_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("redemption option {}", option_id)))?;

        let entry = self.points.append_debit(user_id, option.cost).await?;
        info!(
            "user {} redeemed '{}' for {} seeds",
            user_id, option.name, option.cost
        );
        Ok(entry)
    }

    /// +100 seeds when a booking reaches `completed`. Idempotent per booking:
    /// a retry fails with `AlreadyAwarded` and the balance reflects only one
    /// award.
    pub async fn award_completion(&self, booking_id: Uuid) -> Result<PointTransaction, Error> {
        let booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("booking {}", booking_id)))?;

        let entry = self
            .points
            .award_completion_once(booking_id, booking.user_id, SERVICE_COMPLETED_SEEDS)
            .await?;
        info!(
            "awarded {} completion seeds to user {} for booking {}",
            entry.amount, booking.user_id, booking_id
        );
        Ok(entry)
    }

    /// +500 seeds, appended exactly once by the registration flow.
    pub async fn append_welcome_bonus(&self, user_id: Uuid) -> Result<PointTransaction, Error> {
        let entry =
            PointTransaction::new(user_id, WELCOME_BONUS_SEEDS, PointReason::WelcomeBonus, None);
        self.points.append(&entry).await?;
        Ok(entry)
    }
}
