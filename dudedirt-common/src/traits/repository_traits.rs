// ================================================================
// File: dudedirt-common/src/traits/repository_traits.rs
// ================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;
use crate::models::{
    Booking, BookingStatus, PointTransaction, Product, RedemptionOption, Service, User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), Error>;
    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error>;
    async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<(), Error>;
}

/// Read-only reference data: services, lawn-care products, and the
/// redemption menu.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Active services only.
    async fn list_services(&self) -> Result<Vec<Service>, Error>;
    async fn get_service(&self, service_id: i64) -> Result<Option<Service>, Error>;
    async fn list_products(&self) -> Result<Vec<Product>, Error>;
    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, Error>;
    async fn list_redemption_options(&self) -> Result<Vec<RedemptionOption>, Error>;
    async fn get_redemption_option(&self, option_id: i64)
    -> Result<Option<RedemptionOption>, Error>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// The finalizer's atomic unit: re-check the slot is still free, insert
    /// the booking, and append the earning transaction — all in one storage
    /// transaction. Returns the appended transaction. Fails with
    /// [`Error::SlotConflict`] when the slot was claimed in the meantime;
    /// in that case nothing is written.
    async fn create_with_award(
        &self,
        booking: &Booking,
        award: i64,
    ) -> Result<PointTransaction, Error>;

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, Error>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, Error>;
    /// Completed bookings, newest scheduled first (the receipts page).
    async fn list_completed_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, Error>;
    async fn update_status(&self, booking_id: Uuid, status: BookingStatus) -> Result<(), Error>;
    /// True when a non-cancelled booking already occupies the slot.
    async fn slot_taken(
        &self,
        service_id: i64,
        scheduled_at: DateTime<Utc>,
    ) -> Result<bool, Error>;
}

/// Append-only ledger access. There is no update or delete here on purpose.
#[async_trait]
pub trait PointTransactionRepository: Send + Sync {
    /// Unconditional append (welcome bonus and similar credits).
    async fn append(&self, entry: &PointTransaction) -> Result<(), Error>;

    /// Re-checks the latest balance and appends a negative `redemption`
    /// entry, both inside one storage transaction. Fails with
    /// [`Error::InsufficientPoints`] without writing anything.
    async fn append_debit(&self, user_id: Uuid, cost: i64) -> Result<PointTransaction, Error>;

    /// Appends a `service_completed` entry for the booking unless one already
    /// exists; idempotent per booking via [`Error::AlreadyAwarded`].
    async fn award_completion_once(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        amount: i64,
    ) -> Result<PointTransaction, Error>;

    /// SUM of all entry amounts for the user. Always derived from the log.
    async fn balance(&self, user_id: Uuid) -> Result<i64, Error>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PointTransaction>, Error>;
}
