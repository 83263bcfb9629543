// tests/rewards_tests.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use dudedirt_common::models::{Booking, BookingStatus, PointReason};
use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, PointTransactionRepository,
};
use dudedirt_core::Error;
use dudedirt_core::db::Database;
use dudedirt_core::repositories::sqlite::{
    SqliteBookingRepository, SqliteCatalogRepository, SqlitePointTransactionRepository,
};
use dudedirt_core::services::RewardsLedger;
use dudedirt_core::test_utils::helpers::{create_test_user, future_slot, setup_test_database};

fn ledger(db: &Database) -> RewardsLedger {
    let points: Arc<dyn PointTransactionRepository> =
        Arc::new(SqlitePointTransactionRepository::new(db.pool().clone()));
    let catalog: Arc<dyn CatalogRepository> =
        Arc::new(SqliteCatalogRepository::new(db.pool().clone()));
    let bookings: Arc<dyn BookingRepository> =
        Arc::new(SqliteBookingRepository::new(db.pool().clone()));
    RewardsLedger::new(points, catalog, bookings)
}

async fn insert_booking(db: &Database, user_id: Uuid) -> Result<Booking, Error> {
    let booking = Booking {
        booking_id: Uuid::new_v4(),
        user_id,
        service_id: 1,
        scheduled_at: future_slot(2),
        status: BookingStatus::Pending,
        special_instructions: None,
        total_price_cents: 5000,
        created_at: Utc::now(),
    };
    SqliteBookingRepository::new(db.pool().clone())
        .create_with_award(&booking, 25)
        .await?;
    Ok(booking)
}

#[tokio::test]
async fn balance_follows_the_full_lifecycle() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let rewards = ledger(&db);
    let user = create_test_user(&db, "ivy").await?;

    rewards.append_welcome_bonus(user.user_id).await?;
    assert_eq!(rewards.balance(user.user_id).await?, 500);

    let booking = insert_booking(&db, user.user_id).await?;
    assert_eq!(rewards.balance(user.user_id).await?, 525);

    rewards.award_completion(booking.booking_id).await?;
    assert_eq!(rewards.balance(user.user_id).await?, 625);

    // Option 1 costs 100 seeds.
    let debit = rewards.redeem(user.user_id, 1).await?;
    assert_eq!(debit.amount, -100);
    assert_eq!(debit.reason, PointReason::Redemption);
    assert_eq!(rewards.balance(user.user_id).await?, 525);

    let history = rewards.history(user.user_id).await?;
    assert_eq!(history.len(), 4);
    assert_eq!(history.iter().map(|t| t.amount).sum::<i64>(), 525);

    Ok(())
}

#[tokio::test]
async fn redeeming_beyond_the_balance_writes_nothing() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let rewards = ledger(&db);
    let user = create_test_user(&db, "jack").await?;

    let result = rewards.redeem(user.user_id, 1).await;
    assert!(matches!(
        result,
        Err(Error::InsufficientPoints {
            needed: 100,
            available: 0
        })
    ));
    assert_eq!(rewards.balance(user.user_id).await?, 0);
    assert!(rewards.history(user.user_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn redeeming_an_unknown_option_is_not_found() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let rewards = ledger(&db);
    let user = create_test_user(&db, "kate").await?;
    rewards.append_welcome_bonus(user.user_id).await?;

    let result = rewards.redeem(user.user_id, 999).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(rewards.balance(user.user_id).await?, 500);

    Ok(())
}

#[tokio::test]
async fn completion_seeds_are_awarded_once_per_booking() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let rewards = ledger(&db);
    let user = create_test_user(&db, "liam").await?;
    let booking = insert_booking(&db, user.user_id).await?;

    let entry = rewards.award_completion(booking.booking_id).await?;
    assert_eq!(entry.amount, 100);
    assert_eq!(entry.booking_id, Some(booking.booking_id));

    let retry = rewards.award_completion(booking.booking_id).await;
    assert!(matches!(retry, Err(Error::AlreadyAwarded)));

    // 25 from the confirmation plus a single 100 award.
    assert_eq!(rewards.balance(user.user_id).await?, 125);

    Ok(())
}

#[tokio::test]
async fn eligible_redemptions_fit_the_current_balance() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let rewards = ledger(&db);
    let user = create_test_user(&db, "mona").await?;

    assert!(rewards.eligible_redemptions(user.user_id).await?.is_empty());

    rewards.append_welcome_bonus(user.user_id).await?;
    let eligible = rewards.eligible_redemptions(user.user_id).await?;
    // 500 seeds cover the 100, 250, and 500 options but not the 1000 one.
    assert_eq!(eligible.len(), 3);
    assert!(eligible.iter().all(|o| o.cost <= 500));

    Ok(())
}
