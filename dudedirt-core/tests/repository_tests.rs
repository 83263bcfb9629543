// tests/repository_tests.rs

use chrono::Utc;
use uuid::Uuid;

use dudedirt_common::models::{Booking, BookingStatus};
use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, UserRepository,
};
use dudedirt_core::Error;
use dudedirt_core::repositories::sqlite::{
    SqliteBookingRepository, SqliteCatalogRepository, SqliteUserRepository,
};
use dudedirt_core::test_utils::helpers::{create_test_user, future_slot, setup_test_database};

#[tokio::test]
async fn user_roundtrip_and_profile_update() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = SqliteUserRepository::new(db.pool().clone());

    let user = create_test_user(&db, "alice").await?;

    let by_id = repo.get(user.user_id).await?.expect("user by id");
    assert_eq!(by_id.username, "alice");
    assert_eq!(by_id.email, "alice@example.com");
    assert!(by_id.phone.is_none());

    let by_email = repo.get_by_email("alice@example.com").await?;
    assert!(by_email.is_some());
    assert!(repo.get_by_email("nobody@example.com").await?.is_none());
    assert!(repo.get_by_username("alice").await?.is_some());

    repo.update_profile(
        user.user_id,
        "Alice Green",
        Some("(555) 000-1111"),
        Some("42 Meadow Way"),
    )
    .await?;
    let updated = repo.get(user.user_id).await?.expect("updated user");
    assert_eq!(updated.full_name, "Alice Green");
    assert_eq!(updated.phone.as_deref(), Some("(555) 000-1111"));
    assert_eq!(updated.address.as_deref(), Some("42 Meadow Way"));

    Ok(())
}

#[tokio::test]
async fn catalog_is_seeded() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = SqliteCatalogRepository::new(db.pool().clone());

    let services = repo.list_services().await?;
    assert_eq!(services.len(), 6);
    let mowing = repo.get_service(1).await?.expect("lawn mowing");
    assert_eq!(mowing.name, "Lawn Mowing");
    assert_eq!(mowing.price_cents, 5000);
    assert!(mowing.active);

    let products = repo.list_products().await?;
    assert_eq!(products.len(), 6);
    assert!(repo.get_product(999).await?.is_none());

    let options = repo.list_redemption_options().await?;
    assert_eq!(options.len(), 4);
    let discount = repo.get_redemption_option(1).await?.expect("discount");
    assert_eq!(discount.cost, 100);

    Ok(())
}

#[tokio::test]
async fn slot_is_free_again_after_cancellation() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = SqliteBookingRepository::new(db.pool().clone());
    let user = create_test_user(&db, "bob").await?;
    let slot = future_slot(2);

    assert!(!repo.slot_taken(1, slot).await?);

    let booking = Booking {
        booking_id: Uuid::new_v4(),
        user_id: user.user_id,
        service_id: 1,
        scheduled_at: slot,
        status: BookingStatus::Pending,
        special_instructions: None,
        total_price_cents: 5000,
        created_at: Utc::now(),
    };
    repo.create_with_award(&booking, 25).await?;

    assert!(repo.slot_taken(1, slot).await?);
    // A different service at the same time is a different slot.
    assert!(!repo.slot_taken(2, slot).await?);

    repo.update_status(booking.booking_id, BookingStatus::Cancelled)
        .await?;
    assert!(!repo.slot_taken(1, slot).await?);

    Ok(())
}

#[tokio::test]
async fn update_status_on_unknown_booking_is_not_found() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let repo = SqliteBookingRepository::new(db.pool().clone());

    let result = repo
        .update_status(Uuid::new_v4(), BookingStatus::Confirmed)
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    Ok(())
}
