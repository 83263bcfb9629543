// tests/auth_tests.rs

use std::sync::Arc;

use dudedirt_common::models::PointReason;
use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, PointTransactionRepository, UserRepository,
};
use dudedirt_core::Error;
use dudedirt_core::auth::{AuthManager, Registration};
use dudedirt_core::db::Database;
use dudedirt_core::repositories::sqlite::{
    SqliteBookingRepository, SqliteCatalogRepository, SqlitePointTransactionRepository,
    SqliteUserRepository,
};
use dudedirt_core::services::RewardsLedger;
use dudedirt_core::test_utils::helpers::setup_test_database;

fn auth_manager(db: &Database) -> (AuthManager, Arc<RewardsLedger>) {
    let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db.pool().clone()));
    let points: Arc<dyn PointTransactionRepository> =
        Arc::new(SqlitePointTransactionRepository::new(db.pool().clone()));
    let catalog: Arc<dyn CatalogRepository> =
        Arc::new(SqliteCatalogRepository::new(db.pool().clone()));
    let bookings: Arc<dyn BookingRepository> =
        Arc::new(SqliteBookingRepository::new(db.pool().clone()));
    let rewards = Arc::new(RewardsLedger::new(points, catalog, bookings));
    (AuthManager::new(users, rewards.clone()), rewards)
}

fn registration(username: &str, email: &str) -> Registration {
    Registration {
        username: username.to_string(),
        email: email.to_string(),
        password: "hunter2!".to_string(),
        full_name: "Uma Verde".to_string(),
        phone: None,
        address: None,
    }
}

#[tokio::test]
async fn registering_grants_the_welcome_bonus_once() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let (auth, rewards) = auth_manager(&db);

    let user = auth.register(registration("uma", "uma@example.com")).await?;

    assert_eq!(rewards.balance(user.user_id).await?, 500);
    let history = rewards.history(user.user_id).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason, PointReason::WelcomeBonus);
    assert_eq!(history[0].amount, 500);

    Ok(())
}

#[tokio::test]
async fn duplicate_email_and_username_are_rejected() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let (auth, _) = auth_manager(&db);

    auth.register(registration("vic", "vic@example.com")).await?;

    let same_email = auth.register(registration("other", "vic@example.com")).await;
    assert!(matches!(
        same_email,
        Err(Error::Validation { ref field, .. }) if field == "email"
    ));

    let same_username = auth.register(registration("vic", "new@example.com")).await;
    assert!(matches!(
        same_username,
        Err(Error::Validation { ref field, .. }) if field == "username"
    ));

    Ok(())
}

#[tokio::test]
async fn registration_validates_required_fields() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let (auth, _) = auth_manager(&db);

    let mut missing_name = registration("walt", "walt@example.com");
    missing_name.full_name = "  ".to_string();
    let result = auth.register(missing_name).await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "full_name"
    ));

    let bad_email = registration("walt", "not-an-email");
    let result = auth.register(bad_email).await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "email"
    ));

    Ok(())
}

#[tokio::test]
async fn login_checks_the_password() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let (auth, _) = auth_manager(&db);

    let registered = auth.register(registration("xena", "xena@example.com")).await?;

    let user = auth.login("xena@example.com", "hunter2!").await?;
    assert_eq!(user.user_id, registered.user_id);

    let wrong_password = auth.login("xena@example.com", "wrong").await;
    assert!(matches!(wrong_password, Err(Error::Auth(_))));

    let unknown_email = auth.login("ghost@example.com", "hunter2!").await;
    assert!(matches!(unknown_email, Err(Error::Auth(_))));

    Ok(())
}

#[tokio::test]
async fn profile_updates_are_visible_on_the_next_read() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let (auth, _) = auth_manager(&db);

    let user = auth.register(registration("yuri", "yuri@example.com")).await?;

    let updated = auth
        .update_profile(
            user.user_id,
            "Yuri Lawnsworth",
            Some("(555) 777-8888"),
            None,
        )
        .await?;
    assert_eq!(updated.full_name, "Yuri Lawnsworth");
    assert_eq!(updated.phone.as_deref(), Some("(555) 777-8888"));

    let blank = auth.update_profile(user.user_id, "", None, None).await;
    assert!(matches!(
        blank,
        Err(Error::Validation { ref field, .. }) if field == "full_name"
    ));

    Ok(())
}
