// File: dudedirt-core/src/test_utils/helpers.rs

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use dudedirt_common::models::User;
use dudedirt_common::traits::repository_traits::UserRepository;

use crate::Error;
use crate::crypto;
use crate::db::{Database, seed};
use crate::repositories::sqlite::SqliteUserRepository;

/// Fresh in-memory database with migrations applied and the catalog
/// reference data seeded. A single connection keeps every query on the same
/// in-memory instance.
pub async fn setup_test_database() -> Result<Database, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    seed::seed_reference_data(db.pool()).await?;
    Ok(db)
}

/// Insert a user directly (no welcome bonus) and return it.
pub async fn create_test_user(db: &Database, username: &str) -> Result<User, Error> {
    let user = User {
        user_id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: crypto::hash_password("demo123"),
        full_name: format!("Test {}", username),
        phone: None,
        address: None,
        created_at: Utc::now(),
    };
    SqliteUserRepository::new(db.pool().clone())
        .create(&user)
        .await?;
    Ok(user)
}

/// A valid bookable slot: a few days out, mid-morning.
pub fn future_slot(days_ahead: i64) -> chrono::DateTime<Utc> {
    (Utc::now() + Duration::days(days_ahead))
        .date_naive()
        .and_hms_opt(10, 0, 0)
        .expect("valid time")
        .and_utc()
}
