// dudedirt-server/src/main.rs

mod config;
mod routes;
mod server;

use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use tracing::{info, warn};

use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, PointTransactionRepository, UserRepository,
};
use dudedirt_core::auth::{AuthManager, Registration};
use dudedirt_core::cache::WeatherCache;
use dudedirt_core::db::{Database, seed};
use dudedirt_core::http::DefaultHttpClient;
use dudedirt_core::repositories::sqlite::{
    SqliteBookingRepository, SqliteCatalogRepository, SqlitePointTransactionRepository,
    SqliteUserRepository,
};
use dudedirt_core::services::{BookingFinalizer, BookingService, RewardsLedger, WizardStore};
use dudedirt_core::tasks::spawn_wizard_sweeper;

use crate::config::ServerConfig;
use crate::server::AppState;

const DEMO_EMAIL: &str = "demo@dudeandirt.com";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("starting dudedirt-server on {}", config.bind_addr);

    let db = Database::new(&config.database_path).await?;
    db.migrate().await?;
    seed::seed_reference_data(db.pool()).await?;

    let users: Arc<dyn UserRepository> =
        Arc::new(SqliteUserRepository::new(db.pool().clone()));
    let catalog: Arc<dyn CatalogRepository> =
        Arc::new(SqliteCatalogRepository::new(db.pool().clone()));
    let bookings_repo: Arc<dyn BookingRepository> =
        Arc::new(SqliteBookingRepository::new(db.pool().clone()));
    let points: Arc<dyn PointTransactionRepository> =
        Arc::new(SqlitePointTransactionRepository::new(db.pool().clone()));

    let rewards = Arc::new(RewardsLedger::new(
        points.clone(),
        catalog.clone(),
        bookings_repo.clone(),
    ));
    let auth = Arc::new(AuthManager::new(users.clone(), rewards.clone()));
    let wizards = Arc::new(WizardStore::new(
        catalog.clone(),
        config.wizard_timeout_minutes,
    ));
    let finalizer = Arc::new(BookingFinalizer::new(
        wizards.clone(),
        catalog.clone(),
        bookings_repo.clone(),
    ));
    let bookings = Arc::new(BookingService::new(bookings_repo.clone(), rewards.clone()));
    let weather = Arc::new(WeatherCache::new(
        Box::new(DefaultHttpClient::new()),
        config.weather_api_key.clone(),
        config.weather_location.clone(),
    ));

    seed_demo_account(&auth, &users).await?;

    spawn_wizard_sweeper(wizards.clone(), std::time::Duration::from_secs(60));

    let state = AppState {
        auth,
        wizards,
        finalizer,
        rewards,
        bookings,
        catalog,
        weather,
        sessions: Arc::new(DashMap::new()),
    };

    let addr: std::net::SocketAddr = config.bind_addr.parse()?;
    axum_server::bind(addr)
        .serve(server::router(state).into_make_service())
        .await?;
    Ok(())
}

/// Ensure the demo account exists so a fresh database is browsable
/// immediately. Registration brings the welcome bonus with it.
async fn seed_demo_account(
    auth: &AuthManager,
    users: &Arc<dyn UserRepository>,
) -> Result<()> {
    if users.get_by_email(DEMO_EMAIL).await?.is_some() {
        return Ok(());
    }
    match auth
        .register(Registration {
            username: "demo".to_string(),
            email: DEMO_EMAIL.to_string(),
            password: "demo123".to_string(),
            full_name: "Demo User".to_string(),
            phone: Some("(555) 123-4567".to_string()),
            address: Some("123 Garden Lane, Miami, FL".to_string()),
        })
        .await
    {
        Ok(user) => info!("seeded demo account {}", user.user_id),
        Err(e) => warn!("could not seed demo account: {}", e),
    }
    Ok(())
}
