// dudedirt-server/src/server.rs

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use dashmap::DashMap;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use dudedirt_common::traits::repository_traits::CatalogRepository;
use dudedirt_core::auth::AuthManager;
use dudedirt_core::cache::WeatherCache;
use dudedirt_core::services::{BookingFinalizer, BookingService, RewardsLedger, WizardStore};

use crate::routes;

/// Everything the handlers need, shared behind Arcs. Sessions are plain
/// bearer tokens in memory; cookie/session persistence is deliberately out
/// of scope.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub wizards: Arc<WizardStore>,
    pub finalizer: Arc<BookingFinalizer>,
    pub rewards: Arc<RewardsLedger>,
    pub bookings: Arc<BookingService>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub weather: Arc<WeatherCache>,
    pub sessions: Arc<DashMap<String, Uuid>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/register", post(routes::register))
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout))
        .route("/api/profile", post(routes::update_profile))
        .route("/api/services", get(routes::list_services))
        .route("/api/products", get(routes::list_products))
        .route("/api/redemptions", get(routes::list_redemptions))
        .route("/api/booking/start", post(routes::start_wizard))
        .route("/api/booking/{handle}", get(routes::wizard_state))
        .route("/api/booking/{handle}/step", post(routes::set_step))
        .route("/api/booking/{handle}/back", post(routes::step_back))
        .route("/api/booking/{handle}/commit", post(routes::commit_wizard))
        .route("/api/bookings", get(routes::list_bookings))
        .route("/api/bookings/{id}/confirm", post(routes::confirm_booking))
        .route("/api/bookings/{id}/complete", post(routes::complete_booking))
        .route("/api/bookings/{id}/cancel", post(routes::cancel_booking))
        .route("/api/receipts", get(routes::receipts))
        .route("/api/stats", get(routes::stats))
        .route("/api/points", get(routes::points))
        .route("/api/points/redeem", post(routes::redeem))
        .route("/api/weather", get(routes::weather))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
