// dudedirt-server/src/routes.rs
//
// JSON handlers over the core services. Domain errors map to 4xx responses
// with user-facing messages; storage and other internal failures are logged
// in full and surface as a generic 500.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::NaiveDateTime;
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use dudedirt_common::Error;
use dudedirt_common::traits::repository_traits::CatalogRepository;
use dudedirt_core::auth::Registration;
use dudedirt_core::services::{StepData, WizardState, WizardStatus};

use crate::server::AppState;

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{}: {}", field, message),
            ),
            Error::SlotConflict => (
                StatusCode::CONFLICT,
                "That time slot was just taken; please pick another.".to_string(),
            ),
            Error::InsufficientPoints { needed, available } => (
                StatusCode::CONFLICT,
                format!("Not enough seeds: need {}, have {}.", needed, available),
            ),
            Error::AlreadyAwarded => (
                StatusCode::CONFLICT,
                "Completion seeds were already awarded for this booking.".to_string(),
            ),
            Error::AlreadyCommitted => (
                StatusCode::CONFLICT,
                "This booking was already confirmed.".to_string(),
            ),
            Error::WizardExpired => (
                StatusCode::GONE,
                "Your booking session expired; please start again.".to_string(),
            ),
            Error::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            Error::Auth(_) => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            other => {
                // Full detail stays server-side.
                error!("internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                )
            }
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

fn require_user(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError(Error::Auth("missing bearer token".to_string())))?;
    state
        .sessions
        .get(token)
        .map(|entry| *entry.value())
        .ok_or_else(|| ApiError(Error::Auth("unknown or expired session".to_string())))
}

fn new_session_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

fn wizard_json(state: &WizardState) -> Value {
    let status = match state.status {
        WizardStatus::InProgress(step) => json!({ "in_progress": true, "step": step.number() }),
        WizardStatus::Committed => json!({ "in_progress": false, "committed": true }),
        WizardStatus::Abandoned => json!({ "in_progress": false, "abandoned": true }),
    };
    json!({
        "handle": state.handle,
        "status": status,
        "service_id": state.service_id,
        "product_ids": state.product_ids,
        "scheduled_at": state.scheduled_at,
        "special_instructions": state.special_instructions,
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---- accounts ----------------------------------------------------------

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .auth
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
            address: req.address,
        })
        .await?;

    let token = new_session_token();
    state.sessions.insert(token.clone(), user.user_id);
    Ok(Json(json!({ "success": true, "token": token, "user": user })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.login(&req.email, &req.password).await?;
    let token = new_session_token();
    state.sessions.insert(token.clone(), user.user_id);
    Ok(Json(json!({ "success": true, "token": token, "user": user })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    if let Some(token) = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.sessions.remove(token);
    }
    // Logout abandons any in-progress booking.
    state.wizards.abandon_for_user(user_id);
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let user = state
        .auth
        .update_profile(
            user_id,
            &req.full_name,
            req.phone.as_deref(),
            req.address.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

// ---- catalog -----------------------------------------------------------

pub async fn list_services(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let services = state.catalog.list_services().await?;
    Ok(Json(json!(services)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(json!(products)))
}

pub async fn list_redemptions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let options = state.catalog.list_redemption_options().await?;
    Ok(Json(json!(options)))
}

// ---- booking wizard ----------------------------------------------------

#[derive(Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepRequest {
    Service {
        service_id: i64,
    },
    AddOns {
        #[serde(default)]
        product_ids: Vec<i64>,
    },
    Schedule {
        scheduled_date: String,
        scheduled_time: String,
        special_instructions: Option<String>,
    },
}

impl StepRequest {
    fn into_step_data(self) -> Result<StepData, Error> {
        Ok(match self {
            StepRequest::Service { service_id } => StepData::ServiceSelection { service_id },
            StepRequest::AddOns { product_ids } => StepData::AddOns { product_ids },
            StepRequest::Schedule {
                scheduled_date,
                scheduled_time,
                special_instructions,
            } => {
                let parsed = NaiveDateTime::parse_from_str(
                    &format!("{} {}", scheduled_date, scheduled_time),
                    "%Y-%m-%d %H:%M",
                )
                .map_err(|_| {
                    Error::validation(
                        "scheduled_date",
                        "expected date YYYY-MM-DD and time HH:MM",
                    )
                })?;
                StepData::Schedule {
                    scheduled_at: parsed.and_utc(),
                    special_instructions,
                }
            }
        })
    }
}

pub async fn start_wizard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let handle = state.wizards.start(user_id);
    Ok(Json(json!({ "success": true, "handle": handle })))
}

pub async fn wizard_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(handle): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let wizard = state.wizards.get_state(handle)?;
    Ok(Json(wizard_json(&wizard)))
}

pub async fn set_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(handle): Path<Uuid>,
    Json(req): Json<StepRequest>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let data = req.into_step_data()?;
    let wizard = state.wizards.set_step_data(handle, data).await?;
    Ok(Json(wizard_json(&wizard)))
}

pub async fn step_back(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(handle): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let wizard = state.wizards.back(handle)?;
    Ok(Json(wizard_json(&wizard)))
}

pub async fn commit_wizard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(handle): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let booking = state.finalizer.commit(handle).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Booking confirmed successfully!",
        "booking": booking,
    })))
}

// ---- bookings ----------------------------------------------------------

pub async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let bookings = state.bookings.list_for_user(user_id).await?;
    Ok(Json(json!(bookings)))
}

pub async fn confirm_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let booking = state.bookings.confirm(id).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

pub async fn complete_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let booking = state.bookings.complete(id).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let booking = state.bookings.cancel(id).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

pub async fn receipts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let receipts = state.bookings.receipts(user_id).await?;
    Ok(Json(json!(receipts)))
}

pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let stats = state.bookings.stats(user_id).await?;
    Ok(Json(json!(stats)))
}

// ---- seeds -------------------------------------------------------------

pub async fn points(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let balance = state.rewards.balance(user_id).await?;
    let history = state.rewards.history(user_id).await?;
    let eligible = state.rewards.eligible_redemptions(user_id).await?;
    Ok(Json(json!({
        "balance": balance,
        "history": history,
        "eligible_redemptions": eligible,
    })))
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub option_id: i64,
}

pub async fn redeem(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let entry = state.rewards.redeem(user_id, req.option_id).await?;
    let balance = state.rewards.balance(user_id).await?;
    Ok(Json(json!({ "success": true, "transaction": entry, "balance": balance })))
}

// ---- weather -----------------------------------------------------------

pub async fn weather(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers)?;
    let snapshot = state.weather.current_conditions().await;
    Ok(Json(json!({ "success": true, "data": snapshot })))
}
