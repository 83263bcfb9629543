// "Seeds" are the loyalty-point unit. The point_transactions table is
// append-only; corrections are offsetting entries, never updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const WELCOME_BONUS_SEEDS: i64 = 500;
pub const BOOKING_CONFIRMED_SEEDS: i64 = 25;
pub const SERVICE_COMPLETED_SEEDS: i64 = 100;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PointReason {
    WelcomeBonus,
    BookingConfirmed,
    ServiceCompleted,
    Redemption,
}

impl std::fmt::Display for PointReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointReason::WelcomeBonus => write!(f, "welcome_bonus"),
            PointReason::BookingConfirmed => write!(f, "booking_confirmed"),
            PointReason::ServiceCompleted => write!(f, "service_completed"),
            PointReason::Redemption => write!(f, "redemption"),
        }
    }
}

impl std::str::FromStr for PointReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcome_bonus" => Ok(PointReason::WelcomeBonus),
            "booking_confirmed" => Ok(PointReason::BookingConfirmed),
            "service_completed" => Ok(PointReason::ServiceCompleted),
            "redemption" => Ok(PointReason::Redemption),
            _ => Err(format!("Unknown point reason: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PointTransaction {
    pub transaction_id: Uuid,
    pub user_id: Uuid,
    /// Signed; redemptions are negative.
    pub amount: i64,
    pub reason: PointReason,
    /// The triggering booking, when one exists.
    pub booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PointTransaction {
    pub fn new(user_id: Uuid, amount: i64, reason: PointReason, booking_id: Option<Uuid>) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            user_id,
            amount,
            reason,
            booking_id,
            created_at: Utc::now(),
        }
    }
}
