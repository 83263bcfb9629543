// Reference data: seeded at initialization, read-only afterwards.
// Prices are integer cents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_hours: i64,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub size: String,
    pub category: String,
}

/// Maps a redemption to its seed cost and effect (discount, free product,
/// status upgrade).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RedemptionOption {
    pub option_id: i64,
    pub name: String,
    pub cost: i64,
    pub effect: String,
}
