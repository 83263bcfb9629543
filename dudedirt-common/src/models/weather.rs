use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions as shown on the dashboard. Display-only; the booking
/// and ledger core never consumes this.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature_f: i64,
    pub condition: String,
    pub humidity: i64,
    pub wind_mph: i64,
    /// Short lawn-care tip derived from the conditions.
    pub recommendation: String,
    pub fetched_at: DateTime<Utc>,
    /// True when this is the static fallback rather than live API data.
    pub fallback: bool,
}
