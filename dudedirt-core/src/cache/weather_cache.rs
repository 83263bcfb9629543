// File: dudedirt-core/src/cache/weather_cache.rs
//
// Display-only weather lookup. The snapshot is memoized for the cache
// interval and a static fallback stands in on any fetch failure, so the
// booking and ledger paths never wait on this API.

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use dudedirt_common::models::WeatherSnapshot;

use crate::Error;
use crate::http::HttpClient;

pub const WEATHER_CACHE_HOURS: i64 = 2;

const WEATHER_API_URL: &str = "http://api.weatherstack.com/current";

pub struct WeatherCache {
    client: Box<dyn HttpClient>,
    api_key: Option<String>,
    location: String,
    ttl: Duration,
    cached: Mutex<Option<WeatherSnapshot>>,
}

impl WeatherCache {
    pub fn new(client: Box<dyn HttpClient>, api_key: Option<String>, location: String) -> Self {
        Self {
            client,
            api_key,
            location,
            ttl: Duration::hours(WEATHER_CACHE_HOURS),
            cached: Mutex::new(None),
        }
    }

    /// Current conditions for the configured location. Never fails: a fetch
    /// problem yields the static fallback snapshot, and whatever is returned
    /// is cached so the API is hit at most once per interval.
    pub async fn current_conditions(&self) -> WeatherSnapshot {
        let mut cached = self.cached.lock().await;
        if let Some(snapshot) = cached.as_ref() {
            if Utc::now() - snapshot.fetched_at < self.ttl {
                return snapshot.clone();
            }
        }

        let snapshot = match self.fetch().await {
            Ok(snapshot) => {
                info!("fetched weather for {}", self.location);
                snapshot
            }
            Err(e) => {
                warn!("weather fetch failed ({}); using fallback data", e);
                fallback_snapshot(&self.location)
            }
        };
        *cached = Some(snapshot.clone());
        snapshot
    }

    async fn fetch(&self) -> Result<WeatherSnapshot, Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Auth("WEATHER_API_KEY is not configured".to_string()))?;

        let url = format!(
            "{}?access_key={}&query={}&units=f",
            WEATHER_API_URL,
            api_key,
            self.location.replace(' ', "%20")
        );
        let body = self.client.get(url).await?;
        let payload: serde_json::Value = serde_json::from_str(&body)?;

        if payload.get("error").is_some() {
            return Err(Error::Parse(format!(
                "weather API error: {}",
                payload["error"]["info"].as_str().unwrap_or("unknown")
            )));
        }

        let current = payload
            .get("current")
            .ok_or_else(|| Error::Parse("weather payload missing 'current'".to_string()))?;
        let temperature_f = current["temperature"]
            .as_i64()
            .ok_or_else(|| Error::Parse("weather payload missing temperature".to_string()))?;
        let condition = current["weather_descriptions"][0]
            .as_str()
            .unwrap_or("Unknown")
            .to_string();
        let humidity = current["humidity"].as_i64().unwrap_or(0);
        let wind_mph = current["wind_speed"].as_i64().unwrap_or(0);

        Ok(WeatherSnapshot {
            location: self.location.clone(),
            recommendation: recommendation_for(temperature_f, &condition),
            temperature_f,
            condition,
            humidity,
            wind_mph,
            fetched_at: Utc::now(),
            fallback: false,
        })
    }
}

fn fallback_snapshot(location: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location: location.to_string(),
        temperature_f: 72,
        condition: "Partly Cloudy".to_string(),
        humidity: 65,
        wind_mph: 8,
        recommendation: recommendation_for(72, "Partly Cloudy"),
        fetched_at: Utc::now(),
        fallback: true,
    }
}

fn recommendation_for(temperature_f: i64, condition: &str) -> String {
    let lowered = condition.to_lowercase();
    if lowered.contains("rain") || lowered.contains("storm") {
        "Hold off on mowing until the lawn dries out.".to_string()
    } else if temperature_f >= 90 {
        "Too hot for treatments; water early in the morning instead.".to_string()
    } else if temperature_f <= 45 {
        "Grass growth has slowed; a light cleanup is all you need.".to_string()
    } else {
        "Great conditions for mowing and lawn treatments.".to_string()
    }
}
