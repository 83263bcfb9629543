// dudedirt-server/src/config.rs

use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub weather_api_key: Option<String>,
    pub weather_location: String,
    pub wizard_timeout_minutes: i64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_path: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "data/dudedirt.db".to_string()),
            weather_api_key: env::var("WEATHER_API_KEY").ok(),
            weather_location: env::var("WEATHER_LOCATION")
                .unwrap_or_else(|_| "Miami, FL".to_string()),
            wizard_timeout_minutes: env::var("WIZARD_TIMEOUT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
