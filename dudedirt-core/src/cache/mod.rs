// File: src/cache/mod.rs

pub mod weather_cache;

pub use weather_cache::{WEATHER_CACHE_HOURS, WeatherCache};
