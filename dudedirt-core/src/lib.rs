// src/lib.rs

pub mod auth;
pub mod cache;
pub mod crypto;
pub mod db;
pub mod http;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use db::Database;
pub use dudedirt_common::error::Error;
pub use dudedirt_common::models;
pub use http::{DefaultHttpClient, HttpClient};
