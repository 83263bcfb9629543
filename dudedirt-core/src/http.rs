//! HTTP client abstraction for the outbound weather lookup.
//!
//! The trait exists so tests can substitute a mock and exercise the weather
//! cache without real network requests; the default implementation wraps
//! reqwest.

use async_trait::async_trait;
use mockall::automock;

use crate::Error;

#[automock]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: String) -> Result<String, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String) -> Result<String, Error> {
        let response = self.client.get(&url).send().await?.text().await?;
        Ok(response)
    }
}
