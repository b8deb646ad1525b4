//! HTTP cover source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::CoversConfig;

use super::{CoverError, CoverSource};

/// Fetches cover images over HTTP with a short per-request timeout.
pub struct HttpCoverSource {
    client: Client,
}

impl HttpCoverSource {
    pub fn new(config: &CoversConfig) -> Result<Self, CoverError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CoverSource for HttpCoverSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoverError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
