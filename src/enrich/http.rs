//! HTTP classification sources
//!
//! One reqwest client shared by the three endpoints; each takes the name as
//! a `?name=` query parameter and returns a small JSON document. The status
//! is checked before the body is decoded so "service down" and "service
//! answered garbage" stay distinguishable.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{AgeReading, ClassifySources, GenderReading, NationalityReading, SourceError};
use crate::config::Config;

const USER_AGENT: &str = concat!("people-svc/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Classification sources backed by three remote HTTP endpoints.
pub struct HttpSources {
    client: reqwest::Client,
    gender_url: String,
    age_url: String,
    nationality_url: String,
}

impl HttpSources {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            gender_url: config.gender_url.clone(),
            age_url: config.age_url.clone(),
            nationality_url: config.nationality_url.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        base_url: &str,
        name: &str,
    ) -> Result<T, SourceError> {
        debug!(url = %base_url, name = %name, "querying classification source");

        let response = self
            .client
            .get(base_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        debug!(url = %base_url, body = %body, "classification source response");

        serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClassifySources for HttpSources {
    async fn gender(&self, name: &str) -> Result<GenderReading, SourceError> {
        self.fetch(&self.gender_url, name).await
    }

    async fn age(&self, name: &str) -> Result<AgeReading, SourceError> {
        self.fetch(&self.age_url, name).await
    }

    async fn nationality(&self, name: &str) -> Result<NationalityReading, SourceError> {
        self.fetch(&self.nationality_url, name).await
    }
}
