//! GBIF REST client (reqwest)

use super::rate_limit::{RateLimiter, RetryPolicy};
use super::types::{NameMatch, OccurrencePage, OccurrenceQuery};
use super::SpeciesLookup;
use crate::config::GbifConfig;
use crate::error::{Result, SpeciesMapError};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct GbifClient {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl GbifClient {
    pub fn new(config: &GbifConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SpeciesMapError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(Duration::from_millis(config.request_delay_ms)),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: Duration::from_millis(config.backoff_base_ms),
            },
        })
    }

    /// GET with pacing; transport errors, 429 and 5xx are retried
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            self.limiter.acquire().await;
            debug!(%url, ?params, attempt, "GBIF request");

            let error = match self.client.get(&url).query(params).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| {
                            SpeciesMapError::ApiParse(format!("{}: {}", url, e))
                        });
                    }

                    let error = SpeciesMapError::Http(format!("HTTP {} from {}", status, url));
                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    if !retryable {
                        return Err(error);
                    }
                    error
                }
                Err(e) => SpeciesMapError::Http(format!("request to {} failed: {}", url, e)),
            };

            if !self.retry.should_retry(attempt) {
                return Err(error);
            }
            let wait = self.retry.backoff(attempt);
            warn!(%error, retry_in_ms = wait.as_millis() as u64, "retrying GBIF request");
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

impl SpeciesLookup for GbifClient {
    async fn match_name(&self, name: &str) -> Result<NameMatch> {
        self.get_json("species/match", &[("name", name.to_string())])
            .await
    }

    async fn search_occurrences(&self, query: &OccurrenceQuery) -> Result<OccurrencePage> {
        self.get_json("occurrence/search", &query.to_params()).await
    }
}
