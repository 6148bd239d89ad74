//! Rate-limited, retrying GET helper.
//!
//! The single outbound path for every provider: rate limit, dispatch,
//! retry transient failures with exponential backoff, parse JSON. The
//! backoff policy and error taxonomy live here once instead of in each
//! endpoint.

use std::time::Duration;

use common::config::FetchConfig;
use common::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::rate_limit::RateLimiter;

const USER_AGENT: &str = "blueflag-weather/0.1 (beach weather updater)";

#[derive(Debug, Clone)]
pub struct RetryingHttp {
    client: reqwest::Client,
    limiter: RateLimiter,
    max_retries: u32,
    backoff_base: Duration,
}

impl RetryingHttp {
    pub fn new(cfg: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            limiter: RateLimiter::per_minute(cfg.calls_per_minute),
            max_retries: cfg.max_retries,
            backoff_base: Duration::from_millis(cfg.backoff_base_ms),
        }
    }

    /// GET `url` and parse the body as JSON, retrying transient
    /// failures up to the configured limit.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, Error> {
        let mut attempt: u32 = 0;
        loop {
            self.limiter.wait().await;

            match self.dispatch(url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff_base * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(
                        "GET {} failed (attempt {}/{}): {} — retrying in {:?}",
                        url, attempt, self.max_retries, e, delay
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn dispatch(&self, url: &str) -> Result<serde_json::Value, Error> {
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}
