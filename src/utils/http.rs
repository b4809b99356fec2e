use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::Config;

pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(2)
        .build()?;

    Ok(client)
}

/// How often and how patiently a fetch is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: config.retry_base_delay(),
        }
    }
}

impl RetryPolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// GET a URL, retrying network errors and server errors with exponential
/// backoff. Client errors (4xx) fail right away since retrying won't help.
pub async fn fetch_with_retry(client: &Client, url: &str, policy: RetryPolicy) -> Result<Response> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < policy.max_attempts {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                warn!("HTTP error {}: {}", status, url);
                last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
                if status.is_client_error() {
                    break;
                }
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < policy.max_attempts {
            let delay = policy.delay_after(attempts);
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, policy.max_attempts);
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, attempts.max(1)))
}
