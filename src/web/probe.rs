use crate::utils::error::{Result, SafeCityError};
use crate::utils::validation::validate_url;
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls `url` until it answers with a 2xx status. Connection errors and other statuses are retried
/// every `interval` until `attempts` requests have been made.
pub async fn wait_until_ready(url: &str, attempts: u32, interval: Duration) -> Result<u32> {
    validate_url("probe.url", url)?;
    if attempts == 0 {
        return Err(SafeCityError::InvalidConfigValueError {
            field: "probe.attempts".to_string(),
            value: "0".to_string(),
            reason: "at least one attempt is required".to_string(),
        });
    }

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    for attempt in 1..=attempts {
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("✅ {} ready after {} attempt(s)", url, attempt);
                return Ok(attempt);
            }
            Ok(response) => {
                tracing::debug!(attempt, status = response.status().as_u16(), "Not ready yet");
            }
            Err(e) => {
                tracing::debug!(attempt, "Not reachable yet: {}", e);
            }
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(SafeCityError::ReadinessTimeout {
        url: url.to_string(),
        attempts,
    })
}
