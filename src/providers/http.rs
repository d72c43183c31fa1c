use crate::core::error::RateError;
use std::time::Duration;
use tracing::debug;

/// Builds the client shared by every provider.
pub fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Issues a GET and returns the body of a 200 response.
///
/// Transport failures and non-200 statuses map to distinct errors.
pub async fn get_text(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
) -> Result<String, RateError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| RateError::Transport { provider, source })?;

    let status = response.status();
    debug!(%status, provider, "Received upstream response");
    if status != reqwest::StatusCode::OK {
        return Err(RateError::UpstreamStatus { provider, status });
    }

    response
        .text()
        .await
        .map_err(|source| RateError::Transport { provider, source })
}

/// Accepts only rates that can be cached and multiplied.
pub fn checked_rate(provider: &'static str, field: &str, rate: f64) -> Result<f64, RateError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RateError::UpstreamShape {
            provider,
            detail: format!("{field} is not a positive rate: {rate}"),
        })
    }
}
