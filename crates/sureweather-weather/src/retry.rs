//! Backoff for OpenWeather calls.
//!
//! A call is repeated when it timed out, could not connect, or came back
//! with 5xx, 408 or 429. Anything else (a rejected key, bad coordinates) is
//! handed to the provider as-is on the first try.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

const BASE_DELAY: Duration = Duration::from_millis(100);
const DELAY_CAP: Duration = Duration::from_secs(5);

/// How many times to repeat a failed OpenWeather call and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Wait before the first repeat; doubles for each later one
    pub base: Duration,
    /// Upper bound on any single wait
    pub cap: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::with_retries(2)
    }
}

impl Backoff {
    pub fn new(max_retries: u32, base_ms: u64, cap_ms: u64) -> Self {
        Self {
            max_retries,
            base: Duration::from_millis(base_ms),
            cap: Duration::from_millis(cap_ms),
        }
    }

    /// Default delays with a configured number of repeats.
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            base: BASE_DELAY,
            cap: DELAY_CAP,
        }
    }

    /// Single attempt, never repeats.
    pub fn once() -> Self {
        Self::with_retries(0)
    }

    /// Wait before repeat number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(31);
        self.base.saturating_mul(1 << doublings).min(self.cap)
    }
}

fn transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

/// Why an attempt is worth repeating, or `None` when its outcome is final.
fn transient_reason(outcome: &Result<Response, reqwest::Error>) -> Option<String> {
    match outcome {
        Ok(resp) if transient_status(resp.status()) => Some(format!("status {}", resp.status())),
        Ok(_) => None,
        Err(e) if e.is_timeout() => Some("timeout".to_string()),
        Err(e) if e.is_connect() => Some("connect failure".to_string()),
        Err(e) if e.is_request() => None,
        Err(e) => e
            .status()
            .filter(|s| transient_status(*s))
            .map(|s| format!("status {s}")),
    }
}

/// Run `send` until it yields a final outcome or the backoff is used up.
///
/// Once repeats run out the last outcome is returned unchanged, so a
/// persistent 503 still reaches the caller as a response.
pub async fn send_with_backoff<F, Fut>(
    backoff: &Backoff,
    send: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        let outcome = send().await;
        let Some(reason) = transient_reason(&outcome) else {
            return outcome;
        };
        if retry >= backoff.max_retries {
            tracing::warn!(%reason, attempts = retry + 1, "OpenWeather still failing, giving up");
            return outcome;
        }

        retry += 1;
        let wait = backoff.delay(retry);
        tracing::debug!(%reason, retry, ?wait, "OpenWeather call failed, backing off");
        tokio::time::sleep(wait).await;
    }
}
