//! HTTP client and the I/O-bound fetch worker
//!
//! A fetch worker sends a fixed number of sequential GET requests to the
//! delay endpoint. Every attempt ends up as an [`AttemptOutcome`]: failures
//! are recorded in the worker's result and never abort the worker. Nothing is
//! retried.

use crate::{
    error::{AppError, ErrorContext, Result},
    logging::DispatchLogger,
    models::{AttemptOutcome, FetchConfig, WorkerResult},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a GET request, read the body, and return the status code
    async fn get_status(&self, url: &str) -> Result<u16>;
}

/// reqwest-backed client with a per-request timeout
#[derive(Debug, Clone)]
pub struct DelayClient {
    client: Client,
    request_timeout: Duration,
}

impl DelayClient {
    /// Create a client whose requests give up after `request_timeout`
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("runtime-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::new(config.request_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[async_trait]
impl HttpClient for DelayClient {
    async fn get_status(&self, url: &str) -> Result<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;
        let status = response.status().as_u16();
        response.bytes().await.context("reading response body")?;
        Ok(status)
    }
}

/// Turn one request result into an attempt outcome
pub fn classify_attempt(attempt: u32, result: Result<u16>) -> AttemptOutcome {
    match result {
        Ok(status) if status == StatusCode::OK.as_u16() => AttemptOutcome::Success { attempt, status },
        Ok(status) => AttemptOutcome::Failed {
            attempt,
            error: format!("unexpected HTTP status {}", status),
        },
        Err(error) => AttemptOutcome::Failed {
            attempt,
            error: error.to_string(),
        },
    }
}

/// Run one fetch worker: `attempts` sequential GETs against `endpoint`
pub async fn fetch_worker(
    client: &dyn HttpClient,
    worker_id: u32,
    endpoint: &str,
    attempts: u32,
    logger: Option<&DispatchLogger>,
) -> WorkerResult {
    let mut outcomes = Vec::with_capacity(attempts as usize);

    for attempt in 1..=attempts {
        let outcome = classify_attempt(attempt, client.get_status(endpoint).await);
        if let (Some(logger), Some(error)) = (logger, outcome.error()) {
            logger.log_attempt_failed(worker_id, attempt, error);
        }
        outcomes.push(outcome);
    }

    WorkerResult::requests(worker_id, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails every other call, answers 503 on the fifth
    struct ScriptedClient {
        calls: AtomicU32,
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn get_status(&self, _url: &str) -> Result<u16> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match call {
                5 => Ok(503),
                n if n % 2 == 0 => Err(AppError::timeout("operation timed out")),
                _ => Ok(200),
            }
        }
    }

    #[test]
    fn test_classify_attempt() {
        assert_eq!(
            classify_attempt(1, Ok(200)),
            AttemptOutcome::Success { attempt: 1, status: 200 }
        );
        assert!(matches!(
            classify_attempt(2, Ok(500)),
            AttemptOutcome::Failed { attempt: 2, ref error } if error.contains("500")
        ));
        assert!(matches!(
            classify_attempt(3, Err(AppError::network("connection refused"))),
            AttemptOutcome::Failed { attempt: 3, ref error } if error.contains("connection refused")
        ));
    }

    #[test]
    fn test_fetch_worker_records_every_attempt() {
        let client = ScriptedClient { calls: AtomicU32::new(0) };
        let result = tokio_test::block_on(fetch_worker(&client, 9, "http://unused.invalid/delay/1", 5, None));

        assert_eq!(result.worker_id, 9);
        assert_eq!(result.request_count(), 5);
        // calls 2 and 4 time out, call 5 is a 503
        assert_eq!(result.failed_count(), 3);

        if let crate::models::WorkerPayload::Requests { attempts } = &result.payload {
            let numbers: Vec<u32> = attempts.iter().map(|a| a.attempt()).collect();
            assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        } else {
            panic!("expected request payload");
        }
    }

    #[test]
    fn test_delay_client_creation() {
        let client = DelayClient::new(Duration::from_secs(15)).unwrap();
        assert_eq!(client.request_timeout(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_recorded_not_raised() {
        let client = DelayClient::new(Duration::from_millis(500)).unwrap();
        // Port 9 (discard) on loopback is closed on any sane test machine.
        let result = fetch_worker(&client, 1, "http://127.0.0.1:9/delay/1", 2, None).await;
        assert_eq!(result.request_count(), 2);
        assert_eq!(result.failed_count(), 2);
    }
}
