use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app_config::{GatewayConfig, RetryConfig};

/// Whether a request may be repeated without side effects. Only idempotent requests are
/// ever retried; the constructors of [`ApiRequest`] fix the flag per HTTP method so a
/// booking or payment call cannot opt into retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    Idempotent,
    NonIdempotent,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    idempotency: Idempotency,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            idempotency: Idempotency::Idempotent,
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, TransportError> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
            idempotency: Idempotency::NonIdempotent,
        })
    }

    pub fn idempotency(&self) -> Idempotency {
        self.idempotency
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Status and raw body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Server-supplied `error` or `message`, else a generic line naming `operation`
    pub fn failure_message(&self, operation: &str) -> String {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.error.or(body.message))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("{} failed with status {}", operation, self.status.as_u16()))
    }
}

/// Exponential backoff: the delay doubles after every failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

/// HTTP transport that absorbs 503s and network failures on idempotent requests
#[derive(Debug, Clone)]
pub struct RetryingTransport {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl RetryingTransport {
    pub fn new(gateway: &GatewayConfig, retry: &RetryConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(gateway.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: gateway.base_url.clone(),
            policy: RetryPolicy::from(retry),
        })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let max_attempts = match request.idempotency {
            Idempotency::Idempotent => self.policy.max_attempts,
            Idempotency::NonIdempotent => 1,
        };

        let mut attempt = 1;
        loop {
            let result = self.send_once(request).await;

            let retryable = match &result {
                Ok(response) => response.status == StatusCode::SERVICE_UNAVAILABLE,
                Err(TransportError::Network(_)) => true,
                Err(TransportError::Json(_)) => false,
            };
            if !retryable || attempt >= max_attempts {
                return result;
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                "{} {} unavailable (attempt {}/{}), retrying in {:?}",
                request.method, request.path, attempt, max_attempts, delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}
