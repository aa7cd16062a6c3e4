//! CellStrat Hub inference client.
//!
//! A Hub endpoint serves one deployed model. The endpoint URL is the fixed
//! Hub prefix plus a caller-supplied suffix, and the same URL answers both
//! verbs: GET warms the model into memory, POST runs inference.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::config::hub_url;
use crate::types::Annotations;
use crate::{NerviewError, Result, telemetry};

/// Default request timeout. Cold model loads take around 30 seconds, so
/// this leaves headroom rather than cutting them off.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call controls: deadline override and cancellation.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    timeout: Option<Duration>,
    cancel: Option<watch::Receiver<bool>>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the client-level timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation signal: a watch receiver that flips to
    /// `true`. Guarded calls abort with [`NerviewError::Cancelled`] once
    /// the flip is observed, including calls started after it.
    pub fn cancel_signal(mut self, signal: watch::Receiver<bool>) -> Self {
        self.cancel = Some(signal);
        self
    }
}

/// Outcome of a successful warm-up call.
#[derive(Debug, Clone)]
pub struct WarmupReport {
    /// HTTP status the endpoint answered with.
    pub status: u16,
    /// How long the endpoint took to answer.
    pub elapsed: Duration,
}

/// Client for a single Hub endpoint.
#[derive(Clone)]
pub struct HubClient {
    api_key: String,
    http: Client,
    url: String,
    timeout: Duration,
}

impl HubClient {
    /// Create a client for the endpoint named by `suffix` under the fixed
    /// Hub prefix.
    pub fn new(suffix: &str, api_key: impl Into<String>) -> Self {
        Self::with_url(hub_url(suffix), api_key)
    }

    /// Create a client against a full URL (for testing with wiremock).
    pub fn with_url(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        // Deadlines are enforced per call, so the reqwest client itself
        // carries no global timeout.
        let http = Client::builder()
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the default timeout applied when a call has no override.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Warm the model up.
    ///
    /// Hub endpoints load their model on the first GET and answer quickly
    /// once it is resident. Readiness requires an HTTP success status and
    /// a JSON body; any failure is reported as an error, never as a silent
    /// "ready".
    pub async fn warm_up(&self, opts: &CallOptions) -> Result<WarmupReport> {
        let start = Instant::now();
        let result = self
            .guard(opts, async {
                let response = self
                    .request(Method::GET)
                    .send()
                    .await
                    .map_err(|e| NerviewError::Http(e.to_string()))?;

                self.handle_response_errors(&response)?;

                let status = response.status().as_u16();
                let payload: Value = response
                    .json()
                    .await
                    .map_err(|e| NerviewError::Http(e.to_string()))?;
                debug!(%payload, "warm-up response");

                Ok(status)
            })
            .await;
        Self::record_request("warm_up", start, result.is_ok());

        result.map(|status| WarmupReport {
            status,
            elapsed: start.elapsed(),
        })
    }

    /// Run inference on `text` and return the typed annotations.
    ///
    /// The request body is the bare JSON string literal of the input, not
    /// an object wrapping it. The annotation pairs come back nested under
    /// `body.output`.
    pub async fn predict(&self, text: &str, opts: &CallOptions) -> Result<Annotations> {
        let start = Instant::now();
        let result = self
            .guard(opts, async {
                let response = self
                    .request(Method::POST)
                    .json(&text)
                    .send()
                    .await
                    .map_err(|e| NerviewError::Http(e.to_string()))?;

                self.handle_response_errors(&response)?;

                let payload: Value = response
                    .json()
                    .await
                    .map_err(|e| NerviewError::Http(e.to_string()))?;
                debug!(%payload, "predict response");

                let output = payload
                    .get("body")
                    .and_then(|body| body.get("output"))
                    .cloned()
                    .ok_or(NerviewError::MissingOutput)?;

                let annotations: Annotations = serde_json::from_value(output)?;
                Ok(annotations)
            })
            .await;
        Self::record_request("predict", start, result.is_ok());

        result
    }

    /// All Hub calls share one URL and one header set; only the method and
    /// body differ.
    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, &self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("x-api-key", &self.api_key)
    }

    /// Run a call future under the effective deadline and optional
    /// cancellation signal.
    async fn guard<T>(&self, opts: &CallOptions, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let deadline = opts.timeout.unwrap_or(self.timeout);
        let bounded = tokio::time::timeout(deadline, fut);

        let outcome = match &opts.cancel {
            Some(signal) => tokio::select! {
                _ = Self::cancelled(signal.clone()) => return Err(NerviewError::Cancelled),
                outcome = bounded => outcome,
            },
            None => bounded.await,
        };

        match outcome {
            Ok(result) => result,
            Err(_) => Err(NerviewError::Timeout(deadline)),
        }
    }

    /// Resolve once the cancel signal reads `true`. A dropped sender can
    /// never cancel anything, so that case pends and leaves the outcome
    /// to the deadline.
    async fn cancelled(mut signal: watch::Receiver<bool>) {
        if signal.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Check response status and map to the appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            // API Gateway answers 403 for unknown keys, 401 for missing ones
            401 | 403 => Err(NerviewError::AuthenticationFailed),
            404 => Err(NerviewError::EndpointNotFound(self.url.clone())),
            429 => {
                // Try to parse retry-after header
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(NerviewError::RateLimited { retry_after })
            }
            code => Err(NerviewError::Api {
                status: code,
                message: format!("Hub API error: {status}"),
            }),
        }
    }

    /// Record request outcome metrics (counter + histogram).
    fn record_request(operation: &'static str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "operation" => operation,
        )
        .record(elapsed);
    }
}
