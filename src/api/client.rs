//! HTTP client for the translation service with retry and backoff.
//!
//! All remote calls funnel through [`ApiClient::execute_with_retry`]: a
//! failed attempt is classified (see [`super::error`]), retryable failures
//! are retried with doubling backoff until the budget runs out, and fatal
//! failures surface after exactly one attempt. The client also tracks the
//! last trace id the service returned, success or failure, so errors can be
//! correlated with server-side logs.

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use super::error::{ApiError, ErrorKind, classify_status, classify_transport};
use super::types::{Language, TranslateBody, TranslateResponse, Translation, Usage};
use crate::translation::TranslationParams;

/// Response header carrying the service's diagnostic trace id.
const TRACE_ID_HEADER: &str = "x-trace-id";

/// Delay before the first retry; doubles on each subsequent attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// How much of an error response body to keep in messages.
const MAX_BODY_EXCERPT: usize = 200;

pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
    last_trace_id: Mutex<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the given endpoint.
    ///
    /// `timeout` bounds each individual attempt; exceeding it is classified
    /// as a retryable Network failure. `max_retries` of 0 disables retries.
    pub fn new(
        endpoint: String,
        api_key: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            max_retries,
            last_trace_id: Mutex::new(None),
        })
    }

    /// The trace id from the most recent response, if the service sent one.
    pub fn last_trace_id(&self) -> Option<String> {
        self.last_trace_id
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record_trace_id(&self, response: &reqwest::Response) {
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        if let Some(id) = trace_id
            && let Ok(mut guard) = self.last_trace_id.lock()
        {
            *guard = Some(id.to_string());
        }
    }

    /// Translates `texts` into the target language described by `params`.
    ///
    /// Returns one [`Translation`] per input text, in input order.
    pub async fn translate(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<Translation>, ApiError> {
        let url = self.url("/v2/translate");
        let url = &url;

        self.execute_with_retry(|| async move {
            let body = TranslateBody::new(texts, params);
            let request = self.http.post(url).bearer_auth(&self.api_key).json(&body);
            let response = self.dispatch(request).await?;

            let payload: TranslateResponse = response.json().await.map_err(|err| {
                ApiError::new(ErrorKind::Malformed, format!("invalid translate payload: {err}"))
            })?;

            if payload.translations.len() < texts.len() {
                return Err(ApiError::new(
                    ErrorKind::Malformed,
                    format!(
                        "expected {} translations, got {}",
                        texts.len(),
                        payload.translations.len()
                    ),
                ));
            }

            Ok(payload.translations)
        })
        .await
    }

    /// Fetches account character usage.
    pub async fn usage(&self) -> Result<Usage, ApiError> {
        let url = self.url("/v2/usage");
        let url = &url;

        self.execute_with_retry(|| async move {
            let request = self.http.get(url).bearer_auth(&self.api_key);
            let response = self.dispatch(request).await?;

            response.json::<Usage>().await.map_err(|err| {
                ApiError::new(ErrorKind::Malformed, format!("invalid usage payload: {err}"))
            })
        })
        .await
    }

    /// Lists the target languages the service supports.
    pub async fn languages(&self) -> Result<Vec<Language>, ApiError> {
        let url = self.url("/v2/languages");
        let url = &url;

        self.execute_with_retry(|| async move {
            let request = self
                .http
                .get(url)
                .bearer_auth(&self.api_key)
                .query(&[("type", "target")]);
            let response = self.dispatch(request).await?;

            response.json::<Vec<Language>>().await.map_err(|err| {
                ApiError::new(ErrorKind::Malformed, format!("invalid languages payload: {err}"))
            })
        })
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.trim_end_matches('/'))
    }

    /// Sends one request and classifies any failure.
    ///
    /// Records the trace id from every response that arrives, including
    /// error responses.
    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::new(classify_transport(&err), err.to_string()))?;

        self.record_trace_id(&response);

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.trim().chars().take(MAX_BODY_EXCERPT).collect();
        let message = if excerpt.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {excerpt}")
        };

        Err(ApiError::new(classify_status(status.as_u16()), message)
            .with_trace_id(self.last_trace_id()))
    }

    /// Runs `attempt` until it succeeds, the retry budget is spent, or a
    /// non-retryable error occurs.
    ///
    /// An explicit loop with a remaining-budget counter; the inter-attempt
    /// delay doubles each round. The surfaced error is annotated with the
    /// latest trace id when it lacks one of its own.
    async fn execute_with_retry<T, F, Fut>(&self, mut attempt: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut remaining = self.max_retries;
        let mut delay = INITIAL_BACKOFF;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && remaining > 0 => {
                    remaining -= 1;
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => return Err(err.with_trace_id(self.last_trace_id())),
            }
        }
    }
}
