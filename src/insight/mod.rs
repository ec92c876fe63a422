// src/insight/mod.rs

//! Turns a `MetricsRecord` into a completion prompt and extracts the answer.
//!
//! One POST per call, no retry. The network layer sits behind
//! [`CompletionTransport`] so callers can swap the HTTP client out.
//!
//! The credential travels as a plain `Authorization: Bearer` header and lives
//! in memory as an ordinary `String`; there is no secret store behind it.

mod transport;

pub use transport::{CompletionTransport, HttpTransport, RawResponse};

use crate::core::FinderError;
use crate::metrics::MetricsRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Completion endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/engines/davinci-codex/completions";
/// Token cap sent with every request.
pub const MAX_TOKENS: u32 = 100;
/// Request timeout applied to the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the requester needs to reach the completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct InsightSettings {
    pub api_key: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl InsightSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

// Keeps the key out of log lines that format the settings.
impl fmt::Debug for InsightSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightSettings")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// JSON body posted to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Joins the record's four values with `", "`, in color, ping, download, upload order.
pub fn format_record(record: &MetricsRecord) -> String {
    [
        record.color.clone(),
        format_float(record.ping_ms),
        format_float(record.download_bps),
        format_float(record.upload_bps),
    ]
    .join(", ")
}

/// Renders whole values with a trailing `.0` so they still read as floats (`20.0`, not `20`).
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// The natural-language prompt sent for `record`.
pub fn build_prompt(record: &MetricsRecord) -> String {
    format!(
        "Given the employee data: {}, analyze the network data to find employee connections.",
        format_record(record)
    )
}

/// Extracts `choices[0].text`, trimmed, from a completion response body.
pub fn parse_completion(body: &str) -> Result<String, FinderError> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|e| FinderError::MalformedResponse { message: format!("unexpected completion body: {}", e) })?;
    let first = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| FinderError::MalformedResponse { message: "completion body has an empty 'choices' array".to_string() })?;
    Ok(first.text.trim().to_string())
}

/// Issues completion requests through a transport.
#[derive(Clone)]
pub struct InsightRequester {
    transport: Arc<dyn CompletionTransport>,
    max_tokens: u32,
}

impl InsightRequester {
    /// Requester over an arbitrary transport.
    pub fn new(transport: Arc<dyn CompletionTransport>, max_tokens: u32) -> Self {
        Self { transport, max_tokens }
    }

    /// Requester talking HTTP to `settings.endpoint` with `settings.api_key`.
    pub fn from_settings(settings: &InsightSettings) -> Result<Self, FinderError> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(Arc::new(transport), settings.max_tokens))
    }

    /// Asks for an insight on `record`. Exactly one transport call is made.
    ///
    /// # Errors
    /// * `Network` when the transport fails.
    /// * `HttpStatus` for a non-2xx answer.
    /// * `MalformedResponse` when `choices[0].text` is missing.
    pub async fn request(&self, record: &MetricsRecord) -> Result<String, FinderError> {
        let request = CompletionRequest {
            prompt: build_prompt(record),
            max_tokens: self.max_tokens,
        };
        debug!(prompt = %request.prompt, "requesting completion");

        let started = Instant::now();
        let response = self.transport.post(&request).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, elapsed_ms, "completion endpoint rejected request");
            return Err(FinderError::HttpStatus { status: response.status, body: response.body });
        }

        let insight = parse_completion(&response.body)?;
        info!(status = response.status, elapsed_ms, chars = insight.len(), "completion received");
        Ok(insight)
    }
}

impl fmt::Debug for InsightRequester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightRequester").field("max_tokens", &self.max_tokens).finish_non_exhaustive()
    }
}
