use super::{CompletionRequest, InsightSettings};
use crate::core::FinderError;
use async_trait::async_trait;
use std::fmt;

/// Status and body of a completion response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Delivers one completion request. Implementations report transport
/// failures as `FinderError::Network` and leave status handling to the caller.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn post(&self, request: &CompletionRequest) -> Result<RawResponse, FinderError>;
}

/// `reqwest`-backed transport posting JSON with a bearer credential.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(settings: &InsightSettings) -> Result<Self, FinderError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FinderError::Network { message: format!("building HTTP client: {}", e) })?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post(&self, request: &CompletionRequest) -> Result<RawResponse, FinderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
