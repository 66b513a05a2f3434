//! HTTP boundary to the remote analysis backend.
//!
//! This crate is responsible for transporting transcripts to the
//! phenomenological-analysis service and returning its JSON verbatim. The
//! analysis pipeline itself (transcription, coding, clustering, synthesis)
//! lives entirely in that service; body-map meaning lives in `soma-core`
//! under `soma_core::payload`. This crate handles requests, timeouts, and
//! status-code mapping only.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("soma/", env!("CARGO_PKG_VERSION"));
/// Enhanced analysis runs a multi-phase pipeline on the backend; generous
/// timeout to match.
const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Errors returned by the analysis boundary.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {0}: {1}")]
    Api(u16, String),

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Request body for the enhanced analysis endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    /// The interview transcript to analyse.
    pub text: String,
    /// Optional research-context block gathered by the host UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// Optional researcher-supplied code definitions to seed the codebook;
    /// passed through to the pipeline opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_codes: Option<Vec<Value>>,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
            custom_codes: None,
        }
    }
}

/// Client for the remote analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Creates a client for the service at `base_url` (scheme and authority,
    /// no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits a transcript for enhanced analysis and returns the backend's
    /// structured JSON unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Network`] when the request cannot be sent,
    /// [`AnalysisError::Api`] for non-success status codes (with the response
    /// body as detail), and [`AnalysisError::Decode`] when the body is not
    /// JSON.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<Value, AnalysisError> {
        let url = format!("{}/analyze/enhanced", self.base_url);

        tracing::debug!(text_length = request.text.len(), "submitting transcript for analysis");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "analysis request rejected");
            return Err(AnalysisError::Api(status.as_u16(), body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AnalysisError::Decode(e.to_string()))
    }
}
