//! Inference service client.
//!
//! The summarization and sentiment models are external black boxes reached
//! over HTTP using the Hugging Face Inference API wire format:
//!
//! - [`SummaryModel`]: text plus length window in, one summary out
//! - [`SentimentModel`]: text in, best `(label, confidence)` out
//! - [`InferenceClient`]: the shared HTTP plumbing both implementations use
//!
//! There is no retry and no timeout beyond the HTTP client defaults; a failed
//! call is reported once and the caller decides what placeholder to show.

use crate::error::ModelError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Generation settings for a summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryParams {
    pub min_length: u32,
    pub max_length: u32,
    /// `false` requests greedy, reproducible decoding.
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 130,
            do_sample: false,
        }
    }
}

/// The single best label a classifier returned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Something that can summarize text.
pub trait SummaryModel {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ModelError>;
}

/// Something that can classify text polarity.
pub trait SentimentModel {
    async fn classify(&self, text: &str) -> Result<LabelScore, ModelError>;
}

/// HTTP client for a Hugging Face style inference endpoint.
///
/// Requests go to `{api_base}/{model}`. The bearer token is optional because
/// self-hosted endpoints often run without one.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl InferenceClient {
    pub fn new(client: Client, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{}", self.api_base, model.trim_start_matches('/'))
    }

    /// POST `inputs` (and optional `parameters`) to `model`, returning the raw
    /// JSON body of a successful reply.
    #[instrument(level = "info", skip_all, fields(%model, input_chars = inputs.chars().count()))]
    pub async fn infer<P: Serialize>(
        &self,
        model: &str,
        inputs: &str,
        parameters: Option<P>,
    ) -> Result<String, ModelError> {
        let t0 = Instant::now();
        let body = InferenceRequest {
            inputs,
            parameters,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.endpoint(model)).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| truncate_for_log(&text, 300));
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis(),
                error = %message,
                "Inference call failed"
            );
            return Err(ModelError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            elapsed_ms = dt.as_millis(),
            response_preview = %truncate_for_log(&text, 300),
            "Inference call succeeded"
        );
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryCandidate {
    summary_text: String,
}

/// Pick the first candidate summary from a summarization response.
pub fn first_summary(raw: &str) -> Result<String, ModelError> {
    let candidates: Vec<SummaryCandidate> = serde_json::from_str(raw)?;
    candidates
        .into_iter()
        .next()
        .map(|c| c.summary_text.trim().to_string())
        .ok_or(ModelError::Empty("summary"))
}

/// Classifier replies come either flat or nested one level per input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn best(self) -> Option<LabelScore> {
        let scores = match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(scores) => scores,
        };
        scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Pick the highest-confidence label from a classification response.
pub fn best_label(raw: &str) -> Result<LabelScore, ModelError> {
    let response: ClassificationResponse = serde_json::from_str(raw)?;
    response.best().ok_or(ModelError::Empty("sentiment label"))
}

/// Abstractive summarizer hosted behind [`InferenceClient`].
#[derive(Debug, Clone)]
pub struct HostedSummarizer {
    client: InferenceClient,
    model: String,
}

impl HostedSummarizer {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl SummaryModel for HostedSummarizer {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ModelError> {
        let raw = self.client.infer(&self.model, text, Some(params)).await?;
        first_summary(&raw)
    }
}

/// Binary polarity classifier hosted behind [`InferenceClient`].
#[derive(Debug, Clone)]
pub struct HostedSentiment {
    client: InferenceClient,
    model: String,
}

impl HostedSentiment {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl SentimentModel for HostedSentiment {
    async fn classify(&self, text: &str) -> Result<LabelScore, ModelError> {
        let raw = self.client.infer::<()>(&self.model, text, None).await?;
        best_label(&raw)
    }
}
