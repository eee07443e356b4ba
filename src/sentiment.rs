//! Sentiment scoring and the signed importance transform.

use crate::api::SentimentModel;
use crate::error::ModelError;
use crate::models::{Fallible, SentimentLabel, SentimentScore};
use crate::utils::truncate_chars;
use tracing::{info, instrument, warn};

/// Only this many leading characters are classified.
pub const MAX_INPUT_CHARS: usize = 512;

/// Wraps a [`SentimentModel`] with a hard character cut and the
/// `("N/A", 0)` placeholder on failure.
#[derive(Debug, Clone)]
pub struct SentimentScorer<M> {
    model: M,
}

impl<M: SentimentModel> SentimentScorer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &M {
        &self.model
    }

    /// Classify the first [`MAX_INPUT_CHARS`] characters of `text` and turn
    /// the result into a signed importance score.
    #[instrument(level = "info", skip_all)]
    pub async fn score(&self, text: &str) -> Fallible<SentimentScore> {
        match self.classify(truncate_chars(text, MAX_INPUT_CHARS)).await {
            Ok(score) => {
                info!(label = %score.label, importance = score.importance, "Sentiment scored");
                Fallible::ok(score)
            }
            Err(e) => {
                warn!(error = %e, "Sentiment analysis failed; using N/A");
                Fallible::degraded(SentimentScore::unavailable(), e)
            }
        }
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore, ModelError> {
        let best = self.model.classify(text).await?;
        let label = SentimentLabel::from_model_label(&best.label)
            .ok_or_else(|| ModelError::UnknownLabel(best.label.clone()))?;
        Ok(SentimentScore::from_confidence(label, best.score))
    }
}
