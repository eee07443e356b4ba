//! Article summarization with a degraded-result policy.

use crate::api::{SummaryModel, SummaryParams};
use crate::models::Fallible;
use crate::utils::truncate_words;
use tracing::{info, instrument, warn};

/// Upper bound on whitespace-delimited tokens sent to the model.
pub const MAX_INPUT_WORDS: usize = 1024;

/// Shown in place of a summary when the model call fails.
pub const SUMMARY_FAILED: &str = "Summary generation failed.";

/// Wraps a [`SummaryModel`] with input truncation and a fixed placeholder on
/// failure.
#[derive(Debug, Clone)]
pub struct Summarizer<M> {
    model: M,
    params: SummaryParams,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            params: SummaryParams::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &M {
        &self.model
    }

    /// Summarize `text`, never failing.
    ///
    /// The text is cut to [`MAX_INPUT_WORDS`] tokens first. The model's own
    /// limit may be lower; this is a coarse pre-filter. On error the value is
    /// [`SUMMARY_FAILED`] and the error rides along for the presenter.
    #[instrument(level = "info", skip_all)]
    pub async fn summarize(&self, text: &str) -> Fallible<String> {
        let input = truncate_words(text, MAX_INPUT_WORDS);
        match self.model.summarize(&input, &self.params).await {
            Ok(summary) => {
                info!(summary_chars = summary.len(), "Summary generated");
                Fallible::ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed; using placeholder");
                Fallible::degraded(SUMMARY_FAILED.to_string(), e)
            }
        }
    }
}
