//! The per-article pipeline: extract, gate, summarize, score.
//!
//! Everything runs strictly in sequence. Batch mode walks the preloaded list
//! one article at a time with `futures::stream::then`, which never overlaps
//! items.

use crate::api::{SentimentModel, SummaryModel};
use crate::error::ExtractError;
use crate::extractor::ArticleExtractor;
use crate::models::{AnalysisResult, ArticleAnalysis, ArticleSource};
use crate::sentiment::SentimentScorer;
use crate::summarizer::Summarizer;
use futures::stream::{self, StreamExt};
use std::pin::pin;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why an article produced no analysis.
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("error fetching article: {0}")]
    Extraction(#[from] ExtractError),

    #[error("article text too short for analysis ({chars} characters)")]
    TooShort { chars: usize },
}

/// One article and what became of it.
#[derive(Debug)]
pub struct ArticleOutcome {
    pub source: ArticleSource,
    pub result: Result<ArticleAnalysis, AnalysisFailure>,
}

impl ArticleOutcome {
    /// The table row for this article, if it was analyzed.
    pub fn row(&self) -> Option<AnalysisResult> {
        self.result
            .as_ref()
            .ok()
            .map(|analysis| AnalysisResult::new(&self.source, analysis))
    }
}

/// Holds the three stage handles for the lifetime of a session.
///
/// Built once in `main` and reused for every article.
#[derive(Debug)]
pub struct Analyzer<E, S, C> {
    extractor: E,
    summarizer: Summarizer<S>,
    scorer: SentimentScorer<C>,
}

impl<E, S, C> Analyzer<E, S, C>
where
    E: ArticleExtractor,
    S: SummaryModel,
    C: SentimentModel,
{
    pub fn new(extractor: E, summarizer: Summarizer<S>, scorer: SentimentScorer<C>) -> Self {
        Self {
            extractor,
            summarizer,
            scorer,
        }
    }

    /// Analyze a single URL.
    ///
    /// Text that fails to extract or is shorter than
    /// [`MIN_ARTICLE_CHARS`](crate::models::MIN_ARTICLE_CHARS) characters
    /// yields an error and neither model is called. Otherwise both models see
    /// the full extracted text and apply their own truncation.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn analyze(&self, url: &str) -> Result<ArticleAnalysis, AnalysisFailure> {
        let article = self.extractor.extract(url).await.map_err(|e| {
            warn!(error = %e, "Extraction failed");
            e
        })?;

        if !article.is_valid() {
            let chars = article.char_len();
            info!(chars, "Article text too short; skipping");
            return Err(AnalysisFailure::TooShort { chars });
        }

        let summary = self.summarizer.summarize(&article.text).await;
        let sentiment = self.scorer.score(&article.text).await;
        if summary.is_degraded() || sentiment.is_degraded() {
            info!("Analysis completed with placeholder results");
        }

        Ok(ArticleAnalysis {
            page_title: article.page_title,
            summary,
            sentiment,
        })
    }

    /// Analyze each source in order, one after another.
    ///
    /// Every input yields exactly one [`ArticleOutcome`]; failures do not stop
    /// the batch. `on_each` sees every outcome as soon as it is ready so the
    /// caller can render progressively.
    #[instrument(level = "info", skip_all, fields(count = sources.len()))]
    pub async fn analyze_batch<F>(
        &self,
        sources: &[ArticleSource],
        mut on_each: F,
    ) -> Vec<ArticleOutcome>
    where
        F: FnMut(&ArticleOutcome),
    {
        let mut pending = pin!(stream::iter(sources.iter().cloned()).then(|source| async move {
            let result = self.analyze(&source.url).await;
            ArticleOutcome { source, result }
        }));

        let mut outcomes = Vec::with_capacity(sources.len());
        while let Some(outcome) = pending.next().await {
            on_each(&outcome);
            outcomes.push(outcome);
        }

        let analyzed = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(
            total = outcomes.len(),
            analyzed,
            skipped = outcomes.len() - analyzed,
            "Batch analysis complete"
        );
        outcomes
    }
}

/// Table rows for the successfully analyzed articles, in input order.
pub fn table_rows(outcomes: &[ArticleOutcome]) -> Vec<AnalysisResult> {
    outcomes.iter().filter_map(ArticleOutcome::row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LabelScore, SummaryParams};
    use crate::error::ModelError;
    use crate::models::{ArticleText, SentimentLabel};
    use crate::summarizer::SUMMARY_FAILED;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned texts by URL; unknown URLs behave like a dead host.
    #[derive(Default)]
    struct FakeExtractor {
        pages: HashMap<String, String>,
    }

    impl FakeExtractor {
        fn with(mut self, url: &str, text: String) -> Self {
            self.pages.insert(url.to_string(), text);
            self
        }
    }

    impl ArticleExtractor for FakeExtractor {
        async fn extract(&self, url: &str) -> Result<ArticleText, ExtractError> {
            self.pages
                .get(url)
                .map(|t| ArticleText::new(t.clone()))
                .ok_or_else(|| ExtractError::NoContent {
                    url: url.to_string(),
                })
        }
    }

    #[derive(Default)]
    struct CountingSummary {
        calls: AtomicUsize,
        fail: bool,
    }

    impl SummaryModel for CountingSummary {
        async fn summarize(&self, _: &str, _: &SummaryParams) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ModelError::Empty("summary"))
            } else {
                Ok("A concise summary.".to_string())
            }
        }
    }

    /// Label picked from a keyword so tests can steer polarity.
    #[derive(Default)]
    struct KeywordSentiment {
        calls: AtomicUsize,
    }

    impl SentimentModel for KeywordSentiment {
        async fn classify(&self, text: &str) -> Result<LabelScore, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let label = if text.contains("grim") { "NEGATIVE" } else { "POSITIVE" };
            Ok(LabelScore {
                label: label.to_string(),
                score: 0.75,
            })
        }
    }

    fn analyzer(
        extractor: FakeExtractor,
        summary: CountingSummary,
    ) -> Analyzer<FakeExtractor, CountingSummary, KeywordSentiment> {
        Analyzer::new(
            extractor,
            Summarizer::new(summary),
            SentimentScorer::new(KeywordSentiment::default()),
        )
    }

    fn long_text(word: &str) -> String {
        format!("{word} ").repeat(40)
    }

    #[tokio::test]
    async fn test_short_text_is_skipped_without_model_calls() {
        let a = analyzer(
            FakeExtractor::default().with("https://x/short", "s".repeat(50)),
            CountingSummary::default(),
        );
        let result = a.analyze("https://x/short").await;
        assert!(matches!(result, Err(AnalysisFailure::TooShort { chars: 50 })));
        assert_eq!(a.summarizer_calls(), 0);
        assert_eq!(a.scorer_calls(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_error_not_panic() {
        let a = analyzer(FakeExtractor::default(), CountingSummary::default());
        let result = a.analyze("https://unreachable.invalid/").await;
        assert!(matches!(result, Err(AnalysisFailure::Extraction(_))));
        assert!(result.ok().is_none());
    }

    #[tokio::test]
    async fn test_valid_text_is_analyzed() {
        let a = analyzer(
            FakeExtractor::default().with("https://x/a", long_text("bright")),
            CountingSummary::default(),
        );
        let analysis = a.analyze("https://x/a").await.unwrap();
        assert_eq!(analysis.summary(), "A concise summary.");
        assert_eq!(analysis.label(), SentimentLabel::Positive);
        assert_eq!(analysis.importance(), 75.0);
        assert!((-100.0..=100.0).contains(&analysis.importance()));
    }

    #[tokio::test]
    async fn test_summary_failure_still_yields_analysis() {
        let summary = CountingSummary {
            fail: true,
            ..Default::default()
        };
        let a = analyzer(
            FakeExtractor::default().with("https://x/grim", long_text("grim")),
            summary,
        );
        let analysis = a.analyze("https://x/grim").await.unwrap();
        assert_eq!(analysis.summary(), SUMMARY_FAILED);
        assert!(analysis.summary.is_degraded());
        assert_eq!(analysis.label(), SentimentLabel::Negative);
        assert_eq!(analysis.importance(), -75.0);
    }

    #[tokio::test]
    async fn test_batch_rows_match_successes() {
        let sources = vec![
            ArticleSource::new("Good", "https://x/good"),
            ArticleSource::new("Short", "https://x/short"),
            ArticleSource::new("Dead", "https://x/dead"),
            ArticleSource::new("Grim", "https://x/grim"),
        ];
        let a = analyzer(
            FakeExtractor::default()
                .with("https://x/good", long_text("bright"))
                .with("https://x/short", "tiny".to_string())
                .with("https://x/grim", long_text("grim")),
            CountingSummary::default(),
        );

        let mut seen = Vec::new();
        let outcomes = a
            .analyze_batch(&sources, |o| seen.push(o.source.url.clone()))
            .await;
        assert_eq!(outcomes.len(), 4);
        assert_eq!(seen, sources.iter().map(|s| s.url.clone()).collect::<Vec<_>>());
        assert_eq!(
            outcomes.iter().map(|o| o.source.title.as_str()).collect::<Vec<_>>(),
            vec!["Good", "Short", "Dead", "Grim"]
        );

        let rows = table_rows(&outcomes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Good");
        assert_eq!(rows[0].sentiment_label, SentimentLabel::Positive);
        assert_eq!(rows[1].title, "Grim");
        assert_eq!(rows[1].importance_score, -75.0);
        assert_eq!(a.summarizer_calls(), 2);
    }

    impl Analyzer<FakeExtractor, CountingSummary, KeywordSentiment> {
        fn summarizer_calls(&self) -> usize {
            self.summarizer.model().calls.load(Ordering::SeqCst)
        }

        fn scorer_calls(&self) -> usize {
            self.scorer.model().calls.load(Ordering::SeqCst)
        }
    }
}
