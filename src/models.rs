//! Data models for articles and their analyses.
//!
//! - [`ArticleSource`]: a `(title, url)` pair to analyze
//! - [`ArticleText`]: extracted body text, gated by [`ArticleText::is_valid`]
//! - [`SentimentLabel`] / [`SentimentScore`]: polarity and signed importance
//! - [`ArticleAnalysis`]: what the pipeline produces for one article
//! - [`AnalysisResult`]: one row of the batch table
//!
//! Everything here lives for a single run; nothing is persisted.

use crate::error::ModelError;
use crate::utils::round2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of characters an extracted text needs before it is analyzed.
pub const MIN_ARTICLE_CHARS: usize = 100;

const SECOND_LEVEL_LABELS: &[&str] = &["co", "com", "org", "net", "ac", "gov", "edu"];

/// A titled URL to analyze.
///
/// Identity is the URL; the title is only a display label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSource {
    pub title: String,
    pub url: String,
}

impl ArticleSource {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Extract the domain name (before .com/.org/etc) from the URL.
    /// For example: "https://www.bbc.com/news/x" -> "bbc", and
    /// "https://www.bbc.co.uk/news/x" -> "bbc".
    pub fn source_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        let mut name = parts.len().checked_sub(2)?;
        // Country-code second-level suffixes such as `co.uk` or `com.au`.
        if name > 0 && parts[name + 1].len() == 2 && SECOND_LEVEL_LABELS.contains(&parts[name]) {
            name -= 1;
        }
        Some(parts[name].to_string())
    }
}

/// The bundled demonstration articles.
pub fn preloaded_articles() -> Vec<ArticleSource> {
    vec![
        ArticleSource::new(
            "BBC Article 1",
            "https://www.bbc.com/news/world-us-canada-66801985",
        ),
        ArticleSource::new(
            "BBC Article 2",
            "https://www.bbc.com/news/technology-66804779",
        ),
        ArticleSource::new(
            "BBC Article 3",
            "https://www.bbc.com/news/science-environment-66799975",
        ),
    ]
}

/// Plain article text pulled out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    /// Body text, paragraphs separated by blank lines.
    pub text: String,
    /// Headline found on the page, if any.
    pub page_title: Option<String>,
}

impl ArticleText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_title: None,
        }
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when the text is long enough to be worth summarizing.
    pub fn is_valid(&self) -> bool {
        self.char_len() >= MIN_ARTICLE_CHARS
    }
}

/// Sentiment polarity as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "POSITIVE")]
    Positive,
    #[serde(rename = "NEGATIVE")]
    Negative,
    /// The classifier could not be consulted.
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl SentimentLabel {
    /// Map a classifier label onto a polarity, ignoring case.
    pub fn from_model_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("POSITIVE") {
            Some(Self::Positive)
        } else if label.eq_ignore_ascii_case("NEGATIVE") {
            Some(Self::Negative)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A polarity plus its signed importance score in `[-100, 100]`.
///
/// The sign carries the polarity and the magnitude carries the classifier's
/// confidence. It is not a calibrated metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub importance: f64,
}

impl SentimentScore {
    /// `confidence * 100` for POSITIVE, `-confidence * 100` otherwise,
    /// rounded to two decimals.
    pub fn from_confidence(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let importance = match label {
            SentimentLabel::Positive => confidence * 100.0,
            SentimentLabel::Negative => -confidence * 100.0,
            SentimentLabel::NotAvailable => 0.0,
        };
        Self {
            label,
            importance: round2(importance),
        }
    }

    /// The placeholder used when the classifier fails.
    pub fn unavailable() -> Self {
        Self {
            label: SentimentLabel::NotAvailable,
            importance: 0.0,
        }
    }
}

/// A value that is always present, plus the failure that forced a placeholder.
#[derive(Debug)]
pub struct Fallible<T> {
    pub value: T,
    pub error: Option<ModelError>,
}

impl<T> Fallible<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn degraded(value: T, error: ModelError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything the pipeline learned about one article.
#[derive(Debug)]
pub struct ArticleAnalysis {
    pub page_title: Option<String>,
    pub summary: Fallible<String>,
    pub sentiment: Fallible<SentimentScore>,
}

impl ArticleAnalysis {
    pub fn summary(&self) -> &str {
        &self.summary.value
    }

    pub fn label(&self) -> SentimentLabel {
        self.sentiment.value.label
    }

    pub fn importance(&self) -> f64 {
        self.sentiment.value.importance
    }
}

/// One row of the batch table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub sentiment_label: SentimentLabel,
    pub importance_score: f64,
}

impl AnalysisResult {
    pub fn new(source: &ArticleSource, analysis: &ArticleAnalysis) -> Self {
        Self {
            title: source.title.clone(),
            url: source.url.clone(),
            summary: analysis.summary().to_string(),
            sentiment_label: analysis.label(),
            importance_score: analysis.importance(),
        }
    }
}
