//! Presentation of analyses.
//!
//! This is the only place that turns outcomes and failures into user-facing
//! text. Text output is Markdown-flavoured so it reads well in a terminal and
//! pastes cleanly into notes; JSON output carries the same information for
//! scripting.
//!
//! # Text layout
//!
//! ```text
//! # BBC News Article Analysis
//! ## Preloaded BBC Articles Analysis
//! ### BBC Article 1
//! [Read the article](https://...)
//! **Summary:** ...
//! **Sentiment:** POSITIVE
//! **Importance Score:** 87.00
//! ---              (analyzed articles only)
//! ### Tabulated Results
//! | Title | URL | Summary | Sentiment | Importance Score |
//! ```

use crate::models::AnalysisResult;
use crate::pipeline::{AnalysisFailure, ArticleOutcome, table_rows};
use serde::Serialize;

pub const APP_TITLE: &str = "BBC News Article Analysis";

const INTRO: &str = "Extracts article text, generates a brief summary, and calculates an \
importance score from the article's sentiment (positive or negative).";

const EXTRACTION_FAILED: &str =
    "Failed to extract article text or the article is too short for analysis.";

const TABLE_COLUMNS: [&str; 5] = ["Title", "URL", "Summary", "Sentiment", "Importance Score"];

/// Which section heading introduces the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Preloaded,
    Custom,
}

pub fn banner() -> String {
    format!("# {APP_TITLE}\n\n{INTRO}\n\n")
}

pub fn section_heading(section: Section) -> String {
    match section {
        Section::Preloaded => "## Preloaded BBC Articles Analysis\n\n".to_string(),
        Section::Custom => "## Custom BBC Article Analysis\n\n".to_string(),
    }
}

/// Render one article: heading, link, then either results or the error.
///
/// In the preloaded list only analyzed articles get a closing rule.
pub fn article_block(outcome: &ArticleOutcome, section: Section) -> String {
    let mut out = String::new();
    if section == Section::Preloaded {
        out.push_str(&format!("### {}\n\n", outcome.source.title));
    }
    out.push_str(&format!("[Read the article]({})", outcome.source.url));
    if let Some(tag) = outcome.source.source_tag() {
        out.push_str(&format!(" ({tag})"));
    }
    out.push_str("\n\n");

    match &outcome.result {
        Ok(analysis) => {
            if let Some(title) = &analysis.page_title {
                out.push_str(&format!("*{title}*\n\n"));
            }
            if let Some(e) = &analysis.summary.error {
                out.push_str(&format!("> Error in summarization: {e}\n\n"));
            }
            if let Some(e) = &analysis.sentiment.error {
                out.push_str(&format!("> Error in sentiment analysis: {e}\n\n"));
            }
            out.push_str(&format!("**Summary:** {}\n\n", analysis.summary()));
            out.push_str(&format!("**Sentiment:** {}\n\n", analysis.label()));
            out.push_str(&format!(
                "**Importance Score:** {}\n\n",
                format_score(analysis.importance())
            ));
            match section {
                Section::Custom => out.push_str("Analysis complete!\n\n"),
                Section::Preloaded => out.push_str("---\n\n"),
            }
        }
        Err(failure) => {
            if let AnalysisFailure::Extraction(e) = failure {
                out.push_str(&format!("> Error fetching article: {e}\n\n"));
            }
            out.push_str(&format!("> {EXTRACTION_FAILED}\n\n"));
        }
    }
    out
}

/// The batch table. Empty when nothing was analyzed.
pub fn results_table(rows: &[AnalysisResult]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut out = String::from("### Tabulated Results\n\n");
    out.push_str(&format!("| {} |\n", TABLE_COLUMNS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(TABLE_COLUMNS.len())));
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            table_cell(&row.title),
            table_cell(&row.url),
            table_cell(&row.summary),
            row.sentiment_label,
            format_score(row.importance_score),
        ));
    }
    out.push('\n');
    out
}

pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Keep a value on one table line and stop it from splitting columns.
fn table_cell(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    title: &'a str,
    url: &'a str,
    error: String,
}

/// JSON document for a run: analyzed rows plus the articles that failed.
#[derive(Debug, Serialize)]
struct Report<'a> {
    results: Vec<AnalysisResult>,
    failures: Vec<FailureRow<'a>>,
}

pub fn json_report(outcomes: &[ArticleOutcome]) -> Result<String, serde_json::Error> {
    let failures = outcomes
        .iter()
        .filter_map(|o| {
            o.result.as_ref().err().map(|e| FailureRow {
                title: &o.source.title,
                url: &o.source.url,
                error: e.to_string(),
            })
        })
        .collect();
    let report = Report {
        results: table_rows(outcomes),
        failures,
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, ModelError};
    use crate::models::{
        ArticleAnalysis, ArticleSource, Fallible, SentimentLabel, SentimentScore,
    };

    fn analyzed(title: &str, summary: &str, label: SentimentLabel, conf: f64) -> ArticleOutcome {
        ArticleOutcome {
            source: ArticleSource::new(title, format!("https://www.bbc.com/news/{title}")),
            result: Ok(ArticleAnalysis {
                page_title: None,
                summary: Fallible::ok(summary.to_string()),
                sentiment: Fallible::ok(SentimentScore::from_confidence(label, conf)),
            }),
        }
    }

    fn failed(title: &str, failure: AnalysisFailure) -> ArticleOutcome {
        ArticleOutcome {
            source: ArticleSource::new(title, "https://www.bbc.com/news/missing"),
            result: Err(failure),
        }
    }

    #[test]
    fn test_banner_has_title() {
        assert!(banner().starts_with("# BBC News Article Analysis"));
    }

    #[test]
    fn test_article_block_success() {
        let block = article_block(
            &analyzed("a1", "Water found on moon.", SentimentLabel::Positive, 0.87),
            Section::Preloaded,
        );
        assert!(block.starts_with("### a1\n"));
        assert!(block.contains("[Read the article](https://www.bbc.com/news/a1) (bbc)"));
        assert!(block.contains("**Summary:** Water found on moon."));
        assert!(block.contains("**Sentiment:** POSITIVE"));
        assert!(block.contains("**Importance Score:** 87.00"));
        assert!(block.ends_with("---\n\n"));
        assert!(!block.contains("Analysis complete!"));
    }

    #[test]
    fn test_article_block_custom_success() {
        let block = article_block(
            &analyzed("c", "Summary.", SentimentLabel::Negative, 0.42),
            Section::Custom,
        );
        assert!(!block.contains("### c"));
        assert!(block.contains("**Importance Score:** -42.00"));
        assert!(block.contains("Analysis complete!"));
    }

    #[test]
    fn test_article_block_extraction_failure() {
        let outcome = failed(
            "gone",
            AnalysisFailure::Extraction(ExtractError::Status {
                status: 404,
                url: "https://www.bbc.com/news/missing".into(),
            }),
        );
        let block = article_block(&outcome, Section::Preloaded);
        assert!(block.contains("Error fetching article: HTTP 404"));
        assert!(block.contains(EXTRACTION_FAILED));
        assert!(!block.contains("**Summary:**"));
        assert!(!block.contains("---"));
    }

    #[test]
    fn test_article_block_too_short_has_only_generic_message() {
        let block = article_block(&failed("s", AnalysisFailure::TooShort { chars: 50 }), Section::Custom);
        assert!(block.contains(EXTRACTION_FAILED));
        assert!(!block.contains("Error fetching article"));
    }

    #[test]
    fn test_article_block_shows_degradations() {
        let outcome = ArticleOutcome {
            source: ArticleSource::new("d", "https://www.bbc.com/news/d"),
            result: Ok(ArticleAnalysis {
                page_title: Some("Headline".into()),
                summary: Fallible::degraded(
                    "Summary generation failed.".into(),
                    ModelError::Empty("summary"),
                ),
                sentiment: Fallible::degraded(
                    SentimentScore::unavailable(),
                    ModelError::Empty("sentiment label"),
                ),
            }),
        };
        let block = article_block(&outcome, Section::Preloaded);
        assert!(block.contains("*Headline*"));
        assert!(block.contains("Error in summarization:"));
        assert!(block.contains("Error in sentiment analysis:"));
        assert!(block.contains("**Sentiment:** N/A"));
        assert!(block.contains("**Importance Score:** 0.00"));
        assert!(block.ends_with("---\n\n"));
    }

    #[test]
    fn test_article_block_uk_link_tag() {
        let outcome = ArticleOutcome {
            source: ArticleSource::new("uk", "https://www.bbc.co.uk/news/uk-1"),
            result: Err(AnalysisFailure::TooShort { chars: 0 }),
        };
        let block = article_block(&outcome, Section::Preloaded);
        assert!(block.contains("(https://www.bbc.co.uk/news/uk-1) (bbc)"));
    }

    #[test]
    fn test_results_table() {
        let outcomes = vec![
            analyzed("one", "First | summary\nwith newline", SentimentLabel::Positive, 0.5),
            failed("two", AnalysisFailure::TooShort { chars: 3 }),
            analyzed("three", "Third.", SentimentLabel::Negative, 0.25),
        ];
        let table = results_table(&table_rows(&outcomes));
        let lines: Vec<&str> = table.lines().filter(|l| l.starts_with('|')).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Title | URL | Summary | Sentiment | Importance Score |");
        assert!(lines[2].contains("First \\| summary with newline"));
        assert!(lines[3].ends_with("| NEGATIVE | -25.00 |"));
    }

    #[test]
    fn test_results_table_empty() {
        assert_eq!(results_table(&[]), "");
    }

    #[test]
    fn test_json_report() {
        let outcomes = vec![
            analyzed("one", "S.", SentimentLabel::Positive, 0.87),
            failed("two", AnalysisFailure::TooShort { chars: 10 }),
        ];
        let json: serde_json::Value = serde_json::from_str(&json_report(&outcomes).unwrap()).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["importance_score"], 87.0);
        assert_eq!(json["results"][0]["sentiment_label"], "POSITIVE");
        assert_eq!(json["failures"][0]["title"], "two");
    }
}
