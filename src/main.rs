//! # News Pulse
//!
//! Fetches a news article, extracts its body text, produces a short
//! abstractive summary, and turns the article's sentiment polarity into a
//! signed "importance score".
//!
//! ## Usage
//!
//! ```sh
//! news_pulse preloaded
//! news_pulse url https://www.bbc.com/news/technology-66804779
//! news_pulse            # interactive prompt
//! ```
//!
//! ## Architecture
//!
//! Each article goes through one straight-line pipeline:
//! 1. **Extraction**: download the page and pull out the article text
//! 2. **Gate**: texts under 100 characters are skipped
//! 3. **Summarization**: first 1024 words, 30–130 token summary, greedy decoding
//! 4. **Sentiment**: first 512 characters, label and signed confidence
//!
//! Articles are processed one at a time; nothing runs concurrently.

use clap::Parser;
use std::error::Error;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod extractor;
mod models;
mod pipeline;
mod render;
mod sentiment;
mod summarizer;
#[cfg(test)]
mod test_server;
mod utils;

use api::{HostedSentiment, HostedSummarizer, InferenceClient, SentimentModel, SummaryModel};
use cli::{Cli, Mode, OutputFormat};
use extractor::{ArticleExtractor, HttpExtractor};
use models::ArticleSource;
use pipeline::{Analyzer, ArticleOutcome, table_rows};
use render::Section;
use sentiment::SentimentScorer;
use summarizer::Summarizer;

const QUIT_COMMAND: &str = ":quit";
const PRELOADED_COMMAND: &str = ":preloaded";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_pulse starting up");

    let args = Cli::parse();
    debug!(?args.mode, ?args.format, config = ?args.config, "Parsed CLI arguments");

    let config = config::resolve(&args)?;
    info!(
        api_base = %config.api_base,
        summarization_model = %config.summarization_model,
        sentiment_model = %config.sentiment_model,
        authenticated = config.api_token.is_some(),
        "Configuration resolved"
    );

    // ---- Model handles, built once for the whole session ----
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?;
    let inference = InferenceClient::new(client.clone(), &config.api_base, config.api_token.clone());
    let analyzer = Analyzer::new(
        HttpExtractor::new(client),
        Summarizer::new(HostedSummarizer::new(
            inference.clone(),
            &config.summarization_model,
        )),
        SentimentScorer::new(HostedSentiment::new(inference, &config.sentiment_model)),
    );

    let session = Session {
        analyzer,
        format: args.format,
        preloaded: config.preloaded,
    };

    if session.format == OutputFormat::Text {
        emit(&render::banner());
    }
    match args.mode.unwrap_or(Mode::Interactive) {
        Mode::Preloaded => session.run_preloaded().await?,
        Mode::Url { url } => session.run_single(&url).await?,
        Mode::Interactive => session.run_interactive().await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// One interactive session: the analyzer plus how to present its results.
struct Session<E, S, C> {
    analyzer: Analyzer<E, S, C>,
    format: OutputFormat,
    preloaded: Vec<ArticleSource>,
}

impl<E, S, C> Session<E, S, C>
where
    E: ArticleExtractor,
    S: SummaryModel,
    C: SentimentModel,
{
    /// Analyze the preloaded list in order, then print the table.
    #[instrument(level = "info", skip_all, fields(count = self.preloaded.len()))]
    async fn run_preloaded(&self) -> Result<(), Box<dyn Error>> {
        let text = self.format == OutputFormat::Text;
        if text {
            emit(&render::section_heading(Section::Preloaded));
        }

        let outcomes = self
            .analyzer
            .analyze_batch(&self.preloaded, |outcome| {
                if text {
                    emit(&render::article_block(outcome, Section::Preloaded));
                }
            })
            .await;

        self.finish(&outcomes, || render::results_table(&table_rows(&outcomes)))
    }

    /// Analyze one user-supplied URL.
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn run_single(&self, url: &str) -> Result<(), Box<dyn Error>> {
        let source = ArticleSource::new(url, url);
        let result = self.analyzer.analyze(&source.url).await;
        let outcomes = [ArticleOutcome { source, result }];
        self.finish(&outcomes, || {
            render::section_heading(Section::Custom)
                + &render::article_block(&outcomes[0], Section::Custom)
        })
    }

    /// Read URLs from stdin until `:quit` or end of input.
    ///
    /// Each entered line is one explicit request; blank lines are ignored.
    async fn run_interactive(&self) -> Result<(), Box<dyn Error>> {
        let prompt = self.format == OutputFormat::Text;
        if prompt {
            emit(&format!(
                "Enter an article URL to analyze, `{PRELOADED_COMMAND}` for the preloaded \
                 articles, or `{QUIT_COMMAND}` to exit.\n\n"
            ));
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            if prompt {
                emit("url> ");
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match line.trim() {
                "" => continue,
                QUIT_COMMAND => break,
                PRELOADED_COMMAND => self.run_preloaded().await?,
                url => self.run_single(url).await?,
            }
        }
        info!("Interactive session ended");
        Ok(())
    }

    /// Print the closing text section, or the whole run as JSON.
    fn finish(
        &self,
        outcomes: &[ArticleOutcome],
        text_tail: impl FnOnce() -> String,
    ) -> Result<(), Box<dyn Error>> {
        match self.format {
            OutputFormat::Text => emit(&text_tail()),
            OutputFormat::Json => emit(&format!("{}\n", render::json_report(outcomes)?)),
        }
        Ok(())
    }
}

/// Write rendered output to stdout immediately.
fn emit(s: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(s.as_bytes());
    let _ = stdout.flush();
}
