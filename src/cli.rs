//! Command-line interface definitions for News Pulse.
//!
//! The two analysis modes map onto subcommands; with no subcommand the tool
//! starts an interactive prompt. Model settings can come from flags,
//! environment variables, or a YAML config file.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the News Pulse application.
///
/// # Examples
///
/// ```sh
/// # Analyze the bundled BBC articles
/// news_pulse preloaded
///
/// # Analyze one article and print JSON
/// news_pulse --format json url https://www.bbc.com/news/technology-66804779
///
/// # Prompt for URLs until :quit
/// news_pulse
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Analysis mode (defaults to interactive)
    #[command(subcommand)]
    pub mode: Option<Mode>,

    /// Optional path to a config.yaml file
    #[arg(short, long, env = "NEWS_PULSE_CONFIG")]
    pub config: Option<String>,

    /// Base URL of the inference service; model ids are appended to it
    #[arg(long, env = "NEWS_PULSE_API_BASE")]
    pub api_base: Option<String>,

    /// Bearer token for the inference service
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Summarization model id
    #[arg(long)]
    pub summarization_model: Option<String>,

    /// Sentiment classification model id
    #[arg(long)]
    pub sentiment_model: Option<String>,

    /// How results are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Which articles to analyze.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Analyze every preloaded article, then print a summary table
    Preloaded,
    /// Analyze a single article URL
    Url {
        /// Article URL
        url: String,
    },
    /// Prompt for URLs; `:preloaded` runs the preloaded set, `:quit` exits
    Interactive,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown-flavoured text
    Text,
    /// One JSON document per run
    Json,
}
