//! Typed failure reasons for each pipeline stage.
//!
//! Computation never renders errors itself. Each stage hands back one of
//! these values and [`crate::render`] decides how the user sees it.

use thiserror::Error;

/// Why an article's text could not be obtained.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input was not an absolute `http`/`https` URL.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, connect, TLS, body read, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response declared a content type that is not HTML.
    #[error("unsupported content type `{content_type}` for {url}")]
    NotHtml { content_type: String, url: String },

    /// The page parsed but no article text could be found in it.
    #[error("no article text found at {url}")]
    NoContent { url: String },
}

/// Failure talking to the inference service or decoding its answer.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode inference response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("inference service returned no {0}")]
    Empty(&'static str),

    #[error("unexpected sentiment label `{0}`")]
    UnknownLabel(String),
}

/// Start-up configuration problems. These are the only fatal errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
