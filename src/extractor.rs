//! Article text extraction.
//!
//! Downloads a page and pulls its main body text out with a readability-style
//! heuristic:
//!
//! 1. Try well-known article containers in priority order (`<article>`,
//!    `<main>`, `[role=main]`, common article-body classes). The first one
//!    whose paragraphs add up to a substantial amount of text wins.
//! 2. Otherwise fall back to every `<p>` in the document.
//!
//! Paragraphs nested under navigation, headers, footers, asides, figures,
//! forms, or scripts never count as article text. Only ancestors inside the
//! chosen container (or inside `<body>` on the fallback) are checked, so a
//! page-wide `<form>` wrapper does not hide the article.

use crate::error::ExtractError;
use crate::models::ArticleText;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A container must yield at least this many characters to be trusted over
/// the whole-page fallback.
const SUBSTANTIAL_CHARS: usize = 200;

static CONTAINER_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    [
        "article",
        "main",
        "[role='main']",
        "[itemprop='articleBody']",
        ".article-body",
        ".article__body",
        ".story-body",
        ".post-content",
        ".entry-content",
        "#article-body",
        "#content",
    ]
    .into_iter()
    .map(|s| (s, Selector::parse(s).expect("static selector")))
    .collect()
});

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='og:title']").expect("static selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("static selector"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "figure", "figcaption", "form", "script", "style",
    "noscript",
];

/// Turns a URL into article text.
pub trait ArticleExtractor {
    /// Fetch `url` and return its main text, or why that was impossible.
    async fn extract(&self, url: &str) -> Result<ArticleText, ExtractError>;
}

/// [`ArticleExtractor`] backed by a shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: Client,
}

impl HttpExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ArticleExtractor for HttpExtractor {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract(&self, url: &str) -> Result<ArticleText, ExtractError> {
        let parsed = validate_url(url)?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Article fetch returned non-success status");
            return Err(ExtractError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(ExtractError::NotHtml {
                    content_type: content_type.to_string(),
                    url: url.to_string(),
                });
            }
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), "Downloaded article page");

        match parse_article(&html) {
            Some(article) => {
                info!(
                    chars = article.char_len(),
                    title = ?article.page_title,
                    "Parsed article"
                );
                Ok(article)
            }
            None => {
                warn!(preview = %truncate_for_log(&html, 200), "No article text in page");
                Err(ExtractError::NoContent {
                    url: url.to_string(),
                })
            }
        }
    }
}

/// Accept only absolute `http`/`https` URLs.
pub fn validate_url(url: &str) -> Result<Url, ExtractError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ExtractError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// Extract article text and headline from an HTML document.
///
/// Returns `None` when the page has no paragraph text at all.
pub fn parse_article(html: &str) -> Option<ArticleText> {
    let document = Html::parse_document(html);

    let text = CONTAINER_SELECTORS
        .iter()
        .find_map(|(name, selector)| {
            let container = document.select(selector).next()?;
            let text = paragraphs_text(container.select(&PARAGRAPH), Some(container));
            if text.chars().count() >= SUBSTANTIAL_CHARS {
                debug!(container = %name, "Using article container");
                Some(text)
            } else {
                None
            }
        })
        .unwrap_or_else(|| paragraphs_text(document.select(&PARAGRAPH), None));

    if text.is_empty() {
        return None;
    }

    let mut article = ArticleText::new(text);
    article.page_title = page_title(&document);
    Some(article)
}

fn paragraphs_text<'a>(
    paragraphs: impl Iterator<Item = ElementRef<'a>>,
    container: Option<ElementRef<'a>>,
) -> String {
    paragraphs
        .filter(|p| !in_boilerplate(p, container))
        .map(|p| normalize_whitespace(&p.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .join("\n\n")
}

/// Walks ancestors up to, but not including, `container` or `<body>`.
fn in_boilerplate(element: &ElementRef, container: Option<ElementRef>) -> bool {
    element
        .ancestors()
        .take_while(|node| container.is_none_or(|c| node.id() != c.id()))
        .filter_map(|node| node.value().as_element())
        .take_while(|e| e.name() != "body")
        .any(|e| BOILERPLATE_TAGS.contains(&e.name()))
}

fn page_title(document: &Html) -> Option<String> {
    let og = document
        .select(&OG_TITLE)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(normalize_whitespace);
    let heading = || {
        document
            .select(&H1)
            .chain(document.select(&TITLE))
            .map(|e| normalize_whitespace(&e.text().collect::<String>()))
            .find(|t| !t.is_empty())
    };
    og.filter(|t| !t.is_empty()).or_else(heading)
}

fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}
