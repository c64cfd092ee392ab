/*!
 * Encyclopedia summaries from a MediaWiki site (Wikipedia by default).
 *
 * The query is first resolved to a page title with the `opensearch` action
 * (auto-suggest), then the REST summary endpoint provides the lead extract and the
 * canonical page URL.
 */

use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::app_config::EncyclopediaConfig;
use crate::errors::LookupError;

/// A short page summary
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    /// Resolved page title
    pub title: String,
    /// First sentences of the lead section
    pub summary: String,
    /// Canonical page URL
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PageUrls,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: String,
}

/// Client for the encyclopedia APIs
#[derive(Debug)]
pub struct Encyclopedia {
    client: Client,
    endpoint: Url,
    sentences: usize,
}

impl Encyclopedia {
    /// Create a client for the wiki at `endpoint`
    pub fn new(endpoint: &str, sentences: usize, timeout: Duration) -> Result<Self, LookupError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| LookupError::Request(format!("invalid endpoint {}: {}", endpoint, e)))?;

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!("signgloss/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            endpoint,
            sentences,
        })
    }

    pub fn from_config(config: &EncyclopediaConfig) -> Result<Self, LookupError> {
        Self::new(&config.endpoint, config.sentences, Duration::from_secs(config.timeout_secs))
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Request(format!("endpoint cannot be a base: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Best matching page title for `query`
    pub async fn suggest_title(&self, query: &str) -> Result<String, LookupError> {
        let mut url = self.api_url(&["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("search", query)
            .append_pair("limit", "1")
            .append_pair("namespace", "0")
            .append_pair("format", "json");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Request(format!("search returned {}", response.status())));
        }

        // [query, [titles], [descriptions], [urls]]
        let body: serde_json::Value = response.json().await?;
        body.get(1)
            .and_then(|titles| titles.get(0))
            .and_then(|title| title.as_str())
            .map(str::to_string)
            .ok_or_else(|| LookupError::NotFound(query.to_string()))
    }

    /// Summary of the page titled `title`, following redirects
    pub async fn page_summary(&self, title: &str) -> Result<PageSummary, LookupError> {
        let page_key = title.replace(' ', "_");
        let url = self.api_url(&["api", "rest_v1", "page", "summary", &page_key])?;

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(LookupError::NotFound(title.to_string())),
            status if !status.is_success() => {
                return Err(LookupError::Request(format!("summary returned {}", status)));
            }
            _ => {}
        }

        let body: SummaryResponse = response.json().await?;
        if body.page_type == "disambiguation" {
            return Err(LookupError::NotFound(format!("{} (ambiguous)", title)));
        }

        let summary = first_sentences(&body.extract, self.sentences);
        if summary.is_empty() {
            return Err(LookupError::NotFound(title.to_string()));
        }

        let url = body.content_urls
            .map(|urls| urls.desktop.page)
            .ok_or_else(|| LookupError::Parse("summary has no page URL".to_string()))?;

        Ok(PageSummary {
            title: if body.title.is_empty() { title.to_string() } else { body.title },
            summary,
            url,
        })
    }

    /// Auto-suggested title lookup followed by the page summary
    pub async fn lookup(&self, query: &str) -> Result<PageSummary, LookupError> {
        let title = self.suggest_title(query).await?;
        debug!("Encyclopedia title for '{}': {}", query, title);
        self.page_summary(&title).await
    }
}

/// The first `count` sentences of `text`
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    if count == 0 || text.is_empty() {
        return String::new();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return text[..index + c.len_utf8()].to_string();
                }
            }
        }
    }

    text.to_string()
}
