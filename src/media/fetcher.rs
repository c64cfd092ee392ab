/*!
 * Remote sign dictionary fetcher.
 *
 * Looks a word up on a sign dictionary site, scans the returned page for a video
 * resource and streams it into the media directory as `<WORD>.mp4`. Every failure
 * ends up as `None` at the `SignFetcher` boundary; callers treat it as "not found".
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app_config::FetcherConfig;
use crate::errors::FetchError;
use crate::file_utils::FileManager;

static VIDEO_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<video\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).expect("video pattern is valid")
});

static VIDEO_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<video\b.*?</video\s*>").expect("video block pattern is valid")
});

static SOURCE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<source\b[^>]*>").expect("source pattern is valid")
});

static SRC_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\ssrc\s*=\s*["']([^"']+)["']"#).expect("src pattern is valid")
});

static TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\stype\s*=\s*["']([^"']+)["']"#).expect("type pattern is valid")
});

/// Something that can bring a sign clip for a word into the local cache
#[async_trait]
pub trait SignFetcher: Send + Sync + Debug {
    /// Fetch the clip for `word`, returning the cached file path or `None`
    async fn fetch(&self, word: &str) -> Option<PathBuf>;
}

/// A fetcher that never finds anything
#[derive(Debug, Default)]
pub struct NoFetcher;

#[async_trait]
impl SignFetcher for NoFetcher {
    async fn fetch(&self, _word: &str) -> Option<PathBuf> {
        None
    }
}

/// Scrapes a remote sign dictionary and downloads clips
#[derive(Debug)]
pub struct ExternalFetcher {
    /// HTTP client with browser-like default headers
    client: Client,
    /// Dictionary base URL; `None` disables fetching
    base_url: Option<Url>,
    /// Search path template with a `{word}` placeholder
    search_path: String,
    /// Courtesy delay before each request
    request_delay: Duration,
    /// Timeout of the search page request
    search_timeout: Duration,
    /// Timeout of the video download
    download_timeout: Duration,
    /// Directory downloads are written to
    media_dir: PathBuf,
}

impl ExternalFetcher {
    /// Create a fetcher writing into `media_dir`
    pub fn new(config: &FetcherConfig, media_dir: impl Into<PathBuf>) -> Self {
        let base_url = if config.base_url.is_empty() {
            None
        } else {
            match Url::parse(&config.base_url) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Invalid sign dictionary URL '{}': {}", config.base_url, e);
                    None
                }
            }
        };

        Self {
            client: Client::builder()
                .default_headers(browser_headers(&config.user_agent))
                .build()
                .unwrap_or_default(),
            base_url,
            search_path: config.search_path.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
            media_dir: media_dir.into(),
        }
    }

    /// Whether a dictionary is configured
    pub fn is_available(&self) -> bool {
        self.base_url.is_some()
    }

    fn base_url(&self) -> Result<&Url, FetchError> {
        self.base_url
            .as_ref()
            .ok_or_else(|| FetchError::Unavailable("no sign dictionary configured".to_string()))
    }

    /// Search page URL for `word` (lowercased and URL-encoded)
    pub fn search_url(&self, word: &str) -> Result<Url, FetchError> {
        let encoded: String = url::form_urlencoded::byte_serialize(word.to_lowercase().as_bytes()).collect();
        let path = self.search_path.replace("{word}", &encoded);
        self.base_url()?
            .join(&path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Find the absolute URL of the sign video for `word`
    pub async fn find_video_url(&self, word: &str) -> Result<Url, FetchError> {
        let search_url = self.search_url(word)?;

        tokio::time::sleep(self.request_delay).await;
        let response = self.client
            .get(search_url.clone())
            .timeout(self.search_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let src = extract_video_src(&html).ok_or_else(|| FetchError::NoVideo(word.to_string()))?;
        resolve_video_url(&search_url, &src)
    }

    /// Stream `url` into `<WORD>.mp4` in the media directory
    pub async fn download(&self, url: &Url, word: &str) -> Result<PathBuf, FetchError> {
        tokio::time::sleep(self.request_delay).await;
        let mut response = self.client
            .get(url.clone())
            .timeout(self.download_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        FileManager::ensure_dir(&self.media_dir)
            .map_err(|e| FetchError::Io(std::io::Error::other(e.to_string())))?;

        let filename = format!("{}.mp4", word.to_uppercase());
        let local_path = self.media_dir.join(&filename);
        let partial_path = self.media_dir.join(format!("{}.part", filename));

        let written: Result<(), FetchError> = async {
            let mut file = tokio::fs::File::create(&partial_path).await?;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial_path).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&partial_path, &local_path).await {
            let _ = tokio::fs::remove_file(&partial_path).await;
            return Err(e.into());
        }
        Ok(local_path)
    }

    /// Search and download, surfacing the failure reason
    pub async fn try_fetch(&self, word: &str) -> Result<PathBuf, FetchError> {
        let video_url = self.find_video_url(word).await?;
        debug!("Found video for {} at {}", word, video_url);
        self.download(&video_url, word).await
    }
}

#[async_trait]
impl SignFetcher for ExternalFetcher {
    async fn fetch(&self, word: &str) -> Option<PathBuf> {
        if !self.is_available() {
            return None;
        }

        match self.try_fetch(word).await {
            Ok(path) => {
                info!("Cached sign video: {:?}", path);
                Some(path)
            }
            Err(FetchError::NoVideo(_)) => {
                debug!("No suitable video URL found online for {}", word);
                None
            }
            Err(e) => {
                warn!("Fetching sign for {} failed: {}", word, e);
                None
            }
        }
    }
}

fn browser_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(header::USER_AGENT, value);
    }
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,video/*;q=0.8,*/*;q=0.7"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// Find a video URL in an HTML page.
///
/// A `src` on a `<video>` element wins; otherwise the first `<source>` inside a
/// `<video>` element whose `type` is `video/*`.
pub fn extract_video_src(html: &str) -> Option<String> {
    if let Some(captures) = VIDEO_SRC.captures(html) {
        return Some(decode_entities(&captures[1]));
    }

    for block in VIDEO_BLOCK.find_iter(html) {
        for tag in SOURCE_TAG.find_iter(block.as_str()) {
            let tag = tag.as_str();
            let is_video = TYPE_ATTR
                .captures(tag)
                .is_some_and(|t| t[1].trim().to_lowercase().starts_with("video/"));
            if !is_video {
                continue;
            }
            if let Some(src) = SRC_ATTR.captures(tag) {
                return Some(decode_entities(&src[1]));
            }
        }
    }

    None
}

/// Resolve a possibly relative video URL against the page it came from
pub fn resolve_video_url(base: &Url, src: &str) -> Result<Url, FetchError> {
    base.join(src.trim())
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", src, e)))
}

fn decode_entities(value: &str) -> String {
    value.replace("&amp;", "&")
}
