//! Input classification and content acquisition.
//!
//! [`ContentResolver::resolve`] turns a url or a piece of text into a
//! [`ContentRecord`]. Direct text passes through unchanged; urls are
//! classified as video before the generic http(s) test, since every video url
//! is also an http url.

use std::sync::Arc;

use crate::extract::{ExtractConfig, extract_content};
use crate::fetch::PageFetcher;
use crate::record::{ContentRecord, Source};
use crate::video::{TranscriptApi, extract_video_id, fetch_video_transcript, is_video_url};
use crate::{AgendaError, Result};

/// Returns true when the trimmed input starts with `http://` or `https://`.
///
/// ```rust
/// use agenda_core::is_url;
///
/// assert!(is_url("  https://example.com  "));
/// assert!(!is_url("just some text"));
/// ```
pub fn is_url(input: &str) -> bool {
    let input = input.trim();
    input.starts_with("http://") || input.starts_with("https://")
}

/// Classification of a url before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    Video,
    Article,
}

/// Classifies `url`, video first.
pub fn classify_url(url: &str) -> Result<UrlKind> {
    if is_video_url(url) {
        Ok(UrlKind::Video)
    } else if is_url(url) {
        Ok(UrlKind::Article)
    } else {
        Err(AgendaError::InvalidUrlFormat(url.trim().to_string()))
    }
}

/// Obtains raw text from direct input, article pages and video transcripts.
#[derive(Clone)]
pub struct ContentResolver {
    pages: Arc<dyn PageFetcher>,
    transcripts: Arc<dyn TranscriptApi>,
    extract: ExtractConfig,
}

impl ContentResolver {
    pub fn new(pages: Arc<dyn PageFetcher>, transcripts: Arc<dyn TranscriptApi>) -> Self {
        Self { pages, transcripts, extract: ExtractConfig::default() }
    }

    pub fn with_extract_config(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }

    /// Resolves a url or direct text into a [`ContentRecord`].
    ///
    /// A non-empty url takes precedence over text. Fails with
    /// [`AgendaError::InvalidInput`] when neither is given,
    /// [`AgendaError::InvalidUrlFormat`] for unrecognized urls,
    /// [`AgendaError::FetchFailure`] when acquisition fails and
    /// [`AgendaError::EmptyContent`] when it yields no text.
    pub async fn resolve(&self, url: Option<&str>, text: Option<&str>) -> Result<ContentRecord> {
        let url = url.map(str::trim).filter(|u| !u.is_empty());

        let Some(url) = url else {
            let text = text.filter(|t| !t.is_empty()).ok_or(AgendaError::InvalidInput)?;
            return ContentRecord::new(text.to_string(), Source::DirectText).ok_or(AgendaError::InvalidInput);
        };

        let (text, source) = match classify_url(url)? {
            UrlKind::Video => {
                let video_id = extract_video_id(url).ok_or_else(|| AgendaError::FetchFailure {
                    url: url.to_string(),
                    reason: "could not extract YouTube video ID from URL".to_string(),
                })?;
                tracing::debug!(url, video_id = %video_id, "fetching video transcript");
                let text = fetch_video_transcript(self.transcripts.as_ref(), &video_id)
                    .await
                    .map_err(|e| log_fetch_failure(e, url))?;
                (text, Source::VideoTranscript { url: url.to_string(), video_id })
            }
            UrlKind::Article => {
                tracing::debug!(url, "fetching article");
                let html = self
                    .pages
                    .fetch_page(url)
                    .await
                    .map_err(|e| log_fetch_failure(e, url))?;
                let content = extract_content(&html, &self.extract).map_err(|e| log_fetch_failure(e, url))?;
                (content.text, Source::Article { url: url.to_string() })
            }
        };

        let source_kind = source.kind_name().to_string();
        let record = ContentRecord::new(text, source)
            .ok_or_else(|| AgendaError::EmptyContent { source_kind, url: url.to_string() })?;

        tracing::info!(url, source = %record.source(), chars = record.char_count(), "content resolved");
        Ok(record)
    }
}

fn log_fetch_failure(err: AgendaError, url: &str) -> AgendaError {
    let err = err.into_fetch_failure(url);
    tracing::error!(url, error = %err, "content acquisition failed");
    err
}
