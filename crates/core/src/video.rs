//! Video url detection and transcript retrieval.
//!
//! [`is_video_url`] recognizes YouTube watch, embed, short and `v/` urls.
//! Transcripts are read through the [`TranscriptApi`] seam; the default
//! implementation, [`YouTubeTranscripts`], reads the caption track list from
//! the watch page and downloads the chosen track as timedtext XML.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::fetch::FetchConfig;
use crate::{AgendaError, Result};

/// Languages requested before falling back to any available transcript.
pub const PREFERRED_LANGUAGES: &[&str] = &["en", "en-US", "en-GB"];

static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.|m\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|shorts/|.+\?v=)?([^&=%\?]{11})",
    )
    .unwrap()
});

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/embed/|/v/|/shorts/|/live/)([0-9A-Za-z_-]{11})").unwrap()
});

/// Returns true when `url` points at a YouTube video.
///
/// ```rust
/// use agenda_core::video::is_video_url;
///
/// assert!(is_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(is_video_url("https://youtu.be/dQw4w9WgXcQ"));
/// assert!(!is_video_url("https://example.com/video"));
/// ```
pub fn is_video_url(url: &str) -> bool {
    VIDEO_URL_RE.is_match(url.trim())
}

/// Extracts the 11 character video id from a video url.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// One caption line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub text: String,
}

/// A transcript available for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTrack {
    pub video_id: String,
    pub language_code: String,
    pub language: String,
    /// Automatically generated captions.
    pub is_generated: bool,
    pub base_url: String,
}

/// Transcript capability.
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    /// Fetches the transcript in the first of `languages` that is available.
    async fn fetch_transcript(&self, video_id: &str, languages: &[&str]) -> Result<Vec<TranscriptSegment>>;

    /// Lists every transcript available for the video, in the order the platform reports them.
    async fn list_transcripts(&self, video_id: &str) -> Result<Vec<TranscriptTrack>>;

    /// Fetches the segments of one listed transcript.
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>>;
}

/// Fetches the transcript text of a video.
///
/// Tries [`PREFERRED_LANGUAGES`] first, then the first transcript in any
/// language. Segments are joined with single spaces.
pub async fn fetch_video_transcript(api: &dyn TranscriptApi, video_id: &str) -> Result<String> {
    let segments = match api.fetch_transcript(video_id, PREFERRED_LANGUAGES).await {
        Ok(segments) if !segments.is_empty() => {
            tracing::debug!(video_id, "fetched English transcript");
            segments
        }
        Ok(_) | Err(_) => {
            tracing::debug!(video_id, "English transcript not available, trying fallback");
            let track = api
                .list_transcripts(video_id)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| AgendaError::TranscriptUnavailable(format!("no transcripts found for video {video_id}")))?;
            tracing::debug!(video_id, language = %track.language_code, "fetching transcript in alternative language");
            api.fetch_track(&track).await?
        }
    };

    let text = segments.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" ");
    tracing::debug!(video_id, chars = text.chars().count(), "transcript extracted");
    Ok(text.trim().to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrackRaw {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrackRaw {
    fn into_track(self, video_id: &str) -> TranscriptTrack {
        let language = self
            .name
            .as_ref()
            .and_then(|n| {
                n.get("simpleText")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| n.pointer("/runs/0/text").and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| self.language_code.clone());

        TranscriptTrack {
            video_id: video_id.to_string(),
            is_generated: self.kind.as_deref() == Some("asr"),
            language_code: self.language_code,
            language,
            base_url: self.base_url,
        }
    }
}

/// [`TranscriptApi`] that reads captions from YouTube over HTTP.
#[derive(Debug, Clone)]
pub struct YouTubeTranscripts {
    client: Client,
    config: FetchConfig,
}

impl YouTubeTranscripts {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = config.client()?;
        Ok(Self { client, config })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.config.user_agent)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgendaError::HttpStatus { status: status.as_u16(), url: url.to_string() });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptApi for YouTubeTranscripts {
    async fn fetch_transcript(&self, video_id: &str, languages: &[&str]) -> Result<Vec<TranscriptSegment>> {
        let tracks = self.list_transcripts(video_id).await?;
        let track = select_track(&tracks, languages).ok_or_else(|| {
            AgendaError::TranscriptUnavailable(format!("no transcript in {} for video {video_id}", languages.join(", ")))
        })?;
        self.fetch_track(track).await
    }

    async fn list_transcripts(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        let page = self.get_text(&format!("https://www.youtube.com/watch?v={video_id}")).await?;
        parse_caption_tracks(&page, video_id)
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
        let xml = self.get_text(&track.base_url).await?;
        Ok(parse_timedtext(&xml))
    }
}

/// Picks the first track matching `languages` in preference order, manual captions before generated ones.
fn select_track<'a>(tracks: &'a [TranscriptTrack], languages: &[&str]) -> Option<&'a TranscriptTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| t.language_code == *lang);
        let first = matching.clone().find(|t| !t.is_generated);
        first.or_else(|| matching.next())
    })
}

/// Reads the `captionTracks` array embedded in a watch page.
fn parse_caption_tracks(page: &str, video_id: &str) -> Result<Vec<TranscriptTrack>> {
    const MARKER: &str = "\"captionTracks\":";

    let Some(start) = page.find(MARKER) else {
        return Err(AgendaError::TranscriptUnavailable(format!("transcripts are disabled for video {video_id}")));
    };

    let json = &page[start + MARKER.len()..];
    let raw: Vec<CaptionTrackRaw> = serde_json::Deserializer::from_str(json)
        .into_iter::<Vec<CaptionTrackRaw>>()
        .next()
        .ok_or_else(|| AgendaError::UnexpectedResponse("empty caption track list".to_string()))??;

    Ok(raw.into_iter().map(|t| t.into_track(video_id)).collect())
}

/// Parses timedtext XML (`<text start=".." dur="..">..</text>`) into segments.
///
/// Timing attributes are ignored; only the caption text is kept.
fn parse_timedtext(xml: &str) -> Vec<TranscriptSegment> {
    let fragment = Html::parse_fragment(xml);
    let Ok(selector) = Selector::parse("text") else {
        return Vec::new();
    };

    fragment
        .select(&selector)
        .filter_map(|el| {
            let text = decode_entities(&el.text().collect::<String>());
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment { text: text.to_string() })
        })
        .collect()
}

/// Timedtext bodies are frequently escaped twice; undo the second layer.
fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ")]
    #[case("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ")]
    #[case("https://m.youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/shorts/dQw4w9WgXcQ")]
    #[case("  https://youtu.be/dQw4w9WgXcQ  ")]
    fn test_video_urls(#[case] url: &str) {
        assert!(is_video_url(url));
        assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[rstest]
    #[case("https://example.com/video")]
    #[case("https://example.com/article")]
    #[case("just text")]
    #[case("")]
    fn test_not_video_urls(#[case] url: &str) {
        assert!(!is_video_url(url));
    }

    #[test]
    fn test_video_id_with_extra_params() {
        let id = extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42s");
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_video_url_without_id() {
        let url = "https://www.youtube.com/user/someone1234";
        assert!(is_video_url(url));
        assert_eq!(extract_video_id(url), None);
    }

    #[test]
    fn test_parse_caption_tracks() {
        let page = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=de","name":{"simpleText":"German"},"languageCode":"de","kind":"asr"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"runs":[{"text":"English"}]},"languageCode":"en"}],"audioTracks":[]}}};</script>"#;

        let tracks = parse_caption_tracks(page, "abc").unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "de");
        assert!(tracks[0].is_generated);
        assert_eq!(tracks[1].language, "English");
        assert_eq!(tracks[1].base_url, "https://www.youtube.com/api/timedtext?v=abc&lang=en");
    }

    #[test]
    fn test_parse_caption_tracks_disabled() {
        let result = parse_caption_tracks("<html>no captions</html>", "abc");
        assert!(matches!(result, Err(AgendaError::TranscriptUnavailable(_))));
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.2">Hello &amp;amp; welcome</text><text start="1.7" dur="2">it&amp;#39;s here</text><text start="4" dur="1">  </text></transcript>"#;

        let segments = parse_timedtext(xml);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello & welcome");
        assert_eq!(segments[1].text, "it's here");
    }

    #[test]
    fn test_select_track_prefers_manual_and_language_order() {
        let track = |code: &str, generated: bool| TranscriptTrack {
            video_id: "v".into(),
            language_code: code.into(),
            language: code.into(),
            is_generated: generated,
            base_url: format!("https://t/{code}/{generated}"),
        };
        let tracks = vec![track("fr", false), track("en-GB", false), track("en", true), track("en", false)];

        let chosen = select_track(&tracks, PREFERRED_LANGUAGES).unwrap();
        assert_eq!(chosen.language_code, "en");
        assert!(!chosen.is_generated);

        assert!(select_track(&tracks, &["de"]).is_none());
    }

    struct FakeTranscripts {
        preferred: Option<Vec<&'static str>>,
        listed: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    fn segments(texts: &[&str]) -> Vec<TranscriptSegment> {
        texts.iter().map(|t| TranscriptSegment { text: t.to_string() }).collect()
    }

    #[async_trait]
    impl TranscriptApi for FakeTranscripts {
        async fn fetch_transcript(&self, _video_id: &str, languages: &[&str]) -> Result<Vec<TranscriptSegment>> {
            self.calls.lock().unwrap().push(format!("fetch:{}", languages.join(",")));
            match &self.preferred {
                Some(texts) => Ok(segments(texts)),
                None => Err(AgendaError::TranscriptUnavailable("no english".into())),
            }
        }

        async fn list_transcripts(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
            self.calls.lock().unwrap().push("list".into());
            Ok(self
                .listed
                .iter()
                .map(|code| TranscriptTrack {
                    video_id: video_id.into(),
                    language_code: code.to_string(),
                    language: code.to_string(),
                    is_generated: false,
                    base_url: String::new(),
                })
                .collect())
        }

        async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
            self.calls.lock().unwrap().push(format!("track:{}", track.language_code));
            Ok(segments(&["Hola", "mundo"]))
        }
    }

    #[tokio::test]
    async fn test_transcript_prefers_english() {
        let api = FakeTranscripts { preferred: Some(vec!["Hello", "world"]), listed: vec![], calls: Mutex::default() };

        let text = fetch_video_transcript(&api, "dQw4w9WgXcQ").await.unwrap();
        assert_eq!(text, "Hello world");
        assert_eq!(*api.calls.lock().unwrap(), vec!["fetch:en,en-US,en-GB"]);
    }

    #[tokio::test]
    async fn test_transcript_falls_back_to_first_listed() {
        let api = FakeTranscripts { preferred: None, listed: vec!["es", "fr"], calls: Mutex::default() };

        let text = fetch_video_transcript(&api, "dQw4w9WgXcQ").await.unwrap();
        assert_eq!(text, "Hola mundo");
        assert_eq!(*api.calls.lock().unwrap(), vec!["fetch:en,en-US,en-GB", "list", "track:es"]);
    }

    #[tokio::test]
    async fn test_transcript_none_available() {
        let api = FakeTranscripts { preferred: None, listed: vec![], calls: Mutex::default() };

        let result = fetch_video_transcript(&api, "dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(AgendaError::TranscriptUnavailable(_))));
    }
}
