//! Records passed between pipeline stages.
//!
//! Each record is produced by exactly one stage and handed by value to the
//! next. None of them is mutated after construction.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Where the text of a [`ContentRecord`] came from.
///
/// The url is carried by the variants that have one, so a direct-text record
/// can never hold a url and a fetched record always does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// Text supplied directly by the user.
    DirectText,
    /// Paragraph text of a web article.
    Article { url: String },
    /// Concatenated transcript of a video.
    VideoTranscript { url: String, video_id: String },
}

impl Source {
    /// Source url, absent for direct text.
    pub fn url(&self) -> Option<&str> {
        match self {
            Source::DirectText => None,
            Source::Article { url } | Source::VideoTranscript { url, .. } => Some(url),
        }
    }

    /// Human readable name of the source kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Source::DirectText => "direct text",
            Source::Article { .. } => "article",
            Source::VideoTranscript { .. } => "video transcript",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Raw text obtained by the content resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRecord {
    text: String,
    source: Source,
}

impl ContentRecord {
    /// Creates a record, returning `None` when `text` is empty.
    pub fn new(text: String, source: Source) -> Option<Self> {
        if text.is_empty() { None } else { Some(Self { text, source }) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.url()
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Markdown bullet points produced by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    /// Markdown summary exactly as returned by the generator.
    pub points: String,
    /// Kind of source the summary was derived from.
    pub source_type: String,
    /// Character count of the summarized content.
    pub character_count: usize,
}

impl SummaryRecord {
    /// Builds the summary record for `content`.
    pub fn from_content(content: &ContentRecord, points: String) -> Self {
        Self { points, source_type: content.source().kind_name().to_string(), character_count: content.char_count() }
    }
}

/// One actionable task extracted from a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub text: String,
}

impl ActionItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Confirmation of a calendar event created for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledEvent {
    pub action: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Link to the event, only when the calendar returned one.
    pub event_link: Option<String>,
}

impl ScheduledEvent {
    /// Creates an event spanning `duration_hours` from `start_time`.
    ///
    /// Returns `None` when the end time falls outside the representable range.
    pub fn new(
        action: String,
        start_time: NaiveDateTime,
        duration_hours: u32,
        event_link: Option<String>,
    ) -> Option<Self> {
        let end_time = start_time.checked_add_signed(Duration::hours(i64::from(duration_hours)))?;
        Some(Self { action, start_time, end_time, event_link })
    }
}
