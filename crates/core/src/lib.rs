pub mod actions;
pub mod agent;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod parse;
pub mod preprocess;
pub mod record;
pub mod resolve;
pub mod schedule;
pub mod summarize;
pub mod video;

pub use actions::{ActionExtractor, MAX_ACTIONS, parse_actions};
pub use agent::{Agent, Capabilities, ScheduleOutcome};
pub use auth::{CalendarSession, CredentialProvider, StaticToken, StoredToken, TokenFileProvider};
pub use calendar::{CalendarApi, CreatedEvent, EventRequest, EventTime, GoogleCalendar};
pub use config::{AgentConfig, AgentConfigBuilder};
pub use error::{AgendaError, ErrorKind, Result};
#[doc(hidden)]
pub use extract::{Container, ExtractConfig, ExtractedContent};
pub use extract::extract_content;
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher, fetch_url};
pub use generate::{GeminiClient, TextGenerator};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use record::{ActionItem, ContentRecord, ScheduledEvent, Source, SummaryRecord};
pub use resolve::{ContentResolver, UrlKind, classify_url, is_url};
pub use schedule::{
    START_TIME_FORMAT, ScheduleConfig, Scheduler, StartTime, StartTimeFallback, default_start_time, resolve_start_time,
    resolve_start_time_now,
};
pub use summarize::Summarizer;
pub use video::{
    PREFERRED_LANGUAGES, TranscriptApi, TranscriptSegment, TranscriptTrack, YouTubeTranscripts, extract_video_id,
    fetch_video_transcript, is_video_url,
};
