//! The content-to-action pipeline.
//!
//! [`Agent`] wires the four stages together. Each call runs one stage and
//! returns its record; callers decide what to do between stages (showing the
//! summary, confirming actions, picking start times).
//!
//! # Example
//!
//! ```rust,no_run
//! use agenda_core::{Agent, AgentConfig, resolve_start_time_now};
//!
//! # async fn run() -> agenda_core::Result<()> {
//! let agent = Agent::from_config(&AgentConfig::from_env())?;
//! let content = agent.process_content(Some("https://example.com/post"), None).await?;
//! let summary = agent.summarize(&content).await?;
//! for action in agent.extract_actions(&summary).await? {
//!     let start = resolve_start_time_now(None).time;
//!     agent.schedule_action(&action, start).await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::actions::ActionExtractor;
use crate::auth::{CredentialProvider, TokenFileProvider};
use crate::calendar::{CalendarApi, GoogleCalendar};
use crate::config::AgentConfig;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::generate::{GeminiClient, TextGenerator};
use crate::record::{ContentRecord, ScheduledEvent, SummaryRecord};
use crate::resolve::ContentResolver;
use crate::schedule::Scheduler;
use crate::summarize::Summarizer;
use crate::video::{TranscriptApi, YouTubeTranscripts};
use crate::{AgendaError, Result};

/// External capabilities the pipeline runs against.
#[derive(Clone)]
pub struct Capabilities {
    pub pages: Arc<dyn PageFetcher>,
    pub transcripts: Arc<dyn TranscriptApi>,
    pub generator: Arc<dyn TextGenerator>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub calendar: Arc<dyn CalendarApi>,
}

/// Result of scheduling one confirmed action.
#[derive(Debug)]
pub struct ScheduleOutcome {
    pub action: String,
    pub start_time: NaiveDateTime,
    pub result: Result<ScheduledEvent>,
}

/// Facade over the resolver, summarizer, extractor and scheduler.
#[derive(Clone)]
pub struct Agent {
    resolver: ContentResolver,
    summarizer: Summarizer,
    extractor: ActionExtractor,
    scheduler: Scheduler,
}

impl Agent {
    /// Builds an agent from explicit capabilities.
    pub fn new(config: &AgentConfig, caps: Capabilities) -> Self {
        Self {
            resolver: ContentResolver::new(caps.pages, caps.transcripts),
            summarizer: Summarizer::new(caps.generator.clone(), config.model.clone()),
            extractor: ActionExtractor::new(caps.generator, config.model.clone()),
            scheduler: Scheduler::new(caps.credentials, caps.calendar, config.schedule.clone()),
        }
    }

    /// Builds an agent backed by reqwest, YouTube, Gemini and Google Calendar.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let caps = Capabilities {
            pages: Arc::new(HttpFetcher::new(config.fetch.clone())?),
            transcripts: Arc::new(YouTubeTranscripts::new(config.fetch.clone())?),
            generator: Arc::new(GeminiClient::with_base_url(&config.api_key, &config.generation_base_url)?),
            credentials: Arc::new(TokenFileProvider::new(&config.token_path)),
            calendar: Arc::new(GoogleCalendar::new()),
        };
        Ok(Self::new(config, caps))
    }

    /// Resolves a url or direct text into content.
    pub async fn process_content(&self, url: Option<&str>, text: Option<&str>) -> Result<ContentRecord> {
        self.resolver.resolve(url, text).await
    }

    /// Summarizes content into markdown bullet points.
    pub async fn summarize(&self, content: &ContentRecord) -> Result<SummaryRecord> {
        self.summarizer.summarize_content(content).await
    }

    /// Extracts up to five actions from a summary.
    pub async fn extract_actions(&self, summary: &SummaryRecord) -> Result<Vec<String>> {
        self.extractor.extract_actions(&summary.points).await
    }

    /// Schedules one action using the configured duration.
    pub async fn schedule_action(&self, action: &str, start_time: NaiveDateTime) -> Result<ScheduledEvent> {
        self.scheduler.schedule(action, start_time).await
    }

    /// Schedules one action with an explicit duration.
    pub async fn schedule_action_for(
        &self,
        action: &str,
        start_time: NaiveDateTime,
        duration_hours: u32,
    ) -> Result<ScheduledEvent> {
        self.scheduler.schedule_action(action, start_time, duration_hours).await
    }

    /// Schedules confirmed actions one after another.
    ///
    /// A failure for one action is recorded in its outcome and the remaining
    /// actions are still attempted. Events already created stay created.
    pub async fn schedule_all(&self, confirmed: Vec<(String, NaiveDateTime)>) -> Vec<ScheduleOutcome> {
        let mut outcomes = Vec::with_capacity(confirmed.len());
        for (action, start_time) in confirmed {
            let result = self.schedule_action(&action, start_time).await;
            outcomes.push(ScheduleOutcome { action, start_time, result });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            tracing::warn!(failed, total = outcomes.len(), "some actions could not be scheduled");
        }
        outcomes
    }
}

impl ScheduleOutcome {
    pub fn is_scheduled(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&AgendaError> {
        self.result.as_ref().err()
    }
}
