//! Calendar event creation.
//!
//! [`CalendarApi`] is the seam the scheduler creates events through;
//! [`GoogleCalendar`] implements it with the Google Calendar v3 REST API.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::auth::CalendarSession;
use crate::{AgendaError, Result};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// One endpoint of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// Naive wall time, serialized as `YYYY-MM-DDTHH:MM:SS`.
    #[serde(with = "naive_iso")]
    pub date_time: NaiveDateTime,
    pub time_zone: String,
}

/// Event creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    /// Event title.
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// The calendar's answer to an event creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
}

/// Calendar capability.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Creates `event` in `calendar_id`.
    ///
    /// Rejected credentials must surface as [`AgendaError::CalendarAuthFailure`].
    async fn create_event(
        &self,
        session: &CalendarSession,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<CreatedEvent>;
}

/// [`CalendarApi`] backed by Google Calendar v3.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleCalendar {
    pub fn new() -> Self {
        Self::with_base_url(CALENDAR_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

impl Default for GoogleCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendar {
    async fn create_event(
        &self,
        session: &CalendarSession,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<CreatedEvent> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(session.access_token())
            .json(event)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AgendaError::CalendarAuthFailure("token expired or revoked".to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgendaError::UnexpectedResponse(format!("calendar API {}: {}", status.as_u16(), body)));
        }

        Ok(resp.json().await?)
    }
}

mod naive_iso {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}
