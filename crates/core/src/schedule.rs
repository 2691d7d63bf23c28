//! Scheduling confirmed actions as calendar events.
//!
//! Start times are naive local wall times (default: today at 10:00) while the
//! event endpoints are sent with a fixed `UTC` time zone.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, NaiveTime};

use crate::auth::CredentialProvider;
use crate::calendar::{CalendarApi, EventRequest, EventTime};
use crate::record::ScheduledEvent;
use crate::{AgendaError, Result};

/// Format accepted for user supplied start times.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Time zone attached to both event endpoints.
pub const EVENT_TIME_ZONE: &str = "UTC";

/// Why a supplied start time was replaced by the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTimeFallback {
    /// Nothing was supplied.
    Missing,
    /// The input did not match [`START_TIME_FORMAT`].
    Unparsable,
    /// The input parsed to a time before now.
    InPast,
}

/// A resolved start time and, when the default was used, the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTime {
    pub time: NaiveDateTime,
    pub fallback: Option<StartTimeFallback>,
}

/// Today at 10:00 relative to `now`.
pub fn default_start_time(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default())
}

/// Resolves a user supplied start time against `now`.
///
/// Missing, unparsable and past inputs fall back to [`default_start_time`];
/// this never fails.
pub fn resolve_start_time(input: Option<&str>, now: NaiveDateTime) -> StartTime {
    let default = default_start_time(now);
    let fallback = |reason| StartTime { time: default, fallback: Some(reason) };

    let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback(StartTimeFallback::Missing);
    };

    match NaiveDateTime::parse_from_str(input, START_TIME_FORMAT) {
        Ok(time) if time == default => StartTime { time, fallback: None },
        Ok(time) if time < now => fallback(StartTimeFallback::InPast),
        Ok(time) => StartTime { time, fallback: None },
        Err(_) => fallback(StartTimeFallback::Unparsable),
    }
}

/// [`resolve_start_time`] against the current local time.
pub fn resolve_start_time_now(input: Option<&str>) -> StartTime {
    resolve_start_time(input, Local::now().naive_local())
}

/// Settings for created events.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub calendar_id: String,
    pub description: String,
    pub duration_hours: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            description: "Created by agenda from extracted action items".to_string(),
            duration_hours: 1,
        }
    }
}

/// Creates calendar events for confirmed actions.
#[derive(Clone)]
pub struct Scheduler {
    credentials: Arc<dyn CredentialProvider>,
    calendar: Arc<dyn CalendarApi>,
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(credentials: Arc<dyn CredentialProvider>, calendar: Arc<dyn CalendarApi>, config: ScheduleConfig) -> Self {
        Self { credentials, calendar, config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Schedules `action` with the configured duration.
    pub async fn schedule(&self, action: &str, start_time: NaiveDateTime) -> Result<ScheduledEvent> {
        self.schedule_action(action, start_time, self.config.duration_hours).await
    }

    /// Creates an event titled `action` spanning `duration_hours` from `start_time`.
    pub async fn schedule_action(
        &self,
        action: &str,
        start_time: NaiveDateTime,
        duration_hours: u32,
    ) -> Result<ScheduledEvent> {
        let event = ScheduledEvent::new(action.to_string(), start_time, duration_hours, None).ok_or_else(|| {
            let err = AgendaError::CalendarApiFailure {
                action: action.to_string(),
                reason: format!("event end time out of range ({duration_hours}h from {start_time})"),
            };
            tracing::error!(action, error = %err, "invalid event duration");
            err
        })?;

        let session = self.credentials.session().await.map_err(|e| {
            let err = match e {
                err @ AgendaError::CalendarAuthFailure(_) => err,
                other => AgendaError::CalendarAuthFailure(other.to_string()),
            };
            tracing::error!(action, error = %err, "no calendar credential");
            err
        })?;

        let request = EventRequest {
            summary: action.to_string(),
            description: self.config.description.clone(),
            start: EventTime { date_time: event.start_time, time_zone: EVENT_TIME_ZONE.to_string() },
            end: EventTime { date_time: event.end_time, time_zone: EVENT_TIME_ZONE.to_string() },
        };

        let created = self
            .calendar
            .create_event(&session, &self.config.calendar_id, &request)
            .await
            .map_err(|e| {
                let err = match e {
                    err @ AgendaError::CalendarAuthFailure(_) => err,
                    other => AgendaError::CalendarApiFailure { action: action.to_string(), reason: other.to_string() },
                };
                tracing::error!(action, error = %err, "event creation failed");
                err
            })?;

        tracing::info!(action, event_id = %created.id, start = %event.start_time, "event created");
        Ok(ScheduledEvent { event_link: created.html_link, ..event })
    }
}
