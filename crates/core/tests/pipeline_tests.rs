//! End-to-end pipeline tests against in-memory capabilities
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use agenda_core::*;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 6, 3).unwrap().and_hms_opt(h, m, 0).unwrap()
}

struct Pages(HashMap<String, String>);

#[async_trait]
impl PageFetcher for Pages {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| AgendaError::HttpStatus { status: 404, url: url.to_string() })
    }
}

struct NoTranscripts;

#[async_trait]
impl TranscriptApi for NoTranscripts {
    async fn fetch_transcript(&self, video_id: &str, _languages: &[&str]) -> Result<Vec<TranscriptSegment>> {
        Err(AgendaError::TranscriptUnavailable(video_id.to_string()))
    }

    async fn list_transcripts(&self, _video_id: &str) -> Result<Vec<TranscriptTrack>> {
        Ok(Vec::new())
    }

    async fn fetch_track(&self, _track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
        Ok(Vec::new())
    }
}

/// Answers summary prompts and action prompts with canned text
struct ScriptedGenerator {
    summary: String,
    actions: String,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.starts_with("Summarize") {
            Ok(self.summary.clone())
        } else {
            Ok(self.actions.clone())
        }
    }
}

/// Fails event creation for any action listed in `reject`
#[derive(Default)]
struct RecordingCalendar {
    reject: Vec<&'static str>,
    created: Mutex<Vec<EventRequest>>,
}

#[async_trait]
impl CalendarApi for RecordingCalendar {
    async fn create_event(&self, _session: &CalendarSession, _calendar_id: &str, event: &EventRequest) -> Result<CreatedEvent> {
        if self.reject.contains(&event.summary.as_str()) {
            return Err(AgendaError::UnexpectedResponse("calendar API 500".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(event.clone());
        Ok(CreatedEvent { id: format!("evt{}", created.len()), html_link: Some(format!("https://cal/evt{}", created.len())) })
    }
}

struct Harness {
    agent: Agent,
    generator: Arc<ScriptedGenerator>,
    calendar: Arc<RecordingCalendar>,
}

fn harness(actions: &str, reject: Vec<&'static str>) -> Harness {
    let pages = HashMap::from([
        ("https://example.com/remote".to_string(), fixture("blog_post.html")),
        ("https://example.com/news".to_string(), fixture("news_article.html")),
        ("https://example.com/gallery".to_string(), fixture("no_paragraphs.html")),
    ]);
    let generator = Arc::new(ScriptedGenerator {
        summary: "* One\n* Two\n* Three\n* Four\n* Five".to_string(),
        actions: actions.to_string(),
        prompts: Mutex::default(),
    });
    let calendar = Arc::new(RecordingCalendar { reject, ..Default::default() });

    let caps = Capabilities {
        pages: Arc::new(Pages(pages)),
        transcripts: Arc::new(NoTranscripts),
        generator: generator.clone(),
        credentials: Arc::new(StaticToken("token".to_string())),
        calendar: calendar.clone(),
    };
    let config = AgentConfig::builder().model("test-model").build();

    Harness { agent: Agent::new(&config, caps), generator, calendar }
}

#[tokio::test]
async fn test_article_to_events() {
    let h = harness("1. Start a decision log\n2. Book weekly one-on-ones\n3. Publish working hours", vec![]);

    let content = h.agent.process_content(Some("https://example.com/remote"), None).await.unwrap();
    assert_eq!(content.source().kind_name(), "article");
    assert!(content.text().starts_with("Remote teams succeed when they write things down."));
    assert!(!content.text().contains("Subscribe"));
    assert!(!content.text().contains("Copyright"));

    let summary = h.agent.summarize(&content).await.unwrap();
    assert_eq!(summary.character_count, content.char_count());

    let actions = h.agent.extract_actions(&summary).await.unwrap();
    assert_eq!(actions, vec!["Start a decision log", "Book weekly one-on-ones", "Publish working hours"]);

    let confirmed = actions.iter().map(|a| (a.clone(), at(10, 0))).collect();
    let outcomes = h.agent.schedule_all(confirmed).await;
    assert!(outcomes.iter().all(ScheduleOutcome::is_scheduled));

    let event = outcomes[0].result.as_ref().unwrap();
    assert_eq!(event.end_time, at(11, 0));
    assert_eq!(event.event_link.as_deref(), Some("https://cal/evt1"));

    let prompts = h.generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].ends_with("* One\n* Two\n* Three\n* Four\n* Five"));
}

#[tokio::test]
async fn test_article_tag_wins_over_main() {
    let h = harness("", vec![]);
    let content = h.agent.process_content(Some("https://example.com/news"), None).await.unwrap();

    assert!(content.text().starts_with("The city council voted 7-2"));
    assert!(!content.text().contains("Teaser"));
    assert!(!content.text().contains("Navigation"));
    assert!(!content.text().contains("Short line"));
}

#[tokio::test]
async fn test_page_without_paragraphs_is_empty_content() {
    let h = harness("", vec![]);
    let err = h.agent.process_content(Some("https://example.com/gallery"), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyContent);
}

#[tokio::test]
async fn test_missing_page_is_fetch_failure() {
    let h = harness("", vec![]);
    let err = h.agent.process_content(Some("https://example.com/missing"), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailure);
    assert!(err.to_string().contains("https://example.com/missing"));
}

#[tokio::test]
async fn test_video_without_transcripts_is_fetch_failure() {
    let h = harness("", vec![]);
    let err = h
        .agent
        .process_content(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailure);
}

#[tokio::test]
async fn test_direct_text_pipeline_with_truncation() {
    let h = harness("- a\n- b\n- c\n- d\n- e\n- f\n- g", vec![]);

    let content = h.agent.process_content(None, Some("Plain notes from a meeting.")).await.unwrap();
    assert_eq!(content.source(), &Source::DirectText);

    let summary = h.agent.summarize(&content).await.unwrap();
    let actions = h.agent.extract_actions(&summary).await.unwrap();
    assert_eq!(actions, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_partial_scheduling_keeps_earlier_events() {
    let h = harness("", vec!["Second"]);
    let confirmed = vec![
        ("First".to_string(), at(9, 0)),
        ("Second".to_string(), at(10, 0)),
        ("Third".to_string(), at(11, 0)),
    ];

    let outcomes = h.agent.schedule_all(confirmed).await;
    assert!(outcomes[0].is_scheduled());
    assert_eq!(outcomes[1].error().map(AgendaError::kind), Some(ErrorKind::CalendarApiFailure));
    assert!(outcomes[2].is_scheduled());

    let created = h.calendar.created.lock().unwrap();
    let titles: Vec<&str> = created.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(titles, vec!["First", "Third"]);
}

#[tokio::test]
async fn test_explicit_duration() {
    let h = harness("", vec![]);
    let event = h.agent.schedule_action_for("Call bank", at(15, 0), 2).await.unwrap();
    assert_eq!(event.end_time - event.start_time, Duration::hours(2));
}

#[tokio::test]
async fn test_no_input() {
    let h = harness("", vec![]);
    let err = h.agent.process_content(None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
