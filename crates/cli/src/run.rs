use std::io::{self, BufRead, Write};

use agenda_core::{
    Agent, AgentConfig, ScheduleOutcome, Source, StartTimeFallback, SummaryRecord, default_start_time, is_url,
    resolve_start_time_now,
};
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::RunArgs;
use crate::echo::{
    format_time, print_action_table, print_banner, print_content_details, print_error, print_info, print_section,
    print_step, print_success, print_warning,
};

const TOTAL_STEPS: usize = 4;

/// Line-based prompts on stderr, answers read from `input`.
pub struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Asks `question` and returns the trimmed answer, or `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        eprint!("{} ", question.bold());
        io::stderr().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question defaulting to yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [Y/n]", question))?;
        Ok(answer.as_deref().is_none_or(is_yes))
    }
}

fn is_yes(answer: &str) -> bool {
    !answer.to_lowercase().starts_with('n')
}

#[derive(Serialize)]
struct RunReport<'a> {
    source: &'a Source,
    summary: &'a SummaryRecord,
    actions: &'a [String],
    events: Vec<EventReport>,
}

#[derive(Serialize)]
struct EventReport {
    action: String,
    start_time: String,
    scheduled: bool,
    end_time: Option<String>,
    event_link: Option<String>,
    error: Option<String>,
}

impl From<ScheduleOutcome> for EventReport {
    fn from(outcome: ScheduleOutcome) -> Self {
        let start_time = format_time(&outcome.start_time);
        match outcome.result {
            Ok(event) => Self {
                action: outcome.action,
                start_time,
                scheduled: true,
                end_time: Some(format_time(&event.end_time)),
                event_link: event.event_link,
                error: None,
            },
            Err(e) => Self {
                action: outcome.action,
                start_time,
                scheduled: false,
                end_time: None,
                event_link: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Splits the user input into (url, text), prompting when neither flag was given.
///
/// Returns `None` when the prompted input is empty.
fn read_input<R: BufRead>(
    args: &RunArgs,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<Option<(Option<String>, Option<String>)>> {
    let url = args.url.clone().filter(|u| !u.trim().is_empty());
    let text = args.text.clone().filter(|t| !t.is_empty());
    if url.is_some() || text.is_some() {
        return Ok(Some((url, text)));
    }

    eprintln!("{}", "Enter one of the following:".dimmed());
    eprintln!("{}", "  1. Direct text you want summarized".dimmed());
    eprintln!("{}", "  2. URL to an online article".dimmed());
    eprintln!("{}", "  3. URL to a YouTube video".dimmed());

    let input = prompter.ask("Your input:").context("Failed to read input")?.unwrap_or_default();
    if input.is_empty() {
        return Ok(None);
    }
    if is_url(&input) { Ok(Some((Some(input), None))) } else { Ok(Some((None, Some(input)))) }
}

/// Asks per action whether to schedule it and when.
fn confirm_actions<R: BufRead>(
    actions: &[String],
    prompter: &mut Prompter<R>,
) -> anyhow::Result<Vec<(String, NaiveDateTime)>> {
    let mut confirmed = Vec::new();

    for (i, action) in actions.iter().enumerate() {
        eprintln!("\n{} {}", format!("Action {}/{}:", i + 1, actions.len()).bold().yellow(), action);
        if !prompter.confirm("Do you want to schedule this action?")? {
            continue;
        }

        let default = format_time(&default_start_time(Local::now().naive_local()));
        let answer = prompter.ask(&format!("Enter start time [{}]:", default))?;
        let start = resolve_start_time_now(answer.as_deref());
        match start.fallback {
            Some(StartTimeFallback::InPast) => print_warning("Time is in the past. Using default time."),
            Some(StartTimeFallback::Unparsable) => print_warning("Invalid format. Using default time (today 10:00)."),
            Some(StartTimeFallback::Missing) | None => {}
        }

        print_success(&format!("Scheduled for {}", format_time(&start.time)));
        confirmed.push((action.clone(), start.time));
    }

    Ok(confirmed)
}

fn report_outcome(outcome: &ScheduleOutcome) {
    match &outcome.result {
        Ok(event) => match &event.event_link {
            Some(link) => print_success(&format!("Event created: {}", link)),
            None => print_success(&format!("Event created for {}", format_time(&event.start_time))),
        },
        Err(e) => print_error(&format!("Failed to schedule action: {}", e)),
    }
}

/// Runs the whole workflow: acquire, summarize, extract, schedule.
pub async fn run(args: &RunArgs, mut config: AgentConfig) -> anyhow::Result<()> {
    if let Some(timeout) = args.timeout {
        config.fetch.timeout = timeout;
    }
    if let Some(hours) = args.duration {
        config.schedule.duration_hours = hours;
    }

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock());

    let Some((url, text)) = read_input(args, &mut prompter)? else {
        print_warning("Empty input. Exiting.");
        return Ok(());
    };

    let agent = Agent::from_config(&config).context("Failed to initialise agent")?;

    print_step(1, TOTAL_STEPS, "Fetching content");
    let content = agent
        .process_content(url.as_deref(), text.as_deref())
        .await
        .context("Failed to process content")?;
    print_content_details(&content);

    print_step(2, TOTAL_STEPS, "Summarizing text");
    let summary = agent.summarize(&content).await.context("Failed to summarize")?;
    if !args.json {
        print_section("Summary Points");
        println!("{}\n", summary.points);
    }

    print_step(3, TOTAL_STEPS, "Extracting actionable tasks");
    let actions = agent.extract_actions(&summary).await.context("Failed to extract actions")?;
    if actions.is_empty() {
        print_warning("No actionable tasks found.");
    } else if !args.json {
        print_action_table(&actions);
    }

    print_step(4, TOTAL_STEPS, "Scheduling actions");
    let confirmed = if args.auto_schedule {
        let start = default_start_time(Local::now().naive_local());
        print_warning(&format!("Auto-scheduling all actions for default time ({})", format_time(&start)));
        actions.iter().map(|a| (a.clone(), start)).collect()
    } else {
        confirm_actions(&actions, &mut prompter)?
    };

    let outcomes = if confirmed.is_empty() {
        print_warning("No actions scheduled.");
        Vec::new()
    } else {
        agent.schedule_all(confirmed).await
    };

    outcomes.iter().for_each(report_outcome);
    let failed = outcomes.iter().filter(|o| !o.is_scheduled()).count();
    if failed > 0 {
        print_warning(&format!("Scheduled {} of {} actions", outcomes.len() - failed, outcomes.len()));
    }

    if args.json {
        let report = RunReport {
            source: content.source(),
            summary: &summary,
            actions: &actions,
            events: outcomes.into_iter().map(EventReport::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize report")?);
    }

    print_success("Processing complete.");
    Ok(())
}
