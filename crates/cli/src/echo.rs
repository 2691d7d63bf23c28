use agenda_core::{ContentRecord, START_TIME_FORMAT};
use chrono::NaiveDateTime;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Agenda".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Summarize content, extract tasks, schedule them\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "═".repeat(60).dimmed());
    println!("{}", title.bold().cyan());
    println!("{}", "═".repeat(60).dimmed());
}

/// Print where the content came from
pub fn print_content_details(content: &ContentRecord) {
    print_success(&format!(
        "Extracted {} characters from {}",
        content.char_count(),
        content.source().kind_name()
    ));
    if let Some(url) = content.source_url() {
        eprintln!("  {} {}", "Source:".dimmed(), url.bright_white().underline());
    }
}

/// Print the numbered action table
pub fn print_action_table(actions: &[String]) {
    print_section("Extracted Actionable Tasks");
    println!("  {:>3}  {}", "#".dimmed(), "Action".bold().magenta());
    println!("  {}", "─".repeat(56).dimmed());
    for (i, action) in actions.iter().enumerate() {
        println!("  {:>3}  {}", (i + 1).to_string().dimmed(), action);
    }
    println!();
}

/// Format a start time for display and prompts
pub fn format_time(time: &NaiveDateTime) -> String {
    time.format(START_TIME_FORMAT).to_string()
}
