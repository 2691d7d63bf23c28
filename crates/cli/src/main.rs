use std::fs::{self, OpenOptions};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use agenda_core::AgentConfig;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod echo;
mod run;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const LOG_FILE: &str = "logs/agenda.log";

/// Longest event accepted on the command line, one year.
const MAX_DURATION_HOURS: i64 = 24 * 365;

/// Turn articles, videos and notes into summaries, tasks and calendar events
#[derive(Parser, Debug)]
#[command(name = "agenda")]
#[command(version)]
#[command(about = "Information-to-action agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the CLI is installed
    Ping,

    /// Run the full workflow: summarize, extract actions, and schedule
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// URL to an article or YouTube video
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Direct text input
    #[arg(short, long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Schedule every action at the default time without asking
    #[arg(long)]
    pub auto_schedule: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Event duration in hours
    #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(u32).range(1..=MAX_DURATION_HOURS))]
    pub duration: Option<u32>,
}

/// Installs the tracing subscriber.
///
/// Verbose runs log at debug level to stderr; otherwise records are appended
/// to `logs/agenda.log`. `RUST_LOG` overrides the configured level.
fn init_logging(verbose: bool, level: &str) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn,rustls=warn,h2=warn")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    if verbose {
        builder.with_writer(std::io::stderr).init();
        return Ok(());
    }

    let path = Path::new(LOG_FILE);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ping => {
            println!("pong");
            Ok(())
        }
        Command::Run(args) => {
            dotenv::dotenv().ok();
            let config = AgentConfig::from_env();
            match init_logging(args.verbose, &config.log_level) {
                Ok(()) => run::run(&args, config).await,
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            echo::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
