use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let run = clap::Command::new("run")
        .about("Run the full workflow: summarize, extract actions, and schedule")
        .arg(clap::arg!(-u --url <URL> "URL to an article or YouTube video"))
        .arg(clap::arg!(-t --text <TEXT> "Direct text input"))
        .arg(clap::arg!(--"auto-schedule" "Schedule every action at the default time without asking"))
        .arg(clap::arg!(--json "Print the final report as JSON on stdout"))
        .arg(clap::arg!(-v --verbose "Enable debug logging on stderr"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").value_parser(clap::value_parser!(u64)))
        .arg(clap::arg!(--duration <HOURS> "Event duration in hours").value_parser(clap::value_parser!(u32).range(1..=24 * 365)));

    let mut cmd = clap::Command::new("agenda")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Information-to-action agent")
        .subcommand_required(true)
        .subcommand(clap::Command::new("ping").about("Check that the CLI is installed"))
        .subcommand(run);

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "agenda", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "agenda", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "agenda", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "agenda", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
