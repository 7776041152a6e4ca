mod event;
mod preferences;
mod session;
mod summary;
mod transcript;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use session::Session;
use std::io::{self, Read};
use std::process;
use types::{CommonInput, HookInput};

/// Records subagent lifecycle events from Claude Code hook notifications
/// and maintains a per-session activity summary.
#[derive(Debug, Parser)]
#[command(name = "agentlog")]
struct Cli {
    /// Capture every raw hook notification verbatim to
    /// `.agentlog/raw-input.jsonl`.
    #[arg(long)]
    debug: bool,
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn run(cli: &Cli, input: &str) -> Result<()> {
    let hook: HookInput = serde_json::from_str(input).context("parsing hook input")?;

    let common = match &hook {
        HookInput::SubagentStart(e) => e.common.clone(),
        HookInput::SubagentStop(e) => e.common.clone(),
        // The host emits many other event kinds; none are ours to record.
        // `--debug` still captures them for diagnosis.
        HookInput::Other => {
            if cli.debug {
                let common: CommonInput =
                    serde_json::from_str(input).context("parsing common fields")?;
                Session::open(common.working_dir(), common.session())?
                    .capture_raw(input)?;
            }
            return Ok(());
        }
    };

    let session = Session::open(common.working_dir(), common.session())?;
    if cli.debug || session.prefs.capture_raw {
        session.capture_raw(input)?;
    }
    match &hook {
        HookInput::SubagentStart(e) => session.record_start(e),
        HookInput::SubagentStop(e) => session.record_stop(e),
        HookInput::Other => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    let input = read_stdin().expect("Failed to read stdin");

    if let Err(err) = run(&cli, &input) {
        eprintln!("agentlog: {err:#}");
        process::exit(2);
    }
}
