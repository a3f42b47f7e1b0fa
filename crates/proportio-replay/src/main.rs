//! proportio-replay: replay a scripted ruler session and print the result.
//!
//! Feeds a JSON list of session commands through the proportio engine,
//! the way an input layer would, and prints the final render snapshot.
//! Useful for:
//!
//! - Reproducing an interaction sequence outside the UI
//! - Checking ratio simplification and lock resync on real geometry
//! - Producing golden snapshots for renderer tests
//!
//! # Usage
//!
//! ```text
//! cargo run --bin proportio-replay -- [OPTIONS] <SCRIPT_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use proportio_core::{FixedClock, SessionConfig, SystemClock};

use crate::script::{Replay, ReplayError, Script};

/// Replay a scripted proportio session.
///
/// The script is a JSON array of commands, or an object with `commands`
/// and an optional `config`.
#[derive(Parser)]
#[command(name = "proportio-replay", version)]
struct Cli {
    /// Path to the JSON command script.
    script_path: PathBuf,

    /// Image whose dimensions are loaded before the first command
    /// (PNG, JPEG, BMP, WebP). Only the header is read.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Full session config as a JSON string.
    ///
    /// Overrides any `config` in the script. The JSON must be a valid
    /// `SessionConfig` serialization; missing fields take defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Timestamp every lock with this many milliseconds since the Unix
    /// epoch instead of the system clock, for reproducible output.
    #[arg(long)]
    fixed_clock: Option<u64>,

    /// Output the replay as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Pick the session config: `--config-json` first, then the script's
/// own config, then defaults.
fn config_from_cli(cli: &Cli, script: &Script) -> Result<SessionConfig, ReplayError> {
    if let Some(ref json) = cli.config_json {
        return Ok(serde_json::from_str(json)?);
    }
    Ok(script.config().cloned().unwrap_or_default())
}

fn run(cli: &Cli) -> Result<Replay, ReplayError> {
    let script = script::load(&cli.script_path)?;
    let config = config_from_cli(cli, &script)?;
    let image = cli
        .image
        .as_deref()
        .map(script::probe_image)
        .transpose()?;

    log::info!(
        "replaying {} command(s) from {}",
        script.commands().len(),
        cli.script_path.display(),
    );

    match cli.fixed_clock {
        Some(millis) => script::replay(&script, config, image, FixedClock(millis)),
        None => script::replay(&script, config, image, SystemClock),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let replay = match run(&cli) {
        Ok(replay) => replay,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&replay) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing replay: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", replay.report());
    }

    ExitCode::SUCCESS
}
