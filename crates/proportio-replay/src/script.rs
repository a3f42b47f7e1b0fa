//! Replay scripts: a list of session commands, optionally with a config.

use std::path::{Path, PathBuf};

use proportio_core::{
    Clock, CommandOutcome, Dimensions, Session, SessionCommand, SessionConfig, SessionError,
    SessionSnapshot,
};
use serde::{Deserialize, Serialize};

/// Errors surfaced by the replay tool.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to probe image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A replay script as stored on disk.
///
/// Either a bare JSON array of commands, or an object with `commands`
/// and an optional `config`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Commands(Vec<SessionCommand>),
    Full {
        #[serde(default)]
        config: Option<SessionConfig>,
        commands: Vec<SessionCommand>,
    },
}

impl Script {
    #[must_use]
    pub fn commands(&self) -> &[SessionCommand] {
        match self {
            Self::Commands(commands) | Self::Full { commands, .. } => commands,
        }
    }

    #[must_use]
    pub const fn config(&self) -> Option<&SessionConfig> {
        match self {
            Self::Commands(_) => None,
            Self::Full { config, .. } => config.as_ref(),
        }
    }
}

/// One dispatched command and what it did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub command: SessionCommand,
    pub outcome: CommandOutcome,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Replay {
    pub steps: Vec<Step>,
    pub snapshot: SessionSnapshot,
}

impl Replay {
    /// Human-readable summary of the replay.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Replay Report\n{}", "=".repeat(60)));

        let ignored = self
            .steps
            .iter()
            .filter(|s| s.outcome == CommandOutcome::Ignored)
            .count();
        lines.push(format!(
            "Commands: {} ({ignored} ignored)",
            self.steps.len()
        ));
        lines.push(format!("Mode: {:?}", self.snapshot.mode));
        lines.push(self.snapshot.image.as_ref().map_or_else(
            || "Image: none".to_string(),
            |image| {
                format!(
                    "Image: {}x{} at scale {:.3}",
                    image.dimensions.width, image.dimensions.height, image.transform.scale,
                )
            },
        ));

        lines.push(String::new());
        lines.push(format!(
            "{:<10} {:>10} {:>8} {:>5}  {}",
            "Ruler", "Length", "Angle", "Div", "Flags"
        ));
        lines.push("-".repeat(60));
        for ruler in &self.snapshot.rulers {
            let mut flags = Vec::new();
            if ruler.is_selected() {
                flags.push("selected");
            }
            if ruler.is_compare_selected() {
                flags.push("compare");
            }
            if self.snapshot.highlighted_rulers.contains(&ruler.id()) {
                flags.push("highlight");
            }
            lines.push(format!(
                "{:<10} {:>10.2} {:>8.1} {:>5}  {}",
                ruler.id().to_string(),
                ruler.length(),
                ruler.angle(),
                ruler.divisions(),
                flags.join(", "),
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "{:<10} {:<20} {:>8} {:>8} {:>10}",
            "Lock", "Rulers", "Ratio", "Simple", "Actual"
        ));
        lines.push("-".repeat(60));
        for lock in &self.snapshot.locks {
            let [a, b] = lock.ruler_ids();
            lines.push(format!(
                "{:<10} {:<20} {:>8.3} {:>8} {:>10}",
                lock.id().to_string(),
                format!("{a} / {b}"),
                lock.ratio(),
                lock.simple_ratio(),
                lock.actual_ratio(),
            ));
        }

        lines.join("\n")
    }
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// Returns [`ReplayError::Json`] if the text is not a valid script.
pub fn parse(text: &str) -> Result<Script, ReplayError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] if the file cannot be read and
/// [`ReplayError::Json`] if it is not a valid script.
pub fn load(path: &Path) -> Result<Script, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Read an image file's pixel dimensions without decoding it.
///
/// # Errors
///
/// Returns [`ReplayError::Image`] if the file is missing or not a
/// supported format.
pub fn probe_image(path: &Path) -> Result<Dimensions, ReplayError> {
    let (width, height) = image::image_dimensions(path)?;
    log::debug!("probed {}: {width}x{height}", path.display());
    Ok(Dimensions { width, height })
}

/// Run `script` against a fresh session.
///
/// When `image` is given it is loaded before the first command.
///
/// # Errors
///
/// Returns [`ReplayError::Session`] if `config` is invalid. Individual
/// commands never fail; no-ops are recorded as
/// [`CommandOutcome::Ignored`].
pub fn replay<C: Clock>(
    script: &Script,
    config: SessionConfig,
    image: Option<Dimensions>,
    clock: C,
) -> Result<Replay, ReplayError> {
    let mut session = Session::with_clock(config, clock)?;
    if let Some(dimensions) = image {
        session.load_image(dimensions);
    }

    let steps = script
        .commands()
        .iter()
        .map(|command| {
            let outcome = session.dispatch(command.clone());
            log::debug!("{command:?} -> {outcome:?}");
            Step {
                command: command.clone(),
                outcome,
            }
        })
        .collect();

    Ok(Replay {
        steps,
        snapshot: session.snapshot(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use proportio_core::{FixedClock, InteractionMode, LockId, RulerId};

    use super::*;

    const COMPARE_PAIR: &str = r#"[
        {"type": "add_ruler", "start_point": {"x": 0, "y": 0}, "end_point": {"x": 10, "y": 0}},
        {"type": "add_ruler", "start_point": {"x": 0, "y": 5}, "end_point": {"x": 5, "y": 5}},
        {"type": "toggle_compare", "id": 1},
        {"type": "toggle_compare", "id": 2},
        {"type": "remove_lock", "id": 7}
    ]"#;

    #[test]
    fn bare_array_script_parses() {
        let script = parse(COMPARE_PAIR).unwrap();
        assert_eq!(script.commands().len(), 5);
        assert!(script.config().is_none());
    }

    #[test]
    fn script_with_config_parses() {
        let script = parse(
            r#"{"config": {"auto_lock": false}, "commands": [{"type": "lock_current"}]}"#,
        )
        .unwrap();
        assert_eq!(script.commands(), [SessionCommand::LockCurrent]);
        assert!(!script.config().unwrap().auto_lock);
    }

    #[test]
    fn malformed_script_is_a_json_error() {
        assert!(matches!(parse("{\"commands\": 3}"), Err(ReplayError::Json(_))));
    }

    #[test]
    fn missing_script_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
    }

    #[test]
    fn replay_records_outcomes() {
        let script = parse(COMPARE_PAIR).unwrap();
        let replay = replay(&script, SessionConfig::default(), None, FixedClock(0)).unwrap();
        let outcomes: Vec<CommandOutcome> = replay.steps.iter().map(|s| s.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                CommandOutcome::RulerCreated { id: RulerId(1) },
                CommandOutcome::RulerCreated { id: RulerId(2) },
                CommandOutcome::Applied,
                CommandOutcome::LockCreated { id: LockId(1) },
                CommandOutcome::Ignored,
            ]
        );
        assert_eq!(replay.snapshot.mode, InteractionMode::Comparison);
        assert_eq!(replay.snapshot.locks[0].simple_ratio(), "2:1");
    }

    #[test]
    fn image_is_loaded_before_commands() {
        let script = parse(r#"[{"type": "begin_ruler_creation", "point": {"x": 1, "y": 1}}]"#).unwrap();
        let dims = Dimensions {
            width: 64,
            height: 32,
        };
        let replay = replay(&script, SessionConfig::default(), Some(dims), FixedClock(0)).unwrap();
        assert_eq!(replay.steps[0].outcome, CommandOutcome::Applied);
        assert_eq!(replay.snapshot.mode, InteractionMode::RulerCreation);
    }

    #[test]
    fn invalid_config_is_a_session_error() {
        let config = SessionConfig {
            default_divisions: 1,
            ..SessionConfig::default()
        };
        let script = parse("[]").unwrap();
        assert!(matches!(
            replay(&script, config, None, FixedClock(0)),
            Err(ReplayError::Session(_))
        ));
    }

    #[test]
    fn report_lists_rulers_and_locks() {
        let script = parse(COMPARE_PAIR).unwrap();
        let report = replay(&script, SessionConfig::default(), None, FixedClock(0))
            .unwrap()
            .report();
        assert!(report.contains("Commands: 5 (1 ignored)"));
        assert!(report.contains("ruler-1"));
        assert!(report.contains("lock-1"));
        assert!(report.contains("2:1"));
        assert!(report.contains("compare"));
    }

    #[test]
    fn report_rows_follow_the_headers() {
        let script = parse(COMPARE_PAIR).unwrap();
        let report = replay(&script, SessionConfig::default(), None, FixedClock(0))
            .unwrap()
            .report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Replay Report");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[4], "Image: none");
        assert!(lines[6].starts_with("Ruler"));
        assert!(lines[8].starts_with("ruler-1"));
        assert!(lines.last().unwrap().starts_with("lock-1"));
        assert!(!report.ends_with('\n'));
    }
}
