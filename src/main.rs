//! Cubemorph
//!
//! An interactive 3x3x3 twisty puzzle that can shrink to a 2x2x2 and morph
//! into a pyramorphix. The `play` command opens a 3D viewer; the other
//! commands drive the same engine headlessly and print the resulting state.

mod visualization;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cubemorph::mask::{compute_mask, Pattern};
use cubemorph::slots::{format_state, slot_coord, SLOT_COUNT};
use cubemorph::{
    present, Animation, Command, EngineConfig, MoveEngine, PieceId, Presenter, PuzzleResult,
};

/// Twists, shrinks and morphs a 3x3x3 puzzle.
#[derive(Parser)]
#[command(name = "cubemorph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Args)]
struct EngineArgs {
    /// Milliseconds per turn animation.
    #[arg(long, default_value_t = 250, global = true)]
    turn_ms: u64,
    /// Milliseconds per shape transition step.
    #[arg(long, default_value_t = 600, global = true)]
    step_ms: u64,
    /// Seed for shuffles.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl From<&EngineArgs> for EngineConfig {
    fn from(args: &EngineArgs) -> Self {
        EngineConfig {
            turn_duration: Duration::from_millis(args.turn_ms),
            shape_step_duration: Duration::from_millis(args.step_ms),
            seed: args.seed,
            ..EngineConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Mode {
    /// Open the interactive 3D viewer.
    Play,
    /// Run commands headlessly and print the final state.
    ///
    /// Commands are move tokens (`r`, `U`, `fw`), `undo`, `shuffle`, `reset`,
    /// `hide` and `shape=<3x3|2x2|pyramorphix|2x2-pyramorphix>`.
    Run { commands: Vec<String> },
    /// Shuffle a fresh puzzle and print the sequence and result.
    Shuffle,
    /// Print which faces a highlight pattern colors.
    Mask { pattern: String },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cubemorph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from(&cli.engine);

    let result = match cli.command {
        Some(Mode::Play) | None => {
            println!("{}", visualization::CONTROLS);
            visualization::display(MoveEngine::new(config));
            Ok(())
        }
        Some(Mode::Run { commands }) => run_commands(config, &commands).map(|out| print!("{out}")),
        Some(Mode::Shuffle) => run_shuffle(config).map(|out| print!("{out}")),
        Some(Mode::Mask { pattern }) => pattern
            .parse::<Pattern>()
            .map(|pattern| print!("{}", format_mask(pattern))),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Presenter that writes one line per visible effect.
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
}

impl Presenter for Transcript {
    fn play(&mut self, animation: &Animation) {
        let line = match animation {
            Animation::Turn(turn) => format!(
                "turn {} ({:?} {:+}): {} pieces",
                turn.token,
                turn.axis,
                turn.degrees,
                turn.pieces.len()
            ),
            Animation::Shape(step) => format!("shape step {:?}", step.step),
        };
        self.lines.push(line);
    }

    fn set_visibility(&mut self, pieces: &[PieceId], hidden: bool) {
        let verb = if hidden { "hide" } else { "show" };
        self.lines.push(format!("{verb} {pieces:?}"));
    }

    fn reset(&mut self) {
        self.lines.push("reset".to_string());
    }
}

/// Runs every command to completion, presenting each animation as it starts.
fn drive(engine: &mut MoveEngine, transcript: &mut Transcript, command: Command) -> PuzzleResult<()> {
    let effect = engine.execute(command)?;
    let mut animating = present(transcript, &effect);
    loop {
        let next = if animating {
            engine.complete()
        } else {
            engine.tick()
        };
        match next {
            Some(animation) => {
                transcript.play(&animation);
                animating = true;
            }
            None if engine.is_busy() => animating = engine.in_flight() > 0,
            None => return Ok(()),
        }
    }
}

/// Executes textual commands and renders the transcript and final state.
fn run_commands(config: EngineConfig, commands: &[String]) -> PuzzleResult<String> {
    let mut engine = MoveEngine::new(config);
    let mut transcript = Transcript::default();
    for text in commands {
        drive(&mut engine, &mut transcript, text.parse()?)?;
    }

    let mut output = String::new();
    for line in &transcript.lines {
        output.push_str(line);
        output.push('\n');
    }
    output.push_str(&summary(&engine));
    Ok(output)
}

fn run_shuffle(config: EngineConfig) -> PuzzleResult<String> {
    let mut engine = MoveEngine::new(config);
    engine.shuffle();
    let sequence: Vec<String> = engine
        .pending_moves()
        .iter()
        .map(ToString::to_string)
        .collect();
    engine.finish_all();
    Ok(format!("{}\n{}", sequence.join(" "), summary(&engine)))
}

fn summary(engine: &MoveEngine) -> String {
    let history: Vec<String> = engine.history().iter().map(ToString::to_string).collect();
    format!(
        "{}shape: {}\nhistory: {}\nsolved: {}\n",
        format_state(engine.state()),
        engine.shape(),
        history.join(" "),
        if engine.state().is_solved() { "yes" } else { "no" },
    )
}

/// Lists the colored faces of each slot selected by a pattern.
fn format_mask(pattern: Pattern) -> String {
    let mask = compute_mask(pattern);
    let mut output = format!("pattern {pattern}:\n");
    for slot in 0..SLOT_COUNT {
        if mask[slot].is_empty() {
            continue;
        }
        let faces: Vec<String> = mask[slot].faces().map(|f| format!("{f:?}")).collect();
        output.push_str(&format!(
            "{:>2} {:?}: {}\n",
            slot,
            slot_coord(slot),
            faces.join(" ")
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(commands: &[&str]) -> String {
        let commands: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        run_commands(EngineConfig::seeded(11), &commands).unwrap()
    }

    #[test]
    fn test_run_snapshot() {
        insta::assert_snapshot!(run(&["r", "U"]), @r"
        turn r (X -90): 8 pieces
        turn U (Y +90): 8 pieces
        z=-1       z=0        z=1
        26 23 20    7 16 25    6 15 24
         3  4 17   12 13 14   21 22 11
         0  1  8    9 10  5   18 19  2
        shape: 3x3
        history: r U
        solved: no
        ");
    }

    #[test]
    fn test_run_undo_returns_to_solved() {
        let output = run(&["r", "U", "fw", "undo", "undo", "undo"]);
        assert!(output.ends_with("history: \nsolved: yes\n"), "{output}");
    }

    #[test]
    fn test_run_shape_transition_transcript() {
        let output = run(&["shape=2x2", "r"]);
        let lines: Vec<&str> = output.lines().take(3).collect();
        assert_eq!(
            lines,
            [
                "shape step ScaleMiddlesIn",
                "shape step ScaleCornersOut",
                "turn r (X -90): 8 pieces"
            ]
        );
        assert!(output.contains("shape: 2x2\n"));
    }

    #[test]
    fn test_run_shuffle_plays_every_move() {
        let output = run(&["shuffle"]);
        assert_eq!(output.lines().filter(|l| l.starts_with("turn ")).count(), 20);
    }

    #[test]
    fn test_run_rejects_bad_commands() {
        let commands = vec!["r".to_string(), "m".to_string(), "shape=2x2".to_string(), "m".to_string()];
        assert!(run_commands(EngineConfig::seeded(1), &commands).is_err());
        assert!(run_commands(EngineConfig::seeded(1), &["jump".to_string()]).is_err());
    }

    #[test]
    fn test_format_mask_top_edges() {
        let output = format_mask(Pattern::TopEdges);
        assert_eq!(output.lines().count(), 5);
        assert!(output.contains(" 7 (0, 1, -1): PosY NegZ\n"), "{output}");
    }
}
