//! Strafe - headless runner.
//!
//! Runs the movement simulation with a scripted input pattern, logs the
//! player's progress and can save the best ghost run to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use strafe_game::{Action, GhostRun, PlayerInput, Settings, Simulation};

#[derive(Parser)]
#[command(name = "strafe")]
#[command(about = "Source-style movement simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a player driven by a scripted input pattern
    Run {
        /// Settings file (TOML). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "1000")]
        ticks: u32,
        /// Input held by the player
        #[arg(short, long, value_enum, default_value = "forward")]
        pattern: InputPattern,
        /// Write the best finished run here
        #[arg(long)]
        ghost_out: Option<PathBuf>,
    },
    /// Print a summary of a saved ghost run
    Inspect {
        /// Ghost file written by `run --ghost-out`
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputPattern {
    /// Stand still
    Idle,
    /// Walk forward
    Forward,
    /// Walk forward while crouched
    Crouch,
    /// Hold forward and jump, sweeping the mouse side to side
    Bhop,
}

impl InputPattern {
    fn input(self, tick: u32) -> PlayerInput {
        match self {
            Self::Idle => PlayerInput::default(),
            Self::Forward => PlayerInput::holding(&[Action::Forward]),
            Self::Crouch => PlayerInput::holding(&[Action::Forward, Action::Crouch]),
            Self::Bhop => {
                // Turn one way for half a second, then the other
                let turning_right = (tick / 25) % 2 == 0;
                let (strafe, mouse_x) = if turning_right {
                    (Action::Right, 8.0)
                } else {
                    (Action::Left, -8.0)
                };
                let mut input = PlayerInput::holding(&[Action::Forward, Action::Jump, strafe]);
                input.mouse_delta = (mouse_x, 0.0);
                input
            }
        }
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("strafe=info".parse()?))
        .init();

    match Cli::parse().command {
        Commands::Run {
            config,
            ticks,
            pattern,
            ghost_out,
        } => run(config.as_deref(), ticks, pattern, ghost_out.as_deref()),
        Commands::Inspect { path } => inspect(&path),
    }
}

fn run(config: Option<&Path>, ticks: u32, pattern: InputPattern, ghost_out: Option<&Path>) -> Result<()> {
    let settings = match config {
        Some(path) => Settings::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };

    let mut simulation = settings.build_simulation();
    let player_id = simulation.add_player("Player1");
    let tick_rate = simulation.config.tick_rate;

    tracing::info!(
        "level '{}', {} ticks at {}Hz, pattern {:?}",
        simulation.level.name,
        ticks,
        tick_rate,
        pattern
    );

    for tick in 0..ticks {
        simulation.tick(&[pattern.input(tick)]);

        if tick % tick_rate == 0 {
            report(&simulation, player_id);
        }
    }
    report(&simulation, player_id);

    match (&simulation.level.best_run, ghost_out) {
        (Some(run), Some(path)) => save_ghost(run, path)?,
        (None, Some(path)) => tracing::warn!("no finished run, nothing written to {}", path.display()),
        _ => {}
    }

    Ok(())
}

fn report(simulation: &Simulation, player_id: u32) {
    let Some(player) = simulation.get_player(player_id) else {
        return;
    };

    tracing::info!(
        frame = simulation.frame,
        grounded = player.on_ground(),
        crouching = player.is_crouching(),
        "pos {:?} speed {:.2}",
        player.position(),
        player.movement.horizontal_speed()
    );
}

fn save_ghost(run: &GhostRun, path: &Path) -> Result<()> {
    let bytes = bincode::serde::encode_to_vec(run, bincode::config::standard()).context("encoding ghost run")?;
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(
        "saved {:.2}s run ({} samples, {} bytes) to {}",
        run.completion_time,
        run.samples.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let (run, _): (GhostRun, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).context("decoding ghost run")?;

    let path_length: f32 = run
        .samples
        .windows(2)
        .map(|pair| pair[0].position.distance(pair[1].position))
        .sum();

    tracing::info!(
        "{:.2}s run, {} samples, {:.1}m travelled",
        run.completion_time,
        run.samples.len(),
        path_length
    );
    if let (Some(first), Some(last)) = (run.samples.first(), run.samples.last()) {
        tracing::info!("from {:?} to {:?}", first.position, last.position);
    }

    Ok(())
}
