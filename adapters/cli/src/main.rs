#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Grid Skirmish session in the terminal.

mod map_file;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result as AnyResult};
use clap::{Parser, ValueEnum};
use grid_skirmish_core::{
    Cell, ChangeBatch, Command, GameEnd, InputState, Variant, WELCOME_BANNER,
};
use grid_skirmish_rendering::{apply_changes, apply_statuses, HudState, Surface};
use grid_skirmish_rendering_term::{poll_input, TermSurface};
use grid_skirmish_system_cadence::Cadence;
use grid_skirmish_world::{apply, query, Config, World};

/// Pause between frames; input polling and timers stay responsive while the
/// process yields the CPU.
const FRAME_PAUSE: Duration = Duration::from_millis(5);

/// Command-line arguments accepted by the Grid Skirmish binary.
#[derive(Debug, Parser)]
#[command(name = "grid-skirmish", about = "Terminal grid skirmish game")]
struct Args {
    /// Game variant to play.
    #[arg(long, value_enum, default_value = "tank")]
    variant: VariantArg,
    /// JSON map file; omitted, a map is generated from --rows/--columns.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Rows in the generated map.
    #[arg(long, default_value_t = 20)]
    rows: usize,
    /// Columns in the generated map.
    #[arg(long, default_value_t = 30)]
    columns: usize,
    /// Seed for the session's randomness; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of enemies placed at start.
    #[arg(long)]
    enemies: Option<usize>,
    /// Hero lives at start.
    #[arg(long)]
    lives: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Destructible terrain, lives, and scoring.
    Tank,
    /// Trail drawing and territory capture.
    Trail,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Tank => Self::TankBattle,
            VariantArg::Trail => Self::TrailEnclosure,
        }
    }
}

/// How a session came to a close.
enum SessionOutcome {
    /// The player quit from the keyboard.
    Quit,
    /// The engine reported a win or a loss.
    Ended(GameEnd),
}

fn main() -> AnyResult<()> {
    env_logger::init();

    let args = Args::parse();
    let variant = Variant::from(args.variant);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting a {variant:?} session with seed {seed}");

    let map = match &args.map {
        Some(path) => map_file::load(path).context("loading the map file")?,
        None => map_file::fallback(variant, args.rows, args.columns),
    };

    let mut config = Config::new(variant, seed);
    if let Some(enemies) = args.enemies {
        config = config.with_enemy_count(enemies);
    }
    if let Some(lives) = args.lives {
        config = config.with_hero_lives(lives);
    }

    println!("{WELCOME_BANNER}");
    let mut world = World::new(config);
    let (outcome, hud) = run_session(&mut world, map)?;

    // The terminal is restored here; the summary goes to the normal screen.
    match outcome {
        SessionOutcome::Quit => println!("Session ended. {}", hud.line()),
        SessionOutcome::Ended(end) => {
            log::info!("session finished: {end}");
            println!("Game over: {end}. {}", hud.line());
        }
    }
    log::debug!("final hero state: {:?}", query::hero_view(&world));
    Ok(())
}

/// Runs the frame loop until the player quits or the game ends.
///
/// Owns the terminal surface, so the terminal is restored before the caller
/// prints the session summary.
fn run_session(world: &mut World, map: Vec<Vec<Cell>>) -> AnyResult<(SessionOutcome, HudState)> {
    let grid_rows = u16::try_from(map.len()).unwrap_or(u16::MAX);
    let mut surface = TermSurface::new(grid_rows)?;
    let mut hud = HudState::default();
    let mut batch = ChangeBatch::new();

    apply(world, Command::Initialize { map }, &mut batch)
        .map_err(|end| anyhow::anyhow!("initialization ended the game: {end}"))?;
    apply_changes(&mut surface, &batch.positions)?;
    // The first frame always paints the status line, changed or not.
    let _ = hud.absorb(&batch.statuses);
    surface.draw_status(&hud.line())?;
    surface.present()?;

    let mut cadence = Cadence::new(grid_skirmish_system_cadence::Config::default());
    let mut commands: Vec<Command> = Vec::new();
    let mut last_frame = Instant::now();

    loop {
        let polled = poll_input()?;
        if polled.quit {
            return Ok((SessionOutcome::Quit, hud));
        }
        let input: InputState = polled.state;

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;
        cadence.handle(dt, input, &mut commands);

        let mut ended = None;
        for command in commands.drain(..) {
            batch.clear();
            let result = apply(world, command, &mut batch);
            apply_changes(&mut surface, &batch.positions)?;
            apply_statuses(&mut surface, &mut hud, &batch.statuses)?;
            if let Err(end) = result {
                ended = Some(end);
                break;
            }
        }
        surface.present()?;

        if let Some(end) = ended {
            return Ok((SessionOutcome::Ended(end), hud));
        }
        thread::sleep(FRAME_PAUSE);
    }
}
