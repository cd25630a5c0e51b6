#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use duotris::{Frame, GameSettings, MarkerGrid, Outcome, TickOutcome, Versus};
#[cfg(not(target_arch = "wasm32"))]
use flexi_logger::Logger;
#[cfg(not(target_arch = "wasm32"))]
use rand::SeedableRng;
#[cfg(not(target_arch = "wasm32"))]
use rand::rngs::StdRng;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Runs a player-versus-bot duel headlessly and prints the boards.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug, Clone)]
struct Opts {
    /// Seed for piece selection, bot tie-breaks and angry chunks
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Raw frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Board width in cells (both boards)
    #[arg(long, default_value_t = 10)]
    width: i32,
    /// Board height in cells (both boards)
    #[arg(long, default_value_t = 20)]
    height: i32,
    /// Optional settings JSON; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Let the bot place the player's pieces too
    #[arg(long)]
    autopilot: bool,
    /// Player commands applied one per gravity step: L, R, U (rotate), D (drop), '.' (wait)
    #[arg(long, default_value = "")]
    script: String,
    /// Print the boards every N gravity steps (0 prints only the last frame)
    #[arg(long, default_value_t = 10)]
    every: u32,
    /// Log level filter, e.g. "info" or "duotris=debug"
    #[arg(long)]
    log_level: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let _logger = Logger::try_with_env_or_str(opts.log_level.as_deref().unwrap_or("info"))?
        .log_to_stderr()
        .start()?;

    let settings = match opts.settings.as_ref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            serde_json::from_str::<GameSettings>(&raw)
                .with_context(|| format!("parsing settings from {}", path.display()))?
        }
        None => GameSettings::default(),
    };

    let markers = board_markers(opts.width, opts.height, settings.bounds_radius)?;
    let mut versus = Versus::new(&markers, &markers, settings, StdRng::seed_from_u64(opts.seed))
        .context("starting duel")?;

    if opts.autopilot {
        versus.set_autopilot(true);
        versus.autoplace_player();
    }

    let mut script = opts.script.chars().cycle();
    let scripted = !opts.script.is_empty();
    let mut steps = 0u32;
    for _ in 0..opts.frames {
        match versus.tick() {
            TickOutcome::Halted => break,
            TickOutcome::Waiting => continue,
            TickOutcome::Advanced { .. } => {}
        }
        steps += 1;
        if scripted {
            match script.next() {
                Some('L') | Some('l') => {
                    versus.move_left();
                }
                Some('R') | Some('r') => {
                    versus.move_right();
                }
                Some('U') | Some('u') => {
                    versus.rotate();
                }
                Some('D') | Some('d') => {
                    versus.hard_drop();
                }
                _ => {}
            }
        }
        if opts.every > 0 && steps % opts.every == 0 {
            if let Some(frame) = versus.take_frame() {
                print_frame(steps, &frame);
            }
        }
    }

    let frame = versus.frame();
    print_frame(steps, &frame);
    match frame.outcome {
        Outcome::Running => println!("still running after {} gravity steps", steps),
        Outcome::ToppedOut(side) => println!("{} topped out after {} gravity steps", side, steps),
    }
    Ok(())
}

// Both boards are centred on the origin, as painted tile maps usually are.
#[cfg(not(target_arch = "wasm32"))]
fn board_markers(width: i32, height: i32, radius: i32) -> anyhow::Result<MarkerGrid> {
    let widest = 2 * radius;
    if !(1..=widest).contains(&width) || !(1..=widest).contains(&height) {
        anyhow::bail!(
            "board {}x{} does not fit the scanned area, both sides must be in 1..={}",
            width,
            height,
            widest
        );
    }
    let (min_x, min_y) = (-width / 2, -height / 2);
    Ok(MarkerGrid::rect(min_x, min_y, min_x + width - 1, min_y + height - 1))
}

#[cfg(not(target_arch = "wasm32"))]
fn print_frame(step: u32, frame: &Frame) {
    println!("step {}  {}  streak {}", step, frame.status_line(), frame.streak);
    let player = frame.player.to_string();
    let opponent = frame.opponent.to_string();
    for (left, right) in player.lines().zip(opponent.lines()) {
        println!("{}   {}", left, right);
    }
    println!();
}
