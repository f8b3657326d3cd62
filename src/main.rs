//! Slipstream headless race
//!
//! Runs one race with a scripted player, logs it, prints the final
//! standings and replays the recorded inputs to verify determinism.
//!
//! # Usage
//!
//! ```bash
//! slipstream
//! slipstream --seed 42 --distance 5000
//! slipstream --config race.json --label sunday-cup --json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use slipstream::{
    TICK_RATE, VERSION,
    core::rng::derive_race_seed,
    game::{
        clock::FrameClock,
        config::RaceConfig,
        events::RaceEventData,
        input::{InputFrame, InputRecording},
        state::RaceState,
        tick::{replay_race, tick},
        view::hud_snapshot,
    },
};

#[derive(Parser)]
#[command(name = "slipstream")]
#[command(author, version, about = "Slipstream - headless arcade race")]
struct Args {
    /// JSON race config; missing fields take defaults
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Race seed
    #[arg(long, short = 's', conflicts_with = "label")]
    seed: Option<u64>,

    /// Derive the race seed from a label
    #[arg(long)]
    label: Option<String>,

    /// Override the finish distance (meters)
    #[arg(long, short = 'd')]
    distance: Option<f32>,

    /// Simulated frame rate (Hz)
    #[arg(long, default_value_t = TICK_RATE)]
    hz: u32,

    /// Give up after this many frames
    #[arg(long, default_value_t = 2_000_000)]
    max_frames: u32,

    /// Print the final HUD snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Slipstream v{}", VERSION);

    let mut config = load_config(args.config.as_ref())?;
    if let Some(distance) = args.distance {
        config.race_distance = distance;
    }
    config.validate().context("invalid race config")?;

    let seed = match (&args.seed, &args.label) {
        (Some(seed), _) => *seed,
        (None, Some(label)) => derive_race_seed(label),
        (None, None) => 12345,
    };

    run_race(&config, seed, &args)
}

fn load_config(path: Option<&PathBuf>) -> Result<RaceConfig> {
    let Some(path) = path else {
        return Ok(RaceConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    RaceConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Scripted player: full throttle, hold the centerline, boost when ready.
fn autopilot(state: &RaceState, frame: u32) -> InputFrame {
    let player = state.player();
    let ahead = state.track.sample_at(player.progress + 60.0).curvature;

    let drift = player.lateral_offset;
    let sharp = ahead.abs() > 0.012 && player.speed > 280.0;

    InputFrame::from_controls(
        !sharp,
        sharp && frame % 4 == 0,
        drift > 8.0,
        drift < -8.0,
        player.boost.available && player.speed > 150.0,
        false,
    )
}

fn run_race(config: &RaceConfig, seed: u64, args: &Args) -> Result<()> {
    info!("=== Starting Race ===");
    info!("Seed: {}", seed);
    info!(
        "Distance: {} m, field: {} cars, {} Hz",
        config.race_distance,
        config.field_size(),
        args.hz
    );

    let mut state = RaceState::new(config, seed)?;
    let mut recording = InputRecording::new(seed);

    // Synthetic monotonic timestamps at a fixed rate.
    let step = Duration::from_nanos(1_000_000_000 / u64::from(args.hz.max(1)));
    let mut clock = FrameClock::new(config.max_frame_dt);
    clock.advance(Duration::ZERO);

    let report_every = args.hz.max(1) * 10;
    let mut contacts = 0usize;
    let mut boosts = 0usize;
    let mut finished = false;

    for frame in 0..args.max_frames {
        let dt = clock.advance(step * (frame + 1));
        let input = autopilot(&state, frame);
        recording.record(frame, input);

        let result = tick(&mut state, input, config, dt);

        for event in &result.events {
            match &event.data {
                RaceEventData::Collision { .. } => contacts += 1,
                RaceEventData::BoostActivated { speed, .. } => {
                    boosts += 1;
                    debug!("Boost at tick {} ({:.0} km/h)", event.tick, speed);
                }
                RaceEventData::RaceFinished { winner, duration_ticks } => {
                    info!("Race finished at tick {} (winner: car {})", duration_ticks, winner.0);
                }
                RaceEventData::PhaseChanged { .. } => {}
            }
        }

        if frame > 0 && frame % report_every == 0 {
            let hud = hud_snapshot(&state);
            info!(
                "t={:.0}s: P{}/{} {:.0} m at {:.0} km/h, {} contacts so far",
                state.elapsed, hud.position, hud.field_size, hud.progress, hud.speed, contacts
            );
        }

        if result.finished {
            finished = true;
            break;
        }
    }

    if !finished {
        warn!("Race did not finish within {} frames", args.max_frames);
    }

    info!("=== Race Results ===");
    let standings = state
        .final_standings
        .clone()
        .unwrap_or_else(|| state.standings());
    for row in &standings {
        let you = if row.is_player { " (you)" } else { "" };
        info!("#{}: {}{} - {:.0} m", row.position, row.name, you, row.progress);
    }
    info!("Contacts: {}, boosts: {}", contacts, boosts);

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!(
        "Input recording: {} deltas over {} frames ({})",
        recording.deltas().len(),
        recording.end_tick + 1,
        hex::encode(&recording.compute_hash()[..8])
    );

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_race(config, &recording, step.as_secs_f32())?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    if args.json {
        let hud = hud_snapshot(&state);
        println!("{}", serde_json::to_string_pretty(&hud)?);
    }

    Ok(())
}
