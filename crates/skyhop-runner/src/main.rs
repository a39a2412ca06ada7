mod ascii;
mod audio_log;
mod autopilot;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use skyhop_core::audio::AudioSettings;
use skyhop_core::game_trait::{Game, GameEvent};
use skyhop_platformer::{PlatformerConfig, RunPhase, World};

use ascii::AsciiCanvas;
use audio_log::LogAudio;
use autopilot::Autopilot;

/// Command line: `--ticks=N`, `--seed=N`, `--mute`.
#[derive(Debug, Clone, PartialEq)]
struct RunArgs {
    ticks: u64,
    seed: Option<u64>,
    mute: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            ticks: 3600,
            seed: None,
            mute: false,
        }
    }
}

impl RunArgs {
    /// Unknown or malformed arguments are logged and ignored.
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if let Some(v) = arg.strip_prefix("--ticks=") {
                match v.parse() {
                    Ok(n) => parsed.ticks = n,
                    Err(_) => tracing::warn!("ignoring bad tick count {v:?}"),
                }
            } else if let Some(v) = arg.strip_prefix("--seed=") {
                match v.parse() {
                    Ok(n) => parsed.seed = Some(n),
                    Err(_) => tracing::warn!("ignoring bad seed {v:?}"),
                }
            } else if arg == "--mute" {
                parsed.mute = true;
            } else {
                tracing::warn!("ignoring unknown argument {arg:?}");
            }
        }
        parsed
    }
}

/// Printed as JSON once the run ends.
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: Option<u64>,
    ticks: u64,
    /// Simulated time at the game's nominal tick rate.
    seconds: f32,
    score: u32,
    phase: RunPhase,
    coins_total: usize,
    coins_left: usize,
    enemies_total: usize,
    enemies_left: usize,
    clusters_placed: u32,
    clusters_skipped: u32,
    stomps: u32,
    hurts: u32,
    sounds: BTreeMap<String, u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = RunArgs::parse(std::env::args().skip(1));
    let config = PlatformerConfig::load();
    let mut world = match args.seed {
        Some(seed) => World::with_seed(config, seed),
        None => World::new(config),
    };
    tracing::info!(ticks = args.ticks, seed = ?args.seed, "Skyhop runner starting");

    let settings = AudioSettings {
        muted: args.mute,
        ..AudioSettings::default()
    };
    let mut sink = LogAudio::default();
    let mut pilot = Autopilot::new();
    let (mut stomps, mut hurts) = (0u32, 0u32);

    for _ in 0..args.ticks {
        let input = pilot.next_input(&world);
        for event in world.update(&input) {
            match event {
                GameEvent::ScoreUpdate { score } => tracing::debug!(score, "coin collected"),
                GameEvent::EnemyStomped { remaining } => {
                    stomps += 1;
                    tracing::debug!(remaining, "enemy stomped");
                },
                GameEvent::PlayerHurt => hurts += 1,
                GameEvent::RoundComplete => {},
            }
        }
        world.audio_queue().process(&mut sink, &settings);
        if world.is_round_complete() {
            break;
        }
    }

    let screen = &world.config().screen;
    let mut canvas = AsciiCanvas::new(screen.width, screen.height, world.animation_table());
    world.draw(&mut canvas);
    println!("{canvas}");

    let stats = world.level_stats();
    let summary = RunSummary {
        seed: args.seed,
        ticks: world.ticks(),
        seconds: world.ticks() as f32 / world.tick_rate(),
        score: world.score(),
        phase: world.phase(),
        coins_total: world.total_coins(),
        coins_left: world.coins().len(),
        enemies_total: world.total_enemies(),
        enemies_left: world.enemies().len(),
        clusters_placed: stats.clusters_placed,
        clusters_skipped: stats.clusters_skipped,
        stomps,
        hurts,
        sounds: sink.played().clone(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode run summary: {e}"),
    }
}
