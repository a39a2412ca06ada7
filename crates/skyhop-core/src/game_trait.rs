use serde::{Deserialize, Serialize};

use crate::audio::AudioEventQueue;
use crate::input::InputSnapshot;

/// Core trait a tick-driven game implements.
///
/// The host owns the frame clock, device polling, rendering, and audio output;
/// the game only advances its simulation one fixed tick per `update` call.
pub trait Game {
    /// Static description shown by the host.
    fn metadata(&self) -> GameMetadata;

    /// Throw away the current run and build a fresh one.
    fn reset(&mut self);

    /// Advance exactly one tick. Returns the gameplay events of that tick.
    fn update(&mut self, input: &InputSnapshot) -> Vec<GameEvent>;

    /// Fixed ticks per second the simulation was tuned for.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Number of ticks simulated since the last reset.
    fn ticks(&self) -> u64;

    /// Current score of the run.
    fn score(&self) -> u32;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Whether the current run has reached its terminal state.
    fn is_round_complete(&self) -> bool;

    /// Sound cues produced since the host last drained them.
    fn audio_queue(&mut self) -> &mut AudioEventQueue;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { score: u32 },
    EnemyStomped { remaining: usize },
    PlayerHurt,
    RoundComplete,
}
