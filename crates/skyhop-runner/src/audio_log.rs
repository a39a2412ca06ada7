use std::collections::BTreeMap;

use skyhop_core::audio::{AudioEvent, AudioSink};

/// Audio sink for headless runs: every cue becomes a log line and a count.
#[derive(Debug, Default)]
pub struct LogAudio {
    played: BTreeMap<String, u32>,
}

impl LogAudio {
    /// Cue name to number of times it played.
    pub fn played(&self) -> &BTreeMap<String, u32> {
        &self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, event: AudioEvent, volume: f32) {
        tracing::debug!(?event, volume, "sound");
        *self.played.entry(format!("{event:?}")).or_default() += 1;
    }
}
