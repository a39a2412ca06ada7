use serde::{Deserialize, Serialize};

/// Discrete sound cues the simulation can signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioEvent {
    Jump,
    EnemyStomped,
    PlayerHurt,
    CoinCollected,
    /// Background music starts with a fresh level.
    LevelStarted,
    /// Background music stops when the level is won.
    LevelWon,
}

impl AudioEvent {
    pub fn category(self) -> SoundCategory {
        match self {
            AudioEvent::LevelStarted | AudioEvent::LevelWon => SoundCategory::Music,
            _ => SoundCategory::Effect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCategory {
    Effect,
    Music,
}

/// Whatever actually makes noise. Implementations must not block.
pub trait AudioSink {
    fn play(&mut self, event: AudioEvent, volume: f32);
}

/// Sink used when audio is unavailable or disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _event: AudioEvent, _volume: f32) {}
}

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub effect_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            effect_volume: 0.7,
            music_volume: 0.3,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn volume_for(&self, event: AudioEvent) -> f32 {
        if self.muted {
            return 0.0;
        }
        let category = match event.category() {
            SoundCategory::Effect => self.effect_volume,
            SoundCategory::Music => self.music_volume,
        };
        self.master_volume * category
    }
}

/// Queue of audio events produced during a tick, drained by the host.
#[derive(Debug, Default, Clone)]
pub struct AudioEventQueue {
    events: Vec<AudioEvent>,
}

impl AudioEventQueue {
    pub fn push(&mut self, event: AudioEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pending(&self) -> &[AudioEvent] {
        &self.events
    }

    /// Hand every queued event to `sink`. Muted or near-silent cues are dropped.
    pub fn process(&mut self, sink: &mut dyn AudioSink, settings: &AudioSettings) {
        for event in self.events.drain(..) {
            let volume = settings.volume_for(event);
            if volume > 0.001 {
                sink.play(event, volume);
            } else {
                tracing::trace!(?event, "audio cue dropped (muted)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(AudioEvent, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, event: AudioEvent, volume: f32) {
            self.0.push((event, volume));
        }
    }

    #[test]
    fn process_drains_in_order() {
        let mut queue = AudioEventQueue::default();
        queue.push(AudioEvent::Jump);
        queue.push(AudioEvent::CoinCollected);
        let mut sink = Recorder::default();
        queue.process(&mut sink, &AudioSettings::default());
        let played: Vec<_> = sink.0.iter().map(|(e, _)| *e).collect();
        assert_eq!(played, vec![AudioEvent::Jump, AudioEvent::CoinCollected]);
        assert!(queue.is_empty());
    }

    #[test]
    fn muted_drops_everything() {
        let mut queue = AudioEventQueue::default();
        queue.push(AudioEvent::LevelStarted);
        queue.push(AudioEvent::PlayerHurt);
        let settings = AudioSettings {
            muted: true,
            ..Default::default()
        };
        let mut sink = Recorder::default();
        queue.process(&mut sink, &settings);
        assert!(sink.0.is_empty());
        assert!(queue.is_empty(), "muted cues are still consumed");
    }

    #[test]
    fn music_uses_music_volume() {
        let settings = AudioSettings {
            master_volume: 1.0,
            effect_volume: 0.2,
            music_volume: 0.6,
            muted: false,
        };
        assert!((settings.volume_for(AudioEvent::LevelWon) - 0.6).abs() < 1e-6);
        assert!((settings.volume_for(AudioEvent::Jump) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn null_sink_is_silent_noop() {
        let mut queue = AudioEventQueue::default();
        queue.push(AudioEvent::EnemyStomped);
        queue.process(&mut NullAudio, &AudioSettings::default());
        assert!(queue.is_empty());
    }
}
