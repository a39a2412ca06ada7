use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;

/// Which sprite sheet an entity draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Zombie,
    Coin,
}

impl SpriteKind {
    /// Asset name prefix for this sheet.
    pub fn prefix(self) -> &'static str {
        match self {
            SpriteKind::Player => "player",
            SpriteKind::Zombie => "zombie",
            SpriteKind::Coin => "coin",
        }
    }
}

/// Motion state derived from velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    Idle,
    Walk,
    /// Continuous cycle with no idle/walk distinction (coins).
    Spin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Key of one frame sequence inside a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimKey {
    Idle,
    WalkLeft,
    WalkRight,
    Spin,
}

impl AnimKey {
    /// Walking picks a per-direction sequence; other states map directly.
    pub fn resolve(motion: MotionState, facing: Facing) -> AnimKey {
        match (motion, facing) {
            (MotionState::Walk, Facing::Left) => AnimKey::WalkLeft,
            (MotionState::Walk, Facing::Right) => AnimKey::WalkRight,
            (MotionState::Idle, _) => AnimKey::Idle,
            (MotionState::Spin, _) => AnimKey::Spin,
        }
    }
}

/// Opaque handle to one sprite frame, resolved to an asset by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameHandle(u16);

impl FrameHandle {
    /// Placeholder frame returned when nothing better is registered.
    pub const MISSING: FrameHandle = FrameHandle(0);
}

#[derive(Debug, Clone)]
struct Sequence {
    frames: Vec<FrameHandle>,
    ticks_per_frame: u32,
}

/// Frame sequences for every (sprite, key) pair, built once at load time.
#[derive(Debug, Clone)]
pub struct AnimationTable {
    sequences: HashMap<(SpriteKind, AnimKey), Sequence>,
    names: Vec<String>,
    handles: HashMap<String, FrameHandle>,
    fallback_ticks: u32,
}

impl AnimationTable {
    /// Table with no sequences; every lookup lands on `FrameHandle::MISSING`.
    pub fn empty(fallback_ticks: u32) -> Self {
        Self {
            sequences: HashMap::new(),
            names: vec!["missing".to_string()],
            handles: HashMap::new(),
            fallback_ticks,
        }
    }

    /// The standard character and coin sheets.
    pub fn new(config: &AnimationConfig) -> Self {
        let mut table = Self::empty(config.fallback_ticks);
        for kind in [SpriteKind::Player, SpriteKind::Zombie] {
            let p = kind.prefix();
            table.register(
                kind,
                AnimKey::Idle,
                &[format!("{p}_idle_0"), format!("{p}_idle_1")],
                config.idle_ticks,
            );
            table.register(
                kind,
                AnimKey::WalkRight,
                &[format!("{p}_walk_0"), format!("{p}_walk_1")],
                config.walk_ticks,
            );
            table.register(
                kind,
                AnimKey::WalkLeft,
                &[format!("{p}_walk_left_0"), format!("{p}_walk_left_1")],
                config.walk_ticks,
            );
        }
        table.register(
            SpriteKind::Coin,
            AnimKey::Spin,
            &["coin_0".to_string(), "coin_1".to_string()],
            config.spin_ticks,
        );
        table
    }

    /// Add (or replace) a sequence. Empty name lists are ignored, and so is a
    /// sequence whose new names would not fit in the handle space.
    pub fn register(&mut self, kind: SpriteKind, key: AnimKey, names: &[String], ticks: u32) {
        if names.is_empty() {
            return;
        }
        let mut frames = Vec::with_capacity(names.len());
        for name in names {
            let Some(handle) = self.intern(name) else {
                tracing::warn!(?kind, ?key, "frame handles exhausted, sequence skipped");
                return;
            };
            frames.push(handle);
        }
        self.sequences.insert(
            (kind, key),
            Sequence {
                frames,
                ticks_per_frame: ticks,
            },
        );
    }

    /// Handle for `name`, allocating one the first time the name is seen.
    fn intern(&mut self, name: &str) -> Option<FrameHandle> {
        if let Some(&handle) = self.handles.get(name) {
            return Some(handle);
        }
        let handle = FrameHandle(u16::try_from(self.names.len()).ok()?);
        self.names.push(name.to_string());
        self.handles.insert(name.to_string(), handle);
        Some(handle)
    }

    pub fn ticks_per_frame(&self, kind: SpriteKind, key: AnimKey) -> u32 {
        self.sequences
            .get(&(kind, key))
            .map_or(self.fallback_ticks, |s| s.ticks_per_frame)
    }

    pub fn sequence_len(&self, kind: SpriteKind, key: AnimKey) -> usize {
        self.sequences.get(&(kind, key)).map_or(0, |s| s.frames.len())
    }

    /// Default frame for a sheet: its first idle frame, else `MISSING`.
    pub fn fallback(&self, kind: SpriteKind) -> FrameHandle {
        self.sequences
            .get(&(kind, AnimKey::Idle))
            .and_then(|s| s.frames.first().copied())
            .unwrap_or(FrameHandle::MISSING)
    }

    /// Frame at `index`, wrapping out-of-range indices to the first frame.
    pub fn frame(&self, kind: SpriteKind, key: AnimKey, index: usize) -> FrameHandle {
        match self.sequences.get(&(kind, key)) {
            Some(seq) => seq
                .frames
                .get(index)
                .or_else(|| seq.frames.first())
                .copied()
                .unwrap_or(FrameHandle::MISSING),
            None => self.fallback(kind),
        }
    }

    /// Asset name for a handle; unknown handles map to the placeholder.
    pub fn asset_name(&self, handle: FrameHandle) -> &str {
        self.names
            .get(handle.0 as usize)
            .or_else(|| self.names.first())
            .map_or("missing", String::as_str)
    }
}

/// Per-entity animation cursor. The table holds the frames; this only counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    pub timer: u32,
    pub index: usize,
    pub key: AnimKey,
}

impl AnimationState {
    pub fn new(key: AnimKey) -> Self {
        Self {
            timer: 0,
            index: 0,
            key,
        }
    }

    /// Count one tick in the given motion state and return the frame to show.
    pub fn advance(
        &mut self,
        table: &AnimationTable,
        kind: SpriteKind,
        motion: MotionState,
        facing: Facing,
    ) -> FrameHandle {
        let key = AnimKey::resolve(motion, facing);
        self.timer += 1;
        if self.timer > table.ticks_per_frame(kind, key) {
            self.timer = 0;
            self.index += 1;
        }
        self.key = key;

        if self.index >= table.sequence_len(kind, key) {
            self.index = 0;
        }
        table.frame(kind, key, self.index)
    }

    /// Frame for the last advanced state, without counting a tick.
    pub fn current(&self, table: &AnimationTable, kind: SpriteKind) -> FrameHandle {
        table.frame(kind, self.key, self.index)
    }
}
