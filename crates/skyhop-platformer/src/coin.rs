use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::animation::{AnimKey, AnimationState, AnimationTable, Facing, MotionState, SpriteKind};

/// A collectible coin. Removed from the world the tick the player touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub anim: AnimationState,
}

impl Coin {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            anim: AnimationState::new(AnimKey::Spin),
        }
    }

    /// Coins spin continuously regardless of anything else in the world.
    pub fn tick(&mut self, table: &AnimationTable) {
        self.anim.advance(table, SpriteKind::Coin, MotionState::Spin, Facing::Right);
    }
}
