use serde::{Deserialize, Serialize};

/// Per-tick input sampled by the host before `update`.
///
/// The game never reads raw keyboard events; whoever polls the device fills
/// this in once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Jump requested this tick (held or just pressed, at the host's choice).
    pub jump: bool,
}

impl InputSnapshot {
    pub const IDLE: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
        jump: false,
    };

    /// Horizontal intent in {-1, 0, +1}. Left wins when both are held.
    pub fn move_dir(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }
}
