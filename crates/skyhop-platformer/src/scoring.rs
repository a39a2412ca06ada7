use serde::{Deserialize, Serialize};

/// Points awarded for each collected coin.
pub const COIN_POINTS: u32 = 1;

/// Which roster emptied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    CoinsCollected,
    EnemiesCleared,
}

/// Evaluate the win condition against the totals fixed at generation time.
///
/// A roster that started empty can never win the level on its own, so a level
/// generated without coins is only won by clearing its enemies and vice versa.
/// Coins are checked first.
pub fn win_reason(
    total_coins: usize,
    coins_left: usize,
    total_enemies: usize,
    enemies_left: usize,
) -> Option<WinReason> {
    if total_coins > 0 && coins_left == 0 {
        Some(WinReason::CoinsCollected)
    } else if total_enemies > 0 && enemies_left == 0 {
        Some(WinReason::EnemiesCleared)
    } else {
        None
    }
}
