use skyhop_core::input::InputSnapshot;
use skyhop_platformer::World;

/// Patrolling enemies closer than this, ahead of the player, trigger a jump.
const ENEMY_LOOKAHEAD: f32 = 90.0;
/// Vertical window in which an enemy counts as "ahead".
const ENEMY_ROW_SLACK: f32 = 40.0;
/// Horizontal movement below this counts as no progress.
const STALL_EPSILON: f32 = 0.5;
/// Give up on a wall after this many stalled ticks and turn around.
const STUCK_TICKS: u32 = 90;

/// Scripted input source: walks toward one end of the world, turns at the
/// bounds, and jumps over walls and zombies.
#[derive(Debug, Clone)]
pub struct Autopilot {
    direction: i8,
    last_x: Option<f32>,
    stalled: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            direction: 1,
            last_x: None,
            stalled: 0,
        }
    }

    #[cfg(test)]
    fn direction(&self) -> i8 {
        self.direction
    }

    pub fn next_input(&mut self, world: &World) -> InputSnapshot {
        let hb = *world.player().hitbox();
        let bounds = world.bounds();

        if hb.right() >= bounds.end_x - 1.0 {
            self.direction = -1;
        } else if hb.left() <= bounds.start_x + 1.0 {
            self.direction = 1;
        }

        match self.last_x {
            Some(x) if (hb.x - x).abs() < STALL_EPSILON => self.stalled += 1,
            _ => self.stalled = 0,
        }
        self.last_x = Some(hb.x);

        if self.stalled > STUCK_TICKS {
            tracing::debug!(x = hb.x, "autopilot stuck, turning around");
            self.direction = -self.direction;
            self.stalled = 0;
        }

        let dir = f32::from(self.direction);
        let enemy_ahead = world.enemies().iter().any(|e| {
            let eb = e.hitbox();
            let dx = (eb.centerx() - hb.centerx()) * dir;
            e.is_active()
                && dx > 0.0
                && dx < ENEMY_LOOKAHEAD
                && (eb.centery() - hb.centery()).abs() < ENEMY_ROW_SLACK
        });

        InputSnapshot {
            left: self.direction < 0,
            right: self.direction > 0,
            jump: self.stalled >= 2 || enemy_ahead,
        }
    }
}

#[cfg(test)]
mod tests {
    use skyhop_core::game_trait::Game;
    use skyhop_platformer::PlatformerConfig;

    use super::*;

    fn flat_world() -> World {
        let mut config = PlatformerConfig::default();
        config.generation.cluster_count = 0;
        World::with_seed(config, 5)
    }

    #[test]
    fn starts_walking_right() {
        let world = flat_world();
        let input = Autopilot::new().next_input(&world);
        assert!(input.right && !input.left);
    }

    #[test]
    fn turns_around_at_world_end() {
        let mut world = flat_world();
        let mut pilot = Autopilot::new();
        for _ in 0..1000 {
            let input = pilot.next_input(&world);
            world.update(&input);
            if pilot.direction() < 0 {
                break;
            }
        }
        assert_eq!(pilot.direction(), -1, "never reached the right bound");
        assert!(world.player().hitbox().right() >= world.bounds().end_x - 6.0);
    }

    #[test]
    fn jumps_when_progress_stalls() {
        let world = flat_world();
        let mut pilot = Autopilot::new();
        pilot.next_input(&world);
        pilot.next_input(&world);
        let input = pilot.next_input(&world);
        assert!(input.jump, "two ticks without movement should trigger a jump");
    }
}
