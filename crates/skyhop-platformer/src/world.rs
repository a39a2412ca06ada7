use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use skyhop_core::audio::{AudioEvent, AudioEventQueue};
use skyhop_core::game_trait::{Game, GameEvent, GameMetadata};
use skyhop_core::input::InputSnapshot;

use crate::animation::AnimationTable;
use crate::character::Character;
use crate::coin::Coin;
use crate::config::PlatformerConfig;
use crate::level_gen::{Level, LevelGenerator, LevelStats, Platform};
use crate::physics::WorldBounds;
use crate::scoring::{self, COIN_POINTS, WinReason};

/// A falling player stomps when its bottom is above the enemy center plus this.
pub const STOMP_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    Won(WinReason),
}

/// Outcome of the player touching a patrolling enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Stomp,
    Hurt,
}

/// Classify a player/enemy touch. `None` when apart or when neither body is
/// moving horizontally.
pub fn classify_contact(player: &Character, enemy: &Character) -> Option<Contact> {
    let p = player.hitbox();
    let e = enemy.hitbox();
    if !p.overlaps(e) {
        return None;
    }
    if player.body.vy > 0.0 && p.bottom() < e.centery() + STOMP_MARGIN {
        Some(Contact::Stomp)
    } else if player.body.vx != 0.0 || enemy.body.vx != 0.0 {
        Some(Contact::Hurt)
    } else {
        None
    }
}

/// One run of the platformer: level, roster, camera, and score.
pub struct World {
    config: PlatformerConfig,
    table: AnimationTable,
    rng: StdRng,
    platforms: Vec<Platform>,
    bounds: WorldBounds,
    player: Character,
    enemies: Vec<Character>,
    coins: Vec<Coin>,
    total_coins: usize,
    total_enemies: usize,
    stats: LevelStats,
    camera_x: f32,
    score: u32,
    phase: RunPhase,
    paused: bool,
    ticks: u64,
    audio: AudioEventQueue,
}

impl World {
    /// Fresh world with an entropy-seeded level generator.
    pub fn new(config: PlatformerConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Fresh world whose level layouts follow from `seed`.
    pub fn with_seed(config: PlatformerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PlatformerConfig, rng: StdRng) -> Self {
        let table = AnimationTable::new(&config.animation);
        let player = Character::player(config.screen.width / 4.0, 0.0, &config);
        let mut world = Self {
            table,
            rng,
            platforms: Vec::new(),
            bounds: WorldBounds {
                start_x: 0.0,
                end_x: config.screen.width,
            },
            player,
            enemies: Vec::new(),
            coins: Vec::new(),
            total_coins: 0,
            total_enemies: 0,
            stats: LevelStats::default(),
            camera_x: 0.0,
            score: 0,
            phase: RunPhase::Playing,
            paused: false,
            ticks: 0,
            audio: AudioEventQueue::default(),
            config,
        };
        world.reset();
        world
    }

    /// Where the player's sprite is centered on reset.
    pub fn spawn_x(&self) -> f32 {
        self.config.screen.width / 4.0
    }

    /// Replace the current run with a prebuilt level. The player respawns and
    /// the score, tick counter, and phase start over.
    pub fn load_level(&mut self, level: Level) {
        let spawn_x = self.spawn_x();
        self.player.respawn(spawn_x, 0.0);

        self.platforms = level.platforms;
        self.bounds = level.bounds;
        self.enemies = level.enemies;
        self.coins = level.coins;
        self.total_coins = level.total_coins;
        self.total_enemies = level.total_enemies;
        self.stats = level.stats;

        self.score = 0;
        self.ticks = 0;
        self.phase = RunPhase::Playing;
        self.audio.clear();
        self.audio.push(AudioEvent::LevelStarted);
        self.update_camera();

        tracing::info!(
            platforms = self.platforms.len(),
            coins = self.total_coins,
            enemies = self.total_enemies,
            "level started"
        );
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn animation_table(&self) -> &AnimationTable {
        &self.table
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn enemies(&self) -> &[Character] {
        &self.enemies
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn total_coins(&self) -> usize {
        self.total_coins
    }

    pub fn total_enemies(&self) -> usize {
        self.total_enemies
    }

    pub fn level_stats(&self) -> LevelStats {
        self.stats
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Player velocity from input, then the jump request.
    fn steer_player(&mut self, input: &InputSnapshot) {
        self.player.steer(input);
        if input.jump && self.player.jump(self.config.physics.jump_impulse) {
            self.audio.push(AudioEvent::Jump);
        }
    }

    /// Wake enemies approaching the camera and assign patrol velocities.
    fn steer_enemies(&mut self, input: &InputSnapshot) {
        let camera_right = self.camera_x + self.config.screen.width;
        let lead = self.config.camera.activation_lead;
        for enemy in &mut self.enemies {
            let right_edge = enemy.visual_rect().right();
            if let Some(patrol) = enemy.patrol_mut()
                && patrol.wake_if_visible(right_edge, camera_right, lead)
            {
                tracing::trace!(right_edge, camera_right, "enemy woke");
            }
            enemy.steer(input);
        }
    }

    /// Player first, then enemies in creation order, then coin animation.
    fn step_physics(&mut self) {
        let gravity = self.config.physics.gravity;
        self.player.update(&self.platforms, self.bounds, gravity, &self.table);
        for enemy in &mut self.enemies {
            enemy.update(&self.platforms, self.bounds, gravity, &self.table);
        }
        for coin in &mut self.coins {
            coin.tick(&self.table);
        }
    }

    /// Follow the player, keeping the view inside the ground strip.
    fn update_camera(&mut self) {
        let width = self.config.screen.width;
        let ideal = self.player.visual_rect().centerx() - width / 2.0;
        self.camera_x = ideal.min(self.bounds.end_x - width).max(self.bounds.start_x);
    }

    fn collect_coins(&mut self, events: &mut Vec<GameEvent>) {
        let hitbox = *self.player.hitbox();
        let before = self.coins.len();
        self.coins.retain(|coin| !hitbox.overlaps(&coin.rect));
        let collected = before - self.coins.len();
        if collected == 0 {
            return;
        }
        for _ in 0..collected {
            self.audio.push(AudioEvent::CoinCollected);
        }
        self.score += collected as u32 * COIN_POINTS;
        events.push(GameEvent::ScoreUpdate { score: self.score });
    }

    /// Stomps remove enemies; any other moving contact hurts the player.
    /// Dormant enemies are skipped.
    fn resolve_enemy_contacts(&mut self, events: &mut Vec<GameEvent>) {
        let mut hurt = false;
        let mut stomped = 0usize;
        let player = &self.player;
        self.enemies.retain(|enemy| {
            if !enemy.is_active() {
                return true;
            }
            match classify_contact(player, enemy) {
                Some(Contact::Stomp) => {
                    stomped += 1;
                    false
                },
                Some(Contact::Hurt) => {
                    hurt = true;
                    true
                },
                None => true,
            }
        });

        // Each stomp reports the roster as it stood right after that stomp.
        let survivors = self.enemies.len();
        for i in (0..stomped).rev() {
            self.audio.push(AudioEvent::EnemyStomped);
            events.push(GameEvent::EnemyStomped {
                remaining: survivors + i,
            });
        }

        if hurt && !self.player.hurt {
            self.audio.push(AudioEvent::PlayerHurt);
            events.push(GameEvent::PlayerHurt);
        }
        self.player.hurt = hurt;
    }

    fn check_win(&mut self, events: &mut Vec<GameEvent>) {
        let Some(reason) = scoring::win_reason(
            self.total_coins,
            self.coins.len(),
            self.total_enemies,
            self.enemies.len(),
        ) else {
            return;
        };
        self.phase = RunPhase::Won(reason);
        self.audio.push(AudioEvent::LevelWon);
        events.push(GameEvent::RoundComplete);
        tracing::info!(?reason, score = self.score, ticks = self.ticks, "level won");
    }
}

impl Game for World {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skyhop".to_string(),
            description: "Collect every coin or stomp every zombie!".to_string(),
        }
    }

    /// Regenerate the level around the spawn point. Pause state is kept.
    fn reset(&mut self) {
        let spawn_x = self.spawn_x();
        let level = LevelGenerator::new(&self.config).generate(spawn_x, &mut self.rng);
        self.load_level(level);
    }

    fn update(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        if self.paused || self.phase != RunPhase::Playing {
            return Vec::new();
        }

        self.ticks += 1;
        let mut events = Vec::new();

        self.steer_player(input);
        self.steer_enemies(input);
        self.step_physics();
        self.update_camera();
        self.collect_coins(&mut events);
        self.resolve_enemy_contacts(&mut events);
        self.check_win(&mut events);

        events
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_round_complete(&self) -> bool {
        matches!(self.phase, RunPhase::Won(_))
    }

    fn audio_queue(&mut self) -> &mut AudioEventQueue {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use skyhop_core::geometry::Rect;
    use skyhop_core::test_helpers::{
        contract_pause_stops_updates, contract_reset_restarts_run, contract_update_advances_ticks,
        contract_update_after_completion_is_noop, run_game_ticks,
    };

    use super::*;
    use crate::character::PatrolState;

    fn world() -> World {
        World::with_seed(PlatformerConfig::default(), 42)
    }

    /// Ground only: no clusters, enemies, or coins.
    fn flat_world() -> World {
        let mut config = PlatformerConfig::default();
        config.generation.cluster_count = 0;
        World::with_seed(config, 1)
    }

    fn settle(world: &mut World) {
        run_game_ticks(world, 60, &InputSnapshot::IDLE);
    }

    fn patrolling_enemy(world: &World, center_x: f32) -> Character {
        let ground_top = world.platforms()[0].rect.top();
        let mut enemy = Character::enemy(center_x, ground_top - 19.0, world.config());
        enemy.patrol_mut().unwrap().state = PatrolState::Patrolling;
        enemy
    }

    #[test]
    fn new_world_starts_at_spawn() {
        let mut world = world();
        assert_eq!(world.player().visual_rect().centerx(), 200.0);
        assert_eq!(world.player().hitbox().centery(), 27.0);
        assert_eq!(world.score(), 0);
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.phase(), RunPhase::Playing);
        assert_eq!(world.audio_queue().pending(), &[AudioEvent::LevelStarted]);
    }

    #[test]
    fn totals_match_generated_rosters() {
        let world = world();
        assert_eq!(world.total_coins(), world.coins().len());
        assert_eq!(world.total_enemies(), world.enemies().len());
    }

    #[test]
    fn camera_clamps_to_ground_start() {
        let world = flat_world();
        // Ideal offset is 200 - 400 = -200, still right of the ground start.
        assert_eq!(world.camera_x(), -200.0);

        let mut world = flat_world();
        world.player.body.hitbox.set_left(world.bounds.start_x);
        world.update_camera();
        assert_eq!(world.camera_x(), world.bounds().start_x);
    }

    #[test]
    fn camera_clamps_to_ground_end() {
        let mut world = flat_world();
        world.player.body.hitbox.set_right(world.bounds.end_x);
        world.update_camera();
        assert_eq!(world.camera_x(), world.bounds().end_x - 800.0);
    }

    #[test]
    fn player_lands_on_ground() {
        let mut world = flat_world();
        settle(&mut world);
        let ground_top = world.platforms()[0].rect.top();
        assert_eq!(world.player().hitbox().bottom(), ground_top);
        assert!(world.player().body.can_jump);
    }

    #[test]
    fn jump_queues_cue_only_when_grounded() {
        let mut world = flat_world();
        world.audio_queue().clear();
        let jump = InputSnapshot {
            jump: true,
            ..InputSnapshot::IDLE
        };
        world.update(&jump);
        assert!(world.audio_queue().is_empty(), "airborne jump ignored");

        settle(&mut world);
        world.update(&jump);
        assert_eq!(world.audio_queue().pending(), &[AudioEvent::Jump]);
        assert!(world.player().body.vy < 0.0);
    }

    #[test]
    fn touching_coin_scores_and_removes_it() {
        let mut world = flat_world();
        settle(&mut world);
        let hb = *world.player().hitbox();
        world
            .coins
            .push(Coin::new(Rect::from_center(hb.centerx(), hb.centery(), 32.0, 32.0)));
        world.coins.push(Coin::new(Rect::new(1500.0, 100.0, 32.0, 32.0)));
        world.total_coins = 2;
        world.audio_queue().clear();

        let events = world.update(&InputSnapshot::IDLE);
        assert_eq!(world.score(), 1);
        assert_eq!(world.coins().len(), 1);
        assert!(events.contains(&GameEvent::ScoreUpdate { score: 1 }));
        assert!(
            world
                .audio_queue()
                .pending()
                .contains(&AudioEvent::CoinCollected)
        );
        assert!(!world.is_round_complete(), "one coin still out there");
    }

    #[test]
    fn collecting_last_coin_wins_once() {
        let mut world = flat_world();
        settle(&mut world);
        let hb = *world.player().hitbox();
        world
            .coins
            .push(Coin::new(Rect::from_center(hb.centerx(), hb.centery(), 32.0, 32.0)));
        world.total_coins = 1;

        let events = world.update(&InputSnapshot::IDLE);
        assert!(events.contains(&GameEvent::RoundComplete));
        assert_eq!(world.phase(), RunPhase::Won(WinReason::CoinsCollected));
        assert!(
            world
                .audio_queue()
                .pending()
                .contains(&AudioEvent::LevelWon)
        );

        let later = run_game_ticks(&mut world, 10, &InputSnapshot::IDLE);
        assert!(later.is_empty(), "the win fires exactly once");
    }

    #[test]
    fn falling_player_stomps_enemy() {
        let mut world = flat_world();
        settle(&mut world);
        let x = world.player().hitbox().centerx();
        let enemy = patrolling_enemy(&world, x);
        world.enemies.push(enemy);
        world.total_enemies = 1;
        world.player.body.hitbox.set_bottom(world.enemies[0].hitbox().top() + 2.0);
        world.player.body.vy = 3.0;

        let mut events = Vec::new();
        world.resolve_enemy_contacts(&mut events);
        assert!(world.enemies().is_empty());
        assert_eq!(events, vec![GameEvent::EnemyStomped { remaining: 0 }]);
        assert!(!world.player().hurt);

        world.check_win(&mut events);
        assert_eq!(world.phase(), RunPhase::Won(WinReason::EnemiesCleared));
    }

    #[test]
    fn simultaneous_stomps_count_down() {
        let mut world = flat_world();
        settle(&mut world);
        let x = world.player().hitbox().centerx();
        for dx in [-6.0, 6.0] {
            let enemy = patrolling_enemy(&world, x + dx);
            world.enemies.push(enemy);
        }
        let far = Character::enemy(x + 600.0, 300.0, world.config());
        world.enemies.push(far);
        world.total_enemies = 3;
        world.player.body.hitbox.set_bottom(world.enemies[0].hitbox().top() + 2.0);
        world.player.body.vy = 3.0;

        let mut events = Vec::new();
        world.resolve_enemy_contacts(&mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::EnemyStomped { remaining: 2 },
                GameEvent::EnemyStomped { remaining: 1 },
            ]
        );
        assert_eq!(world.enemies().len(), 1);
    }

    #[test]
    fn moving_contact_hurts_on_rising_edge() {
        let mut world = flat_world();
        settle(&mut world);
        let x = world.player().hitbox().centerx();
        let mut enemy = patrolling_enemy(&world, x + 10.0);
        enemy.body.vx = 2.0;
        world.enemies.push(enemy);
        world.audio_queue().clear();

        let mut events = Vec::new();
        world.resolve_enemy_contacts(&mut events);
        assert_eq!(events, vec![GameEvent::PlayerHurt]);
        assert!(world.player().hurt);

        events.clear();
        world.resolve_enemy_contacts(&mut events);
        assert!(events.is_empty(), "still hurt, no second cue");
        assert_eq!(world.audio_queue().pending(), &[AudioEvent::PlayerHurt]);

        world.enemies[0].body.hitbox.x += 500.0;
        world.resolve_enemy_contacts(&mut events);
        assert!(!world.player().hurt);
    }

    #[test]
    fn still_contact_is_harmless() {
        let mut world = flat_world();
        settle(&mut world);
        let x = world.player().hitbox().centerx();
        let mut enemy = patrolling_enemy(&world, x + 10.0);
        enemy.body.vx = 0.0;
        world.player.body.vx = 0.0;
        world.enemies.push(enemy);

        let mut events = Vec::new();
        world.resolve_enemy_contacts(&mut events);
        assert!(events.is_empty());
        assert!(!world.player().hurt);
    }

    #[test]
    fn dormant_enemy_has_no_contact_effects() {
        let mut world = flat_world();
        settle(&mut world);
        let x = world.player().hitbox().centerx();
        let mut enemy = Character::enemy(x + 10.0, world.player().hitbox().centery(), &world.config);
        enemy.body.vx = 2.0;
        world.enemies.push(enemy);

        let mut events = Vec::new();
        world.resolve_enemy_contacts(&mut events);
        assert!(events.is_empty());
        assert!(!world.player().hurt);
        assert_eq!(world.enemies().len(), 1);
    }

    #[test]
    fn enemies_wake_near_camera_only() {
        let mut world = flat_world();
        let near = Character::enemy(500.0, 400.0, &world.config);
        let far = Character::enemy(1900.0, 400.0, &world.config);
        world.enemies = vec![near, far];
        world.update(&InputSnapshot::IDLE);
        assert!(world.enemies()[0].is_active());
        assert!(!world.enemies()[1].is_active());
    }

    #[test]
    fn reset_regenerates_and_requeues_music() {
        let mut world = world();
        run_game_ticks(&mut world, 30, &InputSnapshot::IDLE);
        world.audio_queue().clear();
        world.reset();
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.player().hitbox().centerx(), 200.0);
        assert_eq!(world.player().body.vy, 0.0);
        assert_eq!(world.audio_queue().pending(), &[AudioEvent::LevelStarted]);
    }

    // ================================================================
    // Game trait contract tests
    // ================================================================

    #[test]
    fn contract_advances_ticks() {
        contract_update_advances_ticks(&mut world());
    }

    #[test]
    fn contract_pause() {
        contract_pause_stops_updates(&mut world());
    }

    #[test]
    fn contract_reset() {
        contract_reset_restarts_run(&mut world());
    }

    #[test]
    fn contract_noop_after_win() {
        let mut world = flat_world();
        world.total_coins = 1;
        world.update(&InputSnapshot::IDLE);
        assert!(world.is_round_complete());
        contract_update_after_completion_is_noop(&mut world);
    }
}
