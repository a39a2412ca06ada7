use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::character::Character;
use crate::coin::Coin;
use crate::config::PlatformerConfig;
use crate::physics::WorldBounds;

/// Which sprite a platform is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Ground,
    Brick,
}

/// A static solid block. Never moves or disappears during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn ground(rect: Rect) -> Self {
        Self {
            rect,
            kind: PlatformKind::Ground,
        }
    }

    pub fn brick(rect: Rect) -> Self {
        Self {
            rect,
            kind: PlatformKind::Brick,
        }
    }
}

/// A run of floating bricks placed as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Unpadded footprint of the whole run.
    pub rect: Rect,
    /// Indices of this cluster's bricks in [`Level::platforms`].
    pub platforms: Range<usize>,
}

/// Placement bookkeeping for one generated level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub clusters_placed: u32,
    /// Clusters abandoned after exhausting their placement attempts.
    pub clusters_skipped: u32,
    /// Rejected candidates across all clusters.
    pub rejected_candidates: u32,
}

/// Everything a fresh run starts with.
#[derive(Debug, Clone)]
pub struct Level {
    /// Ground tiles first (left to right), then bricks cluster by cluster.
    pub platforms: Vec<Platform>,
    pub clusters: Vec<Cluster>,
    pub enemies: Vec<Character>,
    pub coins: Vec<Coin>,
    pub bounds: WorldBounds,
    /// y of the ground strip's walkable surface.
    pub ground_top: f32,
    pub total_coins: usize,
    pub total_enemies: usize,
    pub stats: LevelStats,
}

/// Builds levels from the generation section of the config.
pub struct LevelGenerator<'a> {
    config: &'a PlatformerConfig,
}

impl<'a> LevelGenerator<'a> {
    pub fn new(config: &'a PlatformerConfig) -> Self {
        Self { config }
    }

    /// Padding applied to both sides of an overlap test between clusters.
    pub fn cluster_padding(&self) -> (f32, f32) {
        let g = &self.config.generation;
        let player = self.config.sprites.player;
        (
            g.horizontal_padding_factor * player.width,
            g.vertical_padding_factor * player.height,
        )
    }

    /// Generate a level around a player spawning at `spawn_x`.
    pub fn generate<R: Rng + ?Sized>(&self, spawn_x: f32, rng: &mut R) -> Level {
        let cfg = self.config;
        let g = &cfg.generation;

        let mut platforms = Vec::new();
        let (bounds, ground_top) = self.lay_ground(spawn_x, &mut platforms);

        let mut clusters: Vec<Cluster> = Vec::new();
        let mut enemies = Vec::new();
        let mut coins = Vec::new();
        let mut stats = LevelStats::default();
        let safe_zone_radius = cfg.screen.width * g.safe_zone_screens;
        let brick = cfg.sprites.brick_block;
        let coin_size = cfg.sprites.coin;

        for _ in 0..g.cluster_count {
            let Some((footprint, blocks)) = self.place_cluster(rng, bounds, &clusters, &mut stats)
            else {
                stats.clusters_skipped += 1;
                continue;
            };

            let first = platforms.len();
            for i in 0..blocks {
                let rect = Rect::new(
                    footprint.x + i as f32 * brick.width,
                    footprint.y,
                    brick.width,
                    brick.height,
                );
                platforms.push(Platform::brick(rect));
            }
            let range = first..platforms.len();
            clusters.push(Cluster {
                rect: footprint,
                platforms: range.clone(),
            });
            stats.clusters_placed += 1;

            if !range.is_empty() && rng.random_bool(g.enemy_chance) {
                let chosen = platforms[rng.random_range(range.clone())].rect;
                let distance = (chosen.centerx() - spawn_x).abs() * g.safe_zone_distance_scale;
                if distance > safe_zone_radius {
                    enemies.push(Character::enemy(
                        chosen.centerx(),
                        chosen.top() - g.spawn_lift,
                        cfg,
                    ));
                }
            }

            for platform in &platforms[range] {
                if rng.random_bool(g.coin_chance) {
                    let p = platform.rect;
                    coins.push(Coin::new(Rect::from_center(
                        p.centerx(),
                        p.top() - g.spawn_lift,
                        coin_size.width,
                        coin_size.height,
                    )));
                }
            }
        }

        tracing::debug!(
            placed = stats.clusters_placed,
            skipped = stats.clusters_skipped,
            rejected = stats.rejected_candidates,
            enemies = enemies.len(),
            coins = coins.len(),
            "level generated"
        );

        Level {
            total_coins: coins.len(),
            total_enemies: enemies.len(),
            platforms,
            clusters,
            enemies,
            coins,
            bounds,
            ground_top,
            stats,
        }
    }

    /// Tile the ground strip. Returns the world bounds and the walkable y.
    fn lay_ground(&self, spawn_x: f32, platforms: &mut Vec<Platform>) -> (WorldBounds, f32) {
        let cfg = self.config;
        let block = cfg.sprites.ground_block;
        let center_y = cfg.screen.height - cfg.generation.ground_center_offset;
        let top = center_y - block.height / 2.0;
        let start_x = spawn_x - cfg.screen.width * cfg.generation.ground_lead_screens;

        for i in 0..cfg.ground_block_count() {
            let rect = Rect::new(
                start_x + i as f32 * block.width,
                top,
                block.width,
                block.height,
            );
            platforms.push(Platform::ground(rect));
        }

        let bounds = WorldBounds {
            start_x: platforms.first().map_or(start_x, |p| p.rect.left()),
            end_x: platforms.last().map_or(start_x, |p| p.rect.right()),
        };
        (bounds, top)
    }

    /// Rejection-sample one cluster footprint. `None` once every attempt
    /// collided with an accepted cluster.
    fn place_cluster<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bounds: WorldBounds,
        accepted: &[Cluster],
        stats: &mut LevelStats,
    ) -> Option<(Rect, u32)> {
        let cfg = self.config;
        let g = &cfg.generation;
        let brick = cfg.sprites.brick_block;
        let player_h = cfg.sprites.player.height;
        let ground_center_y = cfg.screen.height - g.ground_center_offset;
        let (h_pad, v_pad) = self.cluster_padding();

        for _ in 0..g.max_attempts {
            let blocks = rng.random_range(g.min_cluster_blocks..=g.max_cluster_blocks);
            let width = blocks as f32 * brick.width;
            let max_x = (bounds.end_x - width).max(bounds.start_x);
            let x = rng.random_range(bounds.start_x..=max_x);
            let lift = rng.random_range(
                player_h * g.min_height_factor..=player_h * g.max_height_factor,
            );
            let center_y = (ground_center_y - lift).max(g.min_cluster_center_y);

            let candidate = Rect::new(x, center_y - brick.height / 2.0, width, brick.height);
            let padded = candidate.inflate(h_pad, v_pad);
            let clear = accepted
                .iter()
                .all(|c| !padded.overlaps(&c.rect.inflate(h_pad, v_pad)));
            if clear {
                return Some((candidate, blocks));
            }
            stats.rejected_candidates += 1;
        }
        None
    }
}
