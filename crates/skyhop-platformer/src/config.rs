use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "SKYHOP_CONFIG";
/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/skyhop.toml";

/// Width/height pair for sprite geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Visible screen area in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Per-tick motion constants. Values are pixels and pixels/tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every tick (positive = downward).
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative = upward).
    pub jump_impulse: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            jump_impulse: -22.0,
            player_speed: 5.0,
            enemy_speed: 2.0,
        }
    }
}

/// Asset geometry. The core never measures images itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub ground_block: Size,
    pub brick_block: Size,
    pub background_tile: Size,
    pub player: Size,
    pub enemy: Size,
    pub coin: Size,
    /// Amount the hitbox is smaller than the character sprite.
    pub hitbox_shrink: Size,
    /// How far the sprite is drawn above the hitbox center.
    pub visual_offset_y: f32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            ground_block: Size::new(64.0, 64.0),
            brick_block: Size::new(64.0, 64.0),
            background_tile: Size::new(256.0, 600.0),
            player: Size::new(48.0, 54.0),
            enemy: Size::new(48.0, 48.0),
            coin: Size::new(32.0, 32.0),
            hitbox_shrink: Size::new(20.0, 10.0),
            visual_offset_y: 5.0,
        }
    }
}

/// Level generation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Clusters attempted per level.
    pub cluster_count: u32,
    /// Placement attempts per cluster before it is skipped.
    pub max_attempts: u32,
    pub min_cluster_blocks: u32,
    pub max_cluster_blocks: u32,
    /// Cluster height above the ground line, in player heights.
    pub min_height_factor: f32,
    pub max_height_factor: f32,
    /// Cluster centers never go above this y.
    pub min_cluster_center_y: f32,
    /// Ground block centers sit this far above the bottom of the screen.
    pub ground_center_offset: f32,
    /// Ground strip width in screen widths.
    pub ground_screens: f32,
    /// Ground starts this many screen widths left of the spawn.
    pub ground_lead_screens: f32,
    /// Cluster padding, in player widths (horizontal) and heights (vertical).
    pub horizontal_padding_factor: f32,
    pub vertical_padding_factor: f32,
    pub enemy_chance: f64,
    pub coin_chance: f64,
    /// Safe-zone radius in screen widths.
    pub safe_zone_screens: f32,
    /// Multiplier applied to the spawn distance before the safe-zone test.
    pub safe_zone_distance_scale: f32,
    /// Enemies and coins spawn centered this far above their platform top.
    pub spawn_lift: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            cluster_count: 30,
            max_attempts: 100,
            min_cluster_blocks: 1,
            max_cluster_blocks: 5,
            min_height_factor: 1.5,
            max_height_factor: 4.0,
            min_cluster_center_y: 100.0,
            ground_center_offset: 20.0,
            ground_screens: 4.0,
            ground_lead_screens: 1.5,
            horizontal_padding_factor: 1.8,
            vertical_padding_factor: 2.0,
            enemy_chance: 0.8,
            coin_chance: 0.5,
            safe_zone_screens: 0.5,
            safe_zone_distance_scale: 1.5,
            spawn_lift: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Dormant enemies wake once their right edge is within this distance
    /// of the camera's right edge.
    pub activation_lead: f32,
    /// Background scroll rate relative to the camera.
    pub parallax_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            activation_lead: 50.0,
            parallax_factor: 0.2,
        }
    }
}

/// Ticks per animation frame, per motion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub idle_ticks: u32,
    pub walk_ticks: u32,
    pub spin_ticks: u32,
    pub fallback_ticks: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            idle_ticks: 20,
            walk_ticks: 5,
            spin_ticks: 8,
            fallback_ticks: 10,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub sprites: SpriteConfig,
    pub generation: GenerationConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "config parse error: {m}"),
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not a finite number")))
    }
}

fn check_size(field: &'static str, size: Size) -> Result<(), ConfigError> {
    let finite = size.width.is_finite() && size.height.is_finite();
    if finite && size.width > 0.0 && size.height > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "width and height must be > 0"))
    }
}

fn check_chance(field: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(field, format!("{p} is not a probability")))
    }
}

impl PlatformerConfig {
    /// Load config from `SKYHOP_CONFIG` or `config/skyhop.toml`. Falls back to
    /// defaults if the file is missing, unparseable, or fails validation.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::debug!("Loaded config from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generation;
        for (field, value) in [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("physics.gravity", self.physics.gravity),
            ("physics.jump_impulse", self.physics.jump_impulse),
            ("physics.player_speed", self.physics.player_speed),
            ("physics.enemy_speed", self.physics.enemy_speed),
            ("sprites.hitbox_shrink.width", self.sprites.hitbox_shrink.width),
            ("sprites.hitbox_shrink.height", self.sprites.hitbox_shrink.height),
            ("sprites.visual_offset_y", self.sprites.visual_offset_y),
            ("generation.min_height_factor", g.min_height_factor),
            ("generation.max_height_factor", g.max_height_factor),
            ("generation.min_cluster_center_y", g.min_cluster_center_y),
            ("generation.ground_center_offset", g.ground_center_offset),
            ("generation.ground_screens", g.ground_screens),
            ("generation.ground_lead_screens", g.ground_lead_screens),
            ("generation.horizontal_padding_factor", g.horizontal_padding_factor),
            ("generation.vertical_padding_factor", g.vertical_padding_factor),
            ("generation.safe_zone_screens", g.safe_zone_screens),
            ("generation.safe_zone_distance_scale", g.safe_zone_distance_scale),
            ("generation.spawn_lift", g.spawn_lift),
            ("camera.activation_lead", self.camera.activation_lead),
            ("camera.parallax_factor", self.camera.parallax_factor),
        ] {
            check_finite(field, value)?;
        }

        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return Err(invalid("screen", "width and height must be > 0"));
        }
        if self.physics.gravity <= 0.0 {
            return Err(invalid("physics.gravity", "must be > 0"));
        }
        if self.physics.jump_impulse >= 0.0 {
            return Err(invalid("physics.jump_impulse", "must be < 0 (upward)"));
        }
        if self.physics.player_speed <= 0.0 || self.physics.enemy_speed <= 0.0 {
            return Err(invalid("physics", "speeds must be > 0"));
        }

        let s = &self.sprites;
        check_size("sprites.ground_block", s.ground_block)?;
        check_size("sprites.brick_block", s.brick_block)?;
        check_size("sprites.background_tile", s.background_tile)?;
        check_size("sprites.player", s.player)?;
        check_size("sprites.enemy", s.enemy)?;
        check_size("sprites.coin", s.coin)?;
        for (field, sprite) in [("sprites.player", s.player), ("sprites.enemy", s.enemy)] {
            if sprite.width <= s.hitbox_shrink.width || sprite.height <= s.hitbox_shrink.height {
                return Err(invalid(field, "hitbox shrink leaves no hitbox"));
            }
        }

        if g.max_attempts == 0 {
            return Err(invalid("generation.max_attempts", "must be > 0"));
        }
        if g.min_cluster_blocks == 0 || g.min_cluster_blocks > g.max_cluster_blocks {
            return Err(invalid(
                "generation.cluster_blocks",
                "need 1 <= min_cluster_blocks <= max_cluster_blocks",
            ));
        }
        if g.min_height_factor > g.max_height_factor {
            return Err(invalid(
                "generation.height_factor",
                "min_height_factor exceeds max_height_factor",
            ));
        }
        check_chance("generation.enemy_chance", g.enemy_chance)?;
        check_chance("generation.coin_chance", g.coin_chance)?;

        let ground_blocks = self.ground_block_count();
        let ground_width = ground_blocks as f32 * s.ground_block.width;
        if ground_width < self.screen.width {
            return Err(invalid(
                "generation.ground_screens",
                "ground strip must be at least one screen wide",
            ));
        }
        if ground_width <= g.max_cluster_blocks as f32 * s.brick_block.width {
            return Err(invalid(
                "generation.max_cluster_blocks",
                "widest cluster does not fit on the ground strip",
            ));
        }
        Ok(())
    }

    /// Whole ground blocks covering `ground_screens` screen widths.
    pub fn ground_block_count(&self) -> usize {
        let span = self.screen.width * self.generation.ground_screens;
        (span / self.sprites.ground_block.width).floor().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PlatformerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_ground_has_fifty_blocks() {
        assert_eq!(PlatformerConfig::default().ground_block_count(), 50);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = PlatformerConfig::from_toml_str(
            r#"
            [physics]
            gravity = 2.0

            [generation]
            cluster_count = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.physics.gravity, 2.0);
        assert_eq!(cfg.physics.jump_impulse, -22.0);
        assert_eq!(cfg.generation.cluster_count, 5);
        assert_eq!(cfg.generation.max_attempts, 100);
        assert_eq!(cfg.screen.width, 800.0);
    }

    #[test]
    fn shipped_config_parses() {
        let cfg = PlatformerConfig::from_toml_str(include_str!("../../../config/skyhop.toml"))
            .unwrap();
        assert_eq!(cfg.generation.cluster_count, 30);
        assert_eq!(cfg.sprites.hitbox_shrink, Size::new(20.0, 10.0));
        assert_eq!(cfg.camera.parallax_factor, 0.2);
    }

    #[test]
    fn garbage_toml_is_parse_error() {
        let err = PlatformerConfig::from_toml_str("[physics\ngravity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn upward_gravity_rejected() {
        let mut cfg = PlatformerConfig::default();
        cfg.physics.gravity = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "physics.gravity",
                ..
            })
        ));
    }

    #[test]
    fn nan_height_factor_rejected() {
        let err = PlatformerConfig::from_toml_str("[generation]\nmin_height_factor = nan\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "generation.min_height_factor",
                ..
            }
        ));
    }

    #[test]
    fn infinite_values_rejected() {
        let mut cfg = PlatformerConfig::default();
        cfg.camera.activation_lead = f32::INFINITY;
        assert!(cfg.validate().is_err());

        let mut cfg = PlatformerConfig::default();
        cfg.sprites.coin.width = f32::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_block_range_rejected() {
        let mut cfg = PlatformerConfig::default();
        cfg.generation.min_cluster_blocks = 6;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn out_of_range_chance_rejected() {
        let mut cfg = PlatformerConfig::default();
        cfg.generation.coin_chance = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("coin_chance"));
    }

    #[test]
    fn narrow_ground_rejected() {
        let mut cfg = PlatformerConfig::default();
        cfg.generation.ground_screens = 0.5;
        assert!(cfg.validate().is_err());
    }
}
