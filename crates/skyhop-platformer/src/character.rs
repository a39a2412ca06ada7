use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;
use skyhop_core::input::InputSnapshot;

use crate::animation::{AnimKey, AnimationState, AnimationTable, Facing, MotionState, SpriteKind};
use crate::config::{PlatformerConfig, Size};
use crate::level_gen::Platform;
use crate::physics::{Contacts, PhysicsBody, Side, WallResponse, WorldBounds};

/// Turns a tick's input into a horizontal velocity.
pub trait Steering {
    fn steer(&mut self, input: &InputSnapshot, speed: f32) -> f32;
}

/// Keyboard-driven movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerControl;

impl Steering for PlayerControl {
    fn steer(&mut self, input: &InputSnapshot, speed: f32) -> f32 {
        f32::from(input.move_dir()) * speed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolState {
    /// Not yet seen by the camera: no horizontal motion, no contact effects.
    Dormant,
    Patrolling,
}

/// Back-and-forth walking between walls and world bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPatrol {
    pub state: PatrolState,
    /// +1 walks right, -1 walks left.
    pub direction: i8,
}

impl EnemyPatrol {
    pub fn dormant() -> Self {
        Self {
            state: PatrolState::Dormant,
            direction: 1,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == PatrolState::Patrolling
    }

    /// Wake once `right_edge` is left of the camera's right edge plus `lead`.
    /// One-way: a patrolling enemy never goes back to sleep.
    pub fn wake_if_visible(&mut self, right_edge: f32, camera_right: f32, lead: f32) -> bool {
        if self.state == PatrolState::Dormant && right_edge < camera_right + lead {
            self.state = PatrolState::Patrolling;
            return true;
        }
        false
    }

    /// Point back inward after being clamped against a world bound.
    pub fn turn_away_from(&mut self, side: Side) {
        self.direction = match side {
            Side::Left => 1,
            Side::Right => -1,
        };
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

impl Steering for EnemyPatrol {
    fn steer(&mut self, _input: &InputSnapshot, speed: f32) -> f32 {
        match self.state {
            PatrolState::Dormant => 0.0,
            PatrolState::Patrolling => speed * f32::from(self.direction),
        }
    }
}

/// Kind-specific behavior composed into a [`Character`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Player(PlayerControl),
    Enemy(EnemyPatrol),
}

/// A physics body plus animation and behavior: the player or one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub body: PhysicsBody,
    pub sprite: SpriteKind,
    pub sprite_size: Size,
    /// Sprite is drawn this far above the hitbox center.
    pub visual_offset_y: f32,
    pub behavior: Behavior,
    pub motion: MotionState,
    pub facing: Facing,
    pub anim: AnimationState,
    /// Set while the player is in damaging contact with an enemy.
    pub hurt: bool,
}

impl Character {
    fn with_sprite(
        sprite_rect: Rect,
        sprite: SpriteKind,
        speed: f32,
        behavior: Behavior,
        config: &PlatformerConfig,
    ) -> Self {
        let shrink = config.sprites.hitbox_shrink;
        let hitbox = sprite_rect.inflate(-shrink.width, -shrink.height);
        Self {
            body: PhysicsBody::new(hitbox, speed),
            sprite,
            sprite_size: Size::new(sprite_rect.width, sprite_rect.height),
            visual_offset_y: config.sprites.visual_offset_y,
            behavior,
            motion: MotionState::Idle,
            facing: Facing::Right,
            anim: AnimationState::new(AnimKey::Idle),
            hurt: false,
        }
    }

    /// Player whose sprite is horizontally centered on `center_x` with its top at `top`.
    pub fn player(center_x: f32, top: f32, config: &PlatformerConfig) -> Self {
        let size = config.sprites.player;
        let sprite_rect = Rect::new(center_x - size.width / 2.0, top, size.width, size.height);
        Self::with_sprite(
            sprite_rect,
            SpriteKind::Player,
            config.physics.player_speed,
            Behavior::Player(PlayerControl),
            config,
        )
    }

    /// Dormant enemy whose sprite is centered on `(center_x, center_y)`.
    pub fn enemy(center_x: f32, center_y: f32, config: &PlatformerConfig) -> Self {
        let size = config.sprites.enemy;
        let sprite_rect = Rect::from_center(center_x, center_y, size.width, size.height);
        Self::with_sprite(
            sprite_rect,
            SpriteKind::Zombie,
            config.physics.enemy_speed,
            Behavior::Enemy(EnemyPatrol::dormant()),
            config,
        )
    }

    /// Players are always active; enemies only once patrolling.
    pub fn is_active(&self) -> bool {
        match &self.behavior {
            Behavior::Player(_) => true,
            Behavior::Enemy(patrol) => patrol.is_active(),
        }
    }

    pub fn patrol(&self) -> Option<&EnemyPatrol> {
        match &self.behavior {
            Behavior::Enemy(patrol) => Some(patrol),
            Behavior::Player(_) => None,
        }
    }

    pub fn patrol_mut(&mut self) -> Option<&mut EnemyPatrol> {
        match &mut self.behavior {
            Behavior::Enemy(patrol) => Some(patrol),
            Behavior::Player(_) => None,
        }
    }

    pub fn hitbox(&self) -> &Rect {
        &self.body.hitbox
    }

    /// Sprite rectangle, derived from the hitbox center.
    pub fn visual_rect(&self) -> Rect {
        let hb = &self.body.hitbox;
        Rect::from_center(
            hb.centerx(),
            hb.centery() - self.visual_offset_y,
            self.sprite_size.width,
            self.sprite_size.height,
        )
    }

    /// Move the sprite so its center x is `center_x` and its top is `top`,
    /// zeroing velocity. Used on reset instead of rebuilding the player.
    pub fn respawn(&mut self, center_x: f32, top: f32) {
        let center_y = top + self.sprite_size.height / 2.0;
        self.body.hitbox.set_center(center_x, center_y);
        self.body.vx = 0.0;
        self.body.vy = 0.0;
        self.body.can_jump = false;
        self.motion = MotionState::Idle;
        self.facing = Facing::Right;
        self.anim = AnimationState::new(AnimKey::Idle);
        self.hurt = false;
    }

    /// Assign this tick's horizontal velocity from the behavior.
    pub fn steer(&mut self, input: &InputSnapshot) {
        let speed = self.body.speed;
        self.body.vx = match &mut self.behavior {
            Behavior::Player(control) => control.steer(input, speed),
            Behavior::Enemy(patrol) => patrol.steer(input, speed),
        };
    }

    pub fn jump(&mut self, impulse: f32) -> bool {
        self.body.jump(impulse)
    }

    /// Resolve physics, apply the patrol turn rules, then refresh motion
    /// state and animation.
    pub fn update(
        &mut self,
        platforms: &[Platform],
        bounds: WorldBounds,
        gravity: f32,
        table: &AnimationTable,
    ) -> Contacts {
        let response = if matches!(self.behavior, Behavior::Enemy(p) if p.is_active()) {
            WallResponse::Rebound
        } else {
            WallResponse::Block
        };
        let contacts = self.body.step(platforms, bounds, gravity, response);

        if let Behavior::Enemy(patrol) = &mut self.behavior {
            if let Some(side) = contacts.clamped {
                patrol.turn_away_from(side);
            }
            if contacts.rebounded {
                patrol.reverse();
            }
        }

        self.derive_motion();
        self.anim.advance(table, self.sprite, self.motion, self.facing);
        contacts
    }

    fn derive_motion(&mut self) {
        if self.body.vx == 0.0 {
            // Facing persists while idle.
            self.motion = MotionState::Idle;
        } else {
            self.motion = MotionState::Walk;
            self.facing = if self.body.vx > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            };
        }
    }
}
