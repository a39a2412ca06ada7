use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::level_gen::Platform;

/// Horizontal extent of the ground strip. Every body is clamped inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub start_x: f32,
    pub end_x: f32,
}

impl WorldBounds {
    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        rect.left() >= self.start_x && rect.right() <= self.end_x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// What a side-on wall contact does to horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Snap and keep `vx`; the next tick pushes into the wall again.
    Block,
    /// Snap and zero `vx` for the rest of the tick.
    Rebound,
}

/// Everything the resolver touched during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// World bound the body was clamped against.
    pub clamped: Option<Side>,
    /// Side of the body that snapped against a platform.
    pub wall: Option<Side>,
    /// Set when the wall contact zeroed `vx` (only with `WallResponse::Rebound`).
    pub rebounded: bool,
    pub landed: bool,
    pub bumped_head: bool,
}

/// Position, velocity, and hitbox of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub hitbox: Rect,
    pub vx: f32,
    pub vy: f32,
    /// Nominal horizontal speed. Also sizes the side-snap tolerance.
    pub speed: f32,
    pub can_jump: bool,
}

impl PhysicsBody {
    pub fn new(hitbox: Rect, speed: f32) -> Self {
        Self {
            hitbox,
            vx: 0.0,
            vy: 0.0,
            speed,
            can_jump: false,
        }
    }

    /// Apply the jump impulse if grounded. Returns whether the jump happened.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if !self.can_jump {
            return false;
        }
        self.vy = impulse;
        self.can_jump = false;
        true
    }

    /// Advance one tick: horizontal pass, then vertical pass.
    pub fn step(
        &mut self,
        platforms: &[Platform],
        bounds: WorldBounds,
        gravity: f32,
        response: WallResponse,
    ) -> Contacts {
        let mut contacts = Contacts::default();
        self.resolve_horizontal(platforms, bounds, response, &mut contacts);
        self.resolve_vertical(platforms, gravity, &mut contacts);
        contacts
    }

    pub(crate) fn resolve_horizontal(
        &mut self,
        platforms: &[Platform],
        bounds: WorldBounds,
        response: WallResponse,
        contacts: &mut Contacts,
    ) {
        self.hitbox.x += self.vx;

        if self.hitbox.left() < bounds.start_x {
            self.hitbox.set_left(bounds.start_x);
            contacts.clamped = Some(Side::Left);
        } else if self.hitbox.right() > bounds.end_x {
            self.hitbox.set_right(bounds.end_x);
            contacts.clamped = Some(Side::Right);
        }

        // Only penetrations a single tick at `speed` could produce are snapped.
        let tolerance = self.speed + 1.0;
        for platform in platforms {
            let p = &platform.rect;
            if !self.hitbox.overlaps(p) {
                continue;
            }
            let side = if self.vx > 0.0 && (self.hitbox.right() - p.left()).abs() < tolerance {
                self.hitbox.set_right(p.left());
                Side::Right
            } else if self.vx < 0.0 && (self.hitbox.left() - p.right()).abs() < tolerance {
                self.hitbox.set_left(p.right());
                Side::Left
            } else {
                continue;
            };
            contacts.wall = Some(side);
            if response == WallResponse::Rebound {
                self.vx = 0.0;
                contacts.rebounded = true;
            }
        }
    }

    pub(crate) fn resolve_vertical(
        &mut self,
        platforms: &[Platform],
        gravity: f32,
        contacts: &mut Contacts,
    ) {
        // Gravity is unconditional; a grounded body sinks one step and is
        // snapped back by the landing check below.
        self.vy += gravity;
        self.hitbox.y += self.vy;
        self.can_jump = false;

        for platform in platforms {
            let p = &platform.rect;
            if !self.hitbox.overlaps(p) {
                continue;
            }
            if self.vy > 0.0 && self.hitbox.bottom() <= p.top() + self.vy {
                self.hitbox.set_bottom(p.top());
                self.vy = 0.0;
                self.can_jump = true;
                contacts.landed = true;
            } else if self.vy < 0.0 && self.hitbox.top() >= p.bottom() - self.vy.abs() {
                self.hitbox.set_top(p.bottom());
                self.vy = 0.0;
                contacts.bumped_head = true;
            }
        }
    }
}

/// Smaller of the two axis penetrations between `a` and `b` (0 when apart).
pub fn penetration_depth(a: &Rect, b: &Rect) -> f32 {
    if !a.overlaps(b) {
        return 0.0;
    }
    let dx = a.right().min(b.right()) - a.left().max(b.left());
    let dy = a.bottom().min(b.bottom()) - a.top().max(b.top());
    dx.min(dy)
}
