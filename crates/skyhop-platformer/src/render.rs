//! Drawing boundary. The world never touches pixels; it hands a [`Canvas`]
//! screen-space rectangles in draw order.

use skyhop_core::game_trait::Game;
use skyhop_core::geometry::Rect;

use crate::animation::{AnimationTable, FrameHandle, SpriteKind};
use crate::character::Character;
use crate::coin::Coin;
use crate::level_gen::{Platform, PlatformKind};
use crate::world::World;

/// What to put in a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Background,
    GroundBlock,
    BrickBlock,
    /// Animated character or coin frame; resolve with `AnimationTable::asset_name`.
    Frame(FrameHandle),
}

impl From<PlatformKind> for Sprite {
    fn from(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Ground => Sprite::GroundBlock,
            PlatformKind::Brick => Sprite::BrickBlock,
        }
    }
}

/// Render target supplied by the host. The host clears the screen first.
pub trait Canvas {
    /// Draw `sprite` into `dest`, given in screen coordinates.
    fn blit(&mut self, sprite: Sprite, dest: Rect);

    /// Draw the score line in the top-right corner.
    fn hud_text(&mut self, text: &str);
}

impl Platform {
    /// Blit this block with its world rect shifted by `-offset`.
    pub fn draw(&self, canvas: &mut dyn Canvas, offset_x: f32, offset_y: f32) {
        canvas.blit(self.kind.into(), self.rect.translated(-offset_x, -offset_y));
    }
}

impl Coin {
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        table: &AnimationTable,
        offset_x: f32,
        offset_y: f32,
    ) {
        let frame = self.anim.current(table, SpriteKind::Coin);
        canvas.blit(Sprite::Frame(frame), self.rect.translated(-offset_x, -offset_y));
    }
}

impl Character {
    /// Blit the current frame at the visual rect, not the hitbox.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        table: &AnimationTable,
        offset_x: f32,
        offset_y: f32,
    ) {
        let frame = self.anim.current(table, self.sprite);
        canvas.blit(
            Sprite::Frame(frame),
            self.visual_rect().translated(-offset_x, -offset_y),
        );
    }
}

impl World {
    /// Emit one frame: background, platforms, coins, player, enemies, HUD.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let cfg = self.config();
        let table = self.animation_table();
        let camera_x = self.camera_x();
        let camera_y = 0.0;
        let view_right = camera_x + cfg.screen.width;
        let in_view = |r: &Rect| r.right() > camera_x && r.left() < view_right;

        let tile = cfg.sprites.background_tile;
        let parallax = camera_x * cfg.camera.parallax_factor;
        let first_tile = (parallax / tile.width).floor();
        let tile_count = (cfg.screen.width / tile.width) as usize + 2;
        for i in 0..tile_count {
            let x = (first_tile + i as f32) * tile.width - parallax;
            canvas.blit(Sprite::Background, Rect::new(x, 0.0, tile.width, tile.height));
        }

        for platform in self.platforms().iter().filter(|p| in_view(&p.rect)) {
            platform.draw(canvas, camera_x, camera_y);
        }
        for coin in self.coins().iter().filter(|c| in_view(&c.rect)) {
            coin.draw(canvas, table, camera_x, camera_y);
        }
        self.player().draw(canvas, table, camera_x, camera_y);
        for enemy in self.enemies() {
            enemy.draw(canvas, table, camera_x, camera_y);
        }

        canvas.hud_text(&format!("Score: {}", self.score()));
    }
}
