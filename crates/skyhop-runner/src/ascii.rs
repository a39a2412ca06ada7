use std::fmt;

use skyhop_core::geometry::Rect;
use skyhop_platformer::animation::AnimationTable;
use skyhop_platformer::{Canvas, Sprite};

/// Pixels per character cell.
pub const CELL_WIDTH: f32 = 10.0;
pub const CELL_HEIGHT: f32 = 20.0;

/// Text-mode canvas: every blit fills the cells its rectangle covers.
pub struct AsciiCanvas<'a> {
    table: &'a AnimationTable,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    hud: String,
}

impl<'a> AsciiCanvas<'a> {
    pub fn new(screen_width: f32, screen_height: f32, table: &'a AnimationTable) -> Self {
        let cols = (screen_width / CELL_WIDTH).ceil().max(1.0) as usize;
        let rows = (screen_height / CELL_HEIGHT).ceil().max(1.0) as usize;
        Self {
            table,
            cols,
            rows,
            cells: vec![' '; cols * rows],
            hud: String::new(),
        }
    }

    fn glyph(&self, sprite: Sprite) -> Option<char> {
        match sprite {
            Sprite::Background => None,
            Sprite::GroundBlock => Some('='),
            Sprite::BrickBlock => Some('#'),
            Sprite::Frame(handle) => {
                let name = self.table.asset_name(handle);
                Some(match name.split('_').next() {
                    Some("player") => '@',
                    Some("zombie") => 'Z',
                    Some("coin") => 'o',
                    _ => '?',
                })
            },
        }
    }

    #[cfg(test)]
    fn cell(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }
}

/// Cell span covered by `[start, end)` pixels, clipped to `limit` cells.
fn span(start: f32, end: f32, cell: f32, limit: usize) -> std::ops::Range<usize> {
    let first = (start / cell).floor().max(0.0) as usize;
    let last = (end / cell).ceil().max(0.0) as usize;
    first.min(limit)..last.min(limit)
}

impl Canvas for AsciiCanvas<'_> {
    fn blit(&mut self, sprite: Sprite, dest: Rect) {
        let Some(glyph) = self.glyph(sprite) else {
            return;
        };
        for row in span(dest.top(), dest.bottom(), CELL_HEIGHT, self.rows) {
            for col in span(dest.left(), dest.right(), CELL_WIDTH, self.cols) {
                self.cells[row * self.cols + col] = glyph;
            }
        }
    }

    fn hud_text(&mut self, text: &str) {
        self.hud = text.to_string();
    }
}

impl fmt::Display for AsciiCanvas<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>width$}", self.hud, width = self.cols)?;
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
