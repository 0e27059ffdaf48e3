//! Presentation seams.  The simulation draws through these traits and never
//! touches the terminal itself.

use crate::assets::Sprite;
use crate::collision::Rect;

/// A fixed-size drawing surface, cleared and redrawn every frame.
pub trait Canvas {
    fn clear(&mut self);

    /// Draw `sprite` with its top-left corner at (`x`, `y`) pixels.  A non-zero
    /// `rotation` (radians) pivots on the sprite centre.
    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, rotation: f32);

    /// Outline a bounding box (debug overlay).
    fn stroke_rect(&mut self, rect: &Rect);
}

/// Score readout and the game-over banner.
pub trait Hud {
    fn show_score(&mut self, score: u32);
    fn show_game_over(&mut self, visible: bool);
}
