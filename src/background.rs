//! Three-layer parallax starfield.

use crate::assets::{SpriteId, Sprites};
use crate::entities::{frames, Playfield};
use crate::render::Canvas;

/// Scroll speed per layer, back to front.  Nearer layers move faster.
pub const LAYER_SPEEDS: [f32; 3] = [2.0, 3.0, 5.0];

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    /// Width of the layer's art in pixels.
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub layers: [Layer; 3],
}

impl Background {
    pub fn new(sprites: &Sprites) -> Self {
        Self::with_widths([0, 1, 2].map(|i| sprites.get(SpriteId::Background(i)).width()))
    }

    pub fn with_widths(widths: [f32; 3]) -> Self {
        let layers = [0, 1, 2].map(|i| Layer {
            x: 0.0,
            y: 0.0,
            speed: LAYER_SPEEDS[i],
            width: widths[i],
        });
        Background { layers }
    }

    pub fn reset(&mut self) {
        for (layer, speed) in self.layers.iter_mut().zip(LAYER_SPEEDS) {
            layer.x = 0.0;
            layer.y = 0.0;
            layer.speed = speed;
        }
    }

    /// Pan every layer left, snapping back to 0 once it has scrolled a full
    /// width.
    pub fn advance(&mut self, dt: f32) {
        let n = frames(dt);
        for layer in self.layers.iter_mut() {
            layer.x -= layer.speed * n;
            if layer.x + layer.width <= 0.0 {
                layer.x = 0.0;
            }
        }
    }

    /// Each layer is drawn twice, one canvas width apart, so the wrap is
    /// seamless.
    pub fn draw(&self, canvas: &mut dyn Canvas, sprites: &Sprites, field: Playfield) {
        for (i, layer) in self.layers.iter().enumerate() {
            let sprite = sprites.get(SpriteId::Background(i));
            canvas.draw_sprite(sprite, layer.x, layer.y, 0.0);
            canvas.draw_sprite(sprite, layer.x + field.width, layer.y, 0.0);
        }
    }
}
