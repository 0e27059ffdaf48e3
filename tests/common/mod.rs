#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::assets::{Sprite, Sprites};
use space_shooter::collision::Rect;
use space_shooter::entities::{Playfield, SpawnEnv};
use space_shooter::render::{Canvas, Hud};

pub const FIELD: Playfield = Playfield::new(640.0, 384.0);

/// One 60 Hz frame in milliseconds.
pub const FRAME_MS: f32 = 1000.0 / 60.0;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn sprites() -> Sprites {
    Sprites::builtin(FIELD, &mut seeded_rng()).expect("built-in art loads")
}

pub fn env(sprites: &Sprites) -> SpawnEnv<'_> {
    SpawnEnv {
        sprites,
        field: FIELD,
    }
}

/// Canvas + HUD double that records every call.
#[derive(Default)]
pub struct Recorder {
    pub clears: usize,
    /// (sprite name, x, y, rotation) in draw order.
    pub sprites: Vec<(String, f32, f32, f32)>,
    pub rects: Vec<Rect>,
    pub scores: Vec<u32>,
    pub game_over: Option<bool>,
}

impl Recorder {
    pub fn names(&self) -> Vec<&str> {
        self.sprites.iter().map(|(name, ..)| name.as_str()).collect()
    }
}

impl Canvas for Recorder {
    fn clear(&mut self) {
        self.clears += 1;
        self.sprites.clear();
        self.rects.clear();
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, rotation: f32) {
        self.sprites.push((sprite.name.clone(), x, y, rotation));
    }

    fn stroke_rect(&mut self, rect: &Rect) {
        self.rects.push(*rect);
    }
}

impl Hud for Recorder {
    fn show_score(&mut self, score: u32) {
        self.scores.push(score);
    }

    fn show_game_over(&mut self, visible: bool) {
        self.game_over = Some(visible);
    }
}
