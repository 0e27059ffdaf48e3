//! The player's ship: held-key movement, clamping and cooldown-gated fire.

use rand::RngCore;

use crate::assets::SpriteId;
use crate::collision::Rect;
use crate::entities::{frames, Body, Entity, PlayerBullet, SpawnEnv};
use crate::input::Controls;
use crate::pool::Pool;

pub const SHIP_SPEED: f32 = 6.0;

/// Frames (60 Hz-normalised) between two shots while fire is held.
pub const FIRE_RATE: f32 = 10.0;

pub const PLAYER_BULLET_SPEED: f32 = 7.0;

pub const SHIP_BULLETS: usize = 30;

#[derive(Clone, Debug)]
pub struct Ship {
    pub body: Body,
    /// Frames since the last shot.
    pub counter: f32,
    pub bullets: Pool<PlayerBullet>,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Ship {
    pub fn new() -> Self {
        Ship {
            body: Body::default(),
            counter: 0.0,
            bullets: Pool::new(SHIP_BULLETS),
        }
    }

    /// Place the ship at the left edge, vertically centred, with an empty
    /// magazine.
    pub fn init(&mut self, env: &SpawnEnv, rng: &mut dyn RngCore) {
        let height = env.sprites.get(SpriteId::Ship).height();
        let y = (env.field.height / 2.0 - height / 2.0).floor();
        self.spawn(0.0, y, SHIP_SPEED, env, rng);
        self.counter = 0.0;
        self.bullets.reset();
    }

    /// One tick of movement and firing.  Each axis is clamped to the
    /// playfield after it moves.
    pub fn update(&mut self, dt: f32, controls: Controls, env: &SpawnEnv, rng: &mut dyn RngCore) {
        let n = frames(dt);
        let step = self.body.speed * n;
        let field = env.field;
        self.counter += n;

        let body = &mut self.body;
        if controls.left {
            body.x -= step;
            if body.x <= 0.0 {
                body.x = 0.0;
            }
        }
        if controls.right {
            body.x += step;
            if body.x >= field.width - body.width {
                body.x = field.width - body.width;
            }
        }
        if controls.up {
            body.y -= step;
            if body.y <= 0.0 {
                body.y = 0.0;
            }
        }
        if controls.down {
            body.y += step;
            if body.y >= field.height - body.height {
                body.y = field.height - body.height;
            }
        }

        if controls.fire && self.counter >= FIRE_RATE {
            self.fire(env, rng);
            self.counter = 0.0;
        }
        self.refresh_bbox();
    }

    /// Launch a bullet from the nose.  Returns `false` when every bullet is
    /// already in flight.
    pub fn fire(&mut self, env: &SpawnEnv, rng: &mut dyn RngCore) -> bool {
        let x = self.body.x + self.body.width - 8.0;
        let y = self.body.y + self.body.height * 5.0 / 8.0 - 1.0;
        self.bullets
            .get(x, y, PLAYER_BULLET_SPEED, env, rng)
            .is_some()
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.body.x + self.body.width / 2.0,
            self.body.y + self.body.height / 2.0,
        )
    }
}

impl Entity for Ship {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn load(&mut self, env: &SpawnEnv, _rng: &mut dyn RngCore) {
        let sprite = env.sprites.get(SpriteId::Ship);
        self.body.width = sprite.width();
        self.body.height = sprite.height();
    }

    fn sprite(&self) -> SpriteId {
        SpriteId::Ship
    }

    /// Wings and nose excluded: the middle half of the sprite's height.
    fn hitbox(&self) -> Rect {
        let b = &self.body;
        Rect::new(b.x, b.y + b.height / 4.0, b.width, b.height / 2.0)
    }
}
