//! Pooled entity kinds and the behaviour they share.
//!
//! Every kind embeds a [`Body`] and implements [`Entity`], which provides
//! spawning, clearing and drawing on top of the kind's own `load`.  Movement
//! is kind-specific because each kind reacts to a different part of the world.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};

use crate::assets::{SpriteId, Sprites, ASTEROID_VARIANTS};
use crate::collision::Rect;
use crate::render::Canvas;

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Vertical patrol speed of enemies, pixels per 60 Hz frame.
pub const ENEMY_PATROL_SPEED: f32 = 1.5;

/// Frames (60 Hz-normalised) between two enemy shots.
pub const ENEMY_FIRE_RATE: f32 = 100.0;

/// Spin of enemy bullets, radians per 60 Hz frame.
pub const ENEMY_BULLET_SPIN: f32 = 0.2;

/// Convert a millisecond delta into 60 Hz frames, the unit every speed is
/// expressed in.
pub fn frames(dt: f32) -> f32 {
    dt * 60.0 / 1000.0
}

/// Keep an angle in `[0, 2π)`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Playfield { width, height }
    }

    /// True once `rect` lies entirely outside the playfield.
    pub fn has_left(&self, rect: &Rect) -> bool {
        rect.x + rect.width <= 0.0
            || rect.x >= self.width
            || rect.y + rect.height <= 0.0
            || rect.y >= self.height
    }
}

/// What `load` may consult when a slot is (re)spawned.
#[derive(Clone, Copy)]
pub struct SpawnEnv<'a> {
    pub sprites: &'a Sprites,
    pub field: Playfield,
}

/// State common to every entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// `false` means the slot is dead; its geometry is stale.
    pub visible: bool,
    pub bbox: Rect,
}

impl Body {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

pub trait Entity: Default {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Kind-specific setup run at every spawn: sprite size and any
    /// randomised fields.
    fn load(&mut self, env: &SpawnEnv, rng: &mut dyn RngCore);

    fn sprite(&self) -> SpriteId;

    fn rotation(&self) -> f32 {
        0.0
    }

    /// Collision box for the current position.
    fn hitbox(&self) -> Rect {
        self.body().rect()
    }

    /// The box this entity threatens the ship with while it is drawn, or
    /// `None` for kinds with no such collision behaviour.
    fn hazard(&self) -> Option<Rect> {
        None
    }

    fn spawn(&mut self, x: f32, y: f32, speed: f32, env: &SpawnEnv, rng: &mut dyn RngCore) {
        self.load(env, rng);
        let body = self.body_mut();
        body.x = x;
        body.y = y;
        body.speed = speed;
        body.visible = true;
        self.refresh_bbox();
    }

    fn refresh_bbox(&mut self) {
        let bbox = self.hitbox();
        self.body_mut().bbox = bbox;
    }

    fn clear(&mut self) {
        self.body_mut().visible = false;
    }

    fn is_visible(&self) -> bool {
        self.body().visible
    }

    fn bbox(&self) -> Rect {
        self.body().bbox
    }

    fn draw(&self, canvas: &mut dyn Canvas, sprites: &Sprites, debug_boxes: bool) {
        let body = self.body();
        if !body.visible {
            return;
        }
        canvas.draw_sprite(sprites.get(self.sprite()), body.x, body.y, self.rotation());
        if debug_boxes {
            canvas.stroke_rect(&body.bbox);
        }
    }
}

fn size_from_sprite(body: &mut Body, env: &SpawnEnv, id: SpriteId) {
    let sprite = env.sprites.get(id);
    body.width = sprite.width();
    body.height = sprite.height();
}

// ── Player bullet ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct PlayerBullet {
    pub body: Body,
}

impl PlayerBullet {
    /// Fly right.  Returns `true` once past the right edge.
    pub fn advance(&mut self, dt: f32, field: Playfield) -> bool {
        self.body.x += self.body.speed * frames(dt);
        self.refresh_bbox();
        self.body.x >= field.width
    }
}

impl Entity for PlayerBullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn load(&mut self, env: &SpawnEnv, _rng: &mut dyn RngCore) {
        size_from_sprite(&mut self.body, env, SpriteId::PlayerBullet);
    }

    fn sprite(&self) -> SpriteId {
        SpriteId::PlayerBullet
    }
}

// ── Asteroid ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Asteroid {
    pub body: Body,
    pub variant: usize,
    pub rot: f32,
    /// Radians per frame.
    pub rspeed: f32,
    /// Vertical drift, pixels per frame.
    pub yspeed: f32,
}

impl Asteroid {
    /// Drift left while tumbling.  Returns `true` once fully past the left
    /// edge.
    pub fn advance(&mut self, dt: f32) -> bool {
        let n = frames(dt);
        self.body.x -= self.body.speed * n;
        self.body.y += self.yspeed * n;
        self.rot = wrap_angle(self.rot + self.rspeed * n);
        if self.body.x <= -self.body.width {
            return true;
        }
        self.refresh_bbox();
        false
    }
}

impl Entity for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn load(&mut self, env: &SpawnEnv, rng: &mut dyn RngCore) {
        self.variant = rng.gen_range(0..ASTEROID_VARIANTS);
        size_from_sprite(&mut self.body, env, SpriteId::Asteroid(self.variant));
        self.rspeed = (rng.gen::<f32>() - 0.5) / 20.0;
        self.yspeed = (rng.gen::<f32>() - 0.5) * 3.0;
        self.rot = 0.0;
    }

    fn sprite(&self) -> SpriteId {
        SpriteId::Asteroid(self.variant)
    }

    fn rotation(&self) -> f32 {
        self.rot
    }

    fn hitbox(&self) -> Rect {
        self.body.rect().inset_eighth()
    }

    fn hazard(&self) -> Option<Rect> {
        Some(self.body.bbox)
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Patrol {
    #[default]
    Up,
    Down,
}

impl Patrol {
    fn sign(self) -> f32 {
        match self {
            Patrol::Up => -1.0,
            Patrol::Down => 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Enemy {
    pub body: Body,
    pub direction: Patrol,
    /// The enemy flies left until it reaches this x, then holds.
    pub stop_x: f32,
    pub cooldown: f32,
}

impl Enemy {
    /// Approach, patrol and count down to the next shot.  Returns the muzzle
    /// position when the enemy fires this tick.
    pub fn advance(&mut self, dt: f32, field: Playfield) -> Option<(f32, f32)> {
        let n = frames(dt);
        let body = &mut self.body;

        if body.x > self.stop_x {
            body.x = (body.x - body.speed * n).max(self.stop_x);
        }

        body.y += self.direction.sign() * ENEMY_PATROL_SPEED * n;
        let bottom = field.height - body.height;
        if body.y <= 0.0 {
            body.y = 0.0;
            self.direction = Patrol::Down;
        } else if body.y >= bottom {
            body.y = bottom;
            self.direction = Patrol::Up;
        }

        self.refresh_bbox();

        self.cooldown += n;
        if self.cooldown >= ENEMY_FIRE_RATE {
            self.cooldown = 0.0;
            return Some((self.body.x, self.body.y + self.body.height / 2.0));
        }
        None
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn load(&mut self, env: &SpawnEnv, rng: &mut dyn RngCore) {
        size_from_sprite(&mut self.body, env, SpriteId::Enemy);
        self.direction = if rng.gen_bool(0.5) {
            Patrol::Up
        } else {
            Patrol::Down
        };
        let near = env.field.width / 2.0;
        let far = (env.field.width - self.body.width).max(near);
        self.stop_x = if far > near {
            rng.gen_range(near..far)
        } else {
            near
        };
        self.cooldown = 0.0;
    }

    fn sprite(&self) -> SpriteId {
        SpriteId::Enemy
    }

    fn hitbox(&self) -> Rect {
        self.body.rect().inset_eighth()
    }

    fn hazard(&self) -> Option<Rect> {
        Some(self.body.bbox)
    }
}

// ── Enemy bullet ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct EnemyBullet {
    pub body: Body,
    /// Velocity toward the ship's spawn-time position (hard mode).  `None`
    /// flies straight left.
    pub heading: Option<(f32, f32)>,
    pub rot: f32,
    pub rspeed: f32,
}

impl EnemyBullet {
    /// Aim at a fixed point.  The heading is never updated in flight.
    pub fn aim_at(&mut self, target_x: f32, target_y: f32) {
        let cx = self.body.x + self.body.width / 2.0;
        let cy = self.body.y + self.body.height / 2.0;
        let (dx, dy) = (target_x - cx, target_y - cy);
        let distance = dx.hypot(dy);
        if distance <= f32::EPSILON {
            return;
        }
        let vx = dx / distance * self.body.speed;
        let vy = dy / distance * self.body.speed;
        self.heading = Some((vx, vy));
        self.rspeed = if vy < 0.0 {
            -ENEMY_BULLET_SPIN
        } else {
            ENEMY_BULLET_SPIN
        };
    }

    /// Returns `true` once the bullet has left the playfield on any side.
    pub fn advance(&mut self, dt: f32, field: Playfield) -> bool {
        let n = frames(dt);
        let (vx, vy) = self.heading.unwrap_or((-self.body.speed, 0.0));
        self.body.x += vx * n;
        self.body.y += vy * n;
        self.rot = wrap_angle(self.rot + self.rspeed * n);
        self.refresh_bbox();
        field.has_left(&self.body.rect())
    }
}

impl Entity for EnemyBullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn load(&mut self, env: &SpawnEnv, _rng: &mut dyn RngCore) {
        size_from_sprite(&mut self.body, env, SpriteId::EnemyBullet);
        self.heading = None;
        self.rot = 0.0;
        self.rspeed = 0.0;
    }

    fn sprite(&self) -> SpriteId {
        SpriteId::EnemyBullet
    }

    fn rotation(&self) -> f32 {
        self.rot
    }
}
