//! Axis-aligned bounding boxes and the collision rules between pools.

use crate::entities::{Asteroid, Enemy, Entity};
use crate::pool::Pool;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap test: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Shrink to 3/4 size, keeping the centre.
    pub fn inset_eighth(&self) -> Rect {
        Rect {
            x: self.x + self.width / 8.0,
            y: self.y + self.height / 8.0,
            width: self.width * 3.0 / 4.0,
            height: self.height * 3.0 / 4.0,
        }
    }
}

/// What a player bullet struck this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletHit {
    Nothing,
    Asteroid,
    /// The enemy was cleared and moved to its pool's tail.
    Enemy,
}

impl BulletHit {
    pub fn expires_bullet(self) -> bool {
        self != BulletHit::Nothing
    }
}

/// Player bullet against asteroids, then enemies.  Asteroids only stop the
/// bullet; the first enemy hit is retired.
pub fn resolve_player_bullet(
    bullet: &Rect,
    asteroids: &Pool<Asteroid>,
    enemies: &mut Pool<Enemy>,
) -> BulletHit {
    if first_asteroid(bullet, asteroids).is_some() {
        return BulletHit::Asteroid;
    }
    match first_overlap(bullet, enemies) {
        Some(index) => {
            enemies.retire(index);
            BulletHit::Enemy
        }
        None => BulletHit::Nothing,
    }
}

/// What an enemy bullet struck this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyBulletHit {
    Nothing,
    Asteroid,
    Ship,
}

/// Enemy bullet against asteroids, then the ship.
pub fn resolve_enemy_bullet(bullet: &Rect, asteroids: &Pool<Asteroid>, ship: &Rect) -> EnemyBulletHit {
    if first_asteroid(bullet, asteroids).is_some() {
        EnemyBulletHit::Asteroid
    } else if bullet.overlaps(ship) {
        EnemyBulletHit::Ship
    } else {
        EnemyBulletHit::Nothing
    }
}

/// Index of the first live entity whose box overlaps `target`.
pub fn first_overlap<T: Entity>(target: &Rect, pool: &Pool<T>) -> Option<usize> {
    pool.live().position(|entity| entity.bbox().overlaps(target))
}

/// Index of the first live asteroid whose sprite overlaps `target`.  Bullets
/// meet the whole sprite; the inset box only guards the ship.
pub fn first_asteroid(target: &Rect, asteroids: &Pool<Asteroid>) -> Option<usize> {
    asteroids.live().position(|rock| rock.body.rect().overlaps(target))
}
