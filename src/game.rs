//! Game session: the Loading → Running → GameOver state machine, the
//! per-frame physics step and back-to-front rendering.
//!
//! All randomness comes from the session's own `StdRng` so callers control
//! determinism (tests seed it).

use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use tracing::{debug, info, trace};

use crate::assets::{SpriteId, Sprites};
use crate::background::Background;
use crate::collision::{resolve_enemy_bullet, resolve_player_bullet, BulletHit, EnemyBulletHit};
use crate::entities::{Asteroid, Enemy, EnemyBullet, Entity, Playfield, SpawnEnv};
use crate::input::Controls;
use crate::pool::Pool;
use crate::render::{Canvas, Hud};
use crate::ship::Ship;

// ── Pool sizes & spawning ─────────────────────────────────────────────────────

pub const ASTEROID_POOL: usize = 8;
pub const ENEMY_POOL: usize = 7;
pub const ENEMY_BULLET_POOL: usize = 50;

/// Per-frame probability threshold for a new asteroid or enemy.
pub const SPAWN_CHANCE: f64 = 0.005;

pub const ENEMY_BULLET_SPEED: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub field: Playfield,
    /// Enemy bullets aim at the ship instead of flying straight.
    pub hard_mode: bool,
    /// Outline every bounding box.
    pub debug_boxes: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Running,
    GameOver,
}

// ── Frame clock ───────────────────────────────────────────────────────────────

/// Wall-clock delta accumulator.
///
/// Each frame adds its delta and then drains the accumulator in steps of that
/// same delta, so a frame with a positive delta runs exactly one physics step.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameClock {
    last: f64,
    accumulator: f64,
    dt: f64,
}

impl FrameClock {
    pub fn new(now: f64) -> Self {
        FrameClock {
            last: now,
            accumulator: 0.0,
            dt: 0.0,
        }
    }

    pub fn restart(&mut self, now: f64) {
        *self = FrameClock::new(now);
    }

    /// Record a new frame timestamp (ms) and return the delta.
    pub fn tick(&mut self, now: f64) -> f64 {
        self.dt = now - self.last;
        self.last = now;
        if self.dt > 0.0 {
            self.accumulator += self.dt;
        } else {
            self.accumulator = 0.0;
        }
        self.dt
    }

    /// The next physics step, if the accumulator holds one.
    pub fn next_step(&mut self) -> Option<f32> {
        if self.dt > 0.0 && self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            Some(self.dt as f32)
        } else {
            None
        }
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Everything that lives on the playfield.
#[derive(Clone, Debug)]
pub struct World {
    pub sprites: Sprites,
    pub ship: Ship,
    pub background: Background,
    pub asteroids: Pool<Asteroid>,
    pub enemies: Pool<Enemy>,
    pub enemy_bullets: Pool<EnemyBullet>,
}

impl World {
    pub fn new(sprites: Sprites) -> Self {
        World {
            background: Background::new(&sprites),
            sprites,
            ship: Ship::new(),
            asteroids: Pool::new(ASTEROID_POOL),
            enemies: Pool::new(ENEMY_POOL),
            enemy_bullets: Pool::new(ENEMY_BULLET_POOL),
        }
    }

    /// Fresh background, empty pools and a re-initialised ship.
    pub fn reset(&mut self, field: Playfield, rng: &mut dyn RngCore) {
        self.background.reset();
        self.asteroids.reset();
        self.enemies.reset();
        self.enemy_bullets.reset();
        let env = SpawnEnv {
            sprites: &self.sprites,
            field,
        };
        self.ship.init(&env, rng);
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Game {
    config: GameConfig,
    phase: Phase,
    rng: StdRng,
    clock: FrameClock,
    score: u32,
    game_over: bool,
    world: Option<World>,
}

impl Game {
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        Game {
            config,
            phase: Phase::Loading,
            rng,
            clock: FrameClock::new(0.0),
            score: 0,
            game_over: false,
            world: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    /// Loading → Running once every asset is in.  Ignored in any other phase.
    pub fn assets_loaded(&mut self, sprites: Sprites, now: f64, hud: &mut dyn Hud) {
        if self.phase != Phase::Loading {
            return;
        }
        self.world = Some(World::new(sprites));
        self.start(now, hud);
    }

    /// GameOver → Running.  Returns `false` in any other phase.
    pub fn restart(&mut self, now: f64, hud: &mut dyn Hud) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.start(now, hud);
        true
    }

    fn start(&mut self, now: f64, hud: &mut dyn Hud) {
        self.score = 0;
        self.game_over = false;
        if let Some(world) = self.world.as_mut() {
            world.reset(self.config.field, &mut self.rng);
        }
        self.clock.restart(now);
        self.phase = Phase::Running;
        hud.show_score(0);
        hud.show_game_over(false);
        info!(
            width = self.config.field.width,
            height = self.config.field.height,
            hard_mode = self.config.hard_mode,
            "game started"
        );
    }

    /// Run one display frame at timestamp `now` (ms): physics, then drawing,
    /// then the game-over transition.  Does nothing unless Running.
    pub fn frame<S: Canvas + Hud>(&mut self, now: f64, controls: Controls, surface: &mut S) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }

        let delta = self.clock.tick(now);
        if delta <= 0.0 {
            debug!(delta, "non-positive frame delta, physics skipped");
        }

        let score_before = self.score;
        while let Some(dt) = self.clock.next_step() {
            self.step(dt, controls);
        }

        if self.render(surface) {
            self.game_over = true;
        }
        if self.score != score_before {
            surface.show_score(self.score);
        }
        if self.game_over {
            self.phase = Phase::GameOver;
            surface.show_game_over(true);
            info!(score = self.score, "game over");
        }
        self.phase
    }

    /// Advance the simulation by `dt` milliseconds.
    fn step(&mut self, dt: f32, controls: Controls) {
        let Game {
            config,
            rng,
            score,
            game_over,
            world,
            ..
        } = self;
        let Some(world) = world.as_mut() else {
            return;
        };
        let World {
            sprites,
            ship,
            background,
            asteroids,
            enemies,
            enemy_bullets,
        } = world;
        let field = config.field;
        let env = SpawnEnv {
            sprites: &*sprites,
            field,
        };
        let rng: &mut dyn RngCore = rng;

        // ── 1. Ship & background ─────────────────────────────────────────────
        ship.update(dt, controls, &env, rng);
        background.advance(dt);
        let ship_box = ship.bbox();
        let target = ship.center();

        // ── 2. Player bullets ────────────────────────────────────────────────
        let mut kills = 0;
        ship.bullets.animate(|bullet| {
            if bullet.advance(dt, field) {
                return true;
            }
            let hit = resolve_player_bullet(&bullet.bbox(), asteroids, enemies);
            if hit == BulletHit::Enemy {
                kills += 1;
            }
            hit.expires_bullet()
        });
        if kills > 0 {
            *score += kills;
            debug!(kills, score = *score, "enemy destroyed");
        }

        // ── 3. Asteroids ─────────────────────────────────────────────────────
        asteroids.animate(|asteroid| asteroid.advance(dt));

        // ── 4. Enemies (never expire on their own) ───────────────────────────
        let hard_mode = config.hard_mode;
        enemies.animate(|enemy| {
            if let Some(muzzle) = enemy.advance(dt, field) {
                fire_enemy_bullet(enemy_bullets, muzzle, hard_mode.then_some(target), &env, rng);
            }
            false
        });

        // ── 5. Enemy bullets ─────────────────────────────────────────────────
        let mut ship_hit = false;
        enemy_bullets.animate(|bullet| {
            if bullet.advance(dt, field) {
                return true;
            }
            match resolve_enemy_bullet(&bullet.bbox(), asteroids, &ship_box) {
                EnemyBulletHit::Nothing => false,
                EnemyBulletHit::Asteroid => true,
                EnemyBulletHit::Ship => {
                    ship_hit = true;
                    true
                }
            }
        });
        if ship_hit {
            *game_over = true;
        }

        // ── 6. Spawning ──────────────────────────────────────────────────────
        if spawn_roll(rng) {
            let y = (rng.gen::<f32>() * field.height).floor();
            let speed = (rng.gen::<f32>() * 9.0).floor();
            if asteroids.get(field.width, y, speed, &env, rng).is_some() && speed == 0.0 {
                trace!(y, "stationary asteroid spawned, it holds a slot until reset");
            }
        }
        if spawn_roll(rng) {
            let room = (field.height - sprites.get(SpriteId::Enemy).height()).max(0.0);
            let y = (rng.gen::<f32>() * room).floor();
            let speed = 2.0 + (rng.gen::<f32>() * 3.0).floor();
            enemies.get(field.width, y, speed, &env, rng);
        }
    }

    /// Draw back to front.  Returns `true` if an asteroid or enemy touched the
    /// ship while being drawn.
    fn render(&self, canvas: &mut dyn Canvas) -> bool {
        let Some(world) = self.world.as_ref() else {
            return false;
        };
        let debug_boxes = self.config.debug_boxes;
        let sprites = &world.sprites;
        let ship_box = world.ship.bbox();

        canvas.clear();
        world.background.draw(canvas, sprites, self.config.field);
        let mut hit = world.asteroids.draw(canvas, sprites, &ship_box, debug_boxes);
        hit |= world.enemies.draw(canvas, sprites, &ship_box, debug_boxes);
        hit |= world.enemy_bullets.draw(canvas, sprites, &ship_box, debug_boxes);
        world.ship.draw(canvas, sprites, debug_boxes);
        world.ship.bullets.draw(canvas, sprites, &ship_box, debug_boxes);
        hit
    }
}

/// Uniform integer draw over 0..=100, spawning iff draw/100 < `SPAWN_CHANCE`.
pub fn spawn_roll(rng: &mut dyn RngCore) -> bool {
    let draw: u32 = rng.gen_range(0..=100);
    f64::from(draw) / 100.0 < SPAWN_CHANCE
}

/// Launch an enemy bullet centred on `muzzle`, aimed at `target` when given.
fn fire_enemy_bullet(
    pool: &mut Pool<EnemyBullet>,
    muzzle: (f32, f32),
    target: Option<(f32, f32)>,
    env: &SpawnEnv,
    rng: &mut dyn RngCore,
) {
    let Some(bullet) = pool.get(muzzle.0, muzzle.1, ENEMY_BULLET_SPEED, env, rng) else {
        return;
    };
    bullet.body.x -= bullet.body.width;
    bullet.body.y -= bullet.body.height / 2.0;
    bullet.refresh_bbox();
    if let Some((x, y)) = target {
        bullet.aim_at(x, y);
    }
}
