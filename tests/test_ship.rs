mod common;

use rand::Rng;

use space_shooter::collision::Rect;
use space_shooter::entities::Entity;
use space_shooter::input::Controls;
use space_shooter::ship::*;

use common::{env, seeded_rng, sprites, FIELD, FRAME_MS};

fn ready_ship() -> (Ship, space_shooter::assets::Sprites) {
    let sprites = sprites();
    let mut ship = Ship::new();
    ship.init(&env(&sprites), &mut seeded_rng());
    (ship, sprites)
}

#[test]
fn init_centres_ship_on_left_edge() {
    let (ship, _) = ready_ship();
    let b = &ship.body;
    assert!(b.visible);
    assert_eq!(b.x, 0.0);
    assert_eq!(b.y, (FIELD.height / 2.0 - b.height / 2.0).floor());
    assert_eq!(b.speed, SHIP_SPEED);
    assert_eq!(ship.bullets.capacity(), SHIP_BULLETS);
    assert_eq!(ship.bullets.live_count(), 0);
}

#[test]
fn ship_box_is_middle_half_of_sprite() {
    let (ship, _) = ready_ship();
    let b = &ship.body;
    assert_eq!(ship.bbox(), Rect::new(b.x, b.y + b.height / 4.0, b.width, b.height / 2.0));
}

#[test]
fn moves_at_speed_per_frame() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();
    let start = ship.body.x;

    let right = Controls {
        right: true,
        ..Controls::default()
    };
    ship.update(1000.0 / 60.0, right, &env, &mut rng);
    assert!((ship.body.x - start - SHIP_SPEED).abs() < 1e-3);
}

#[test]
fn ship_never_leaves_the_playfield() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();
    let mut input = seeded_rng();

    let max_x = FIELD.width - ship.body.width;
    let max_y = FIELD.height - ship.body.height;
    for _ in 0..3000 {
        let controls = Controls {
            left: input.gen_bool(0.4),
            right: input.gen_bool(0.4),
            up: input.gen_bool(0.4),
            down: input.gen_bool(0.4),
            fire: false,
        };
        let dt = input.gen_range(0.1..400.0);
        ship.update(dt, controls, &env, &mut rng);
        assert!(ship.body.x >= 0.0 && ship.body.x <= max_x, "x = {}", ship.body.x);
        assert!(ship.body.y >= 0.0 && ship.body.y <= max_y, "y = {}", ship.body.y);
    }
}

#[test]
fn clamps_after_moving() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    let up_left = Controls {
        up: true,
        left: true,
        ..Controls::default()
    };
    ship.update(10_000.0, up_left, &env, &mut rng);
    assert_eq!((ship.body.x, ship.body.y), (0.0, 0.0));

    let down_right = Controls {
        down: true,
        right: true,
        ..Controls::default()
    };
    ship.update(10_000.0, down_right, &env, &mut rng);
    assert_eq!(ship.body.x, FIELD.width - ship.body.width);
    assert_eq!(ship.body.y, FIELD.height - ship.body.height);
}

// ── firing ────────────────────────────────────────────────────────────────────

#[test]
fn fire_is_gated_by_cooldown() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    let fire = Controls {
        fire: true,
        ..Controls::default()
    };
    // 100 ms = 6 frames, so the 10-frame cooldown passes every second tick
    let mut counts = Vec::new();
    for _ in 0..10 {
        ship.update(100.0, fire, &env, &mut rng);
        counts.push(ship.bullets.live_count());
    }
    assert_eq!(counts, vec![0, 1, 1, 2, 2, 3, 3, 4, 4, 5]);
}

#[test]
fn cooldown_keeps_counting_without_fire_held() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    for _ in 0..20 {
        ship.update(FRAME_MS, Controls::default(), &env, &mut rng);
    }
    assert_eq!(ship.bullets.live_count(), 0);

    let fire = Controls {
        fire: true,
        ..Controls::default()
    };
    ship.update(FRAME_MS, fire, &env, &mut rng);
    assert_eq!(ship.bullets.live_count(), 1);
    assert_eq!(ship.counter, 0.0);
}

#[test]
fn bullet_leaves_from_the_nose() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    assert!(ship.fire(&env, &mut rng));
    let bullet = &ship.bullets.slots()[0];
    let b = &ship.body;
    assert_eq!(bullet.body.x, b.x + b.width - 8.0);
    assert_eq!(bullet.body.y, b.y + b.height * 5.0 / 8.0 - 1.0);
    assert_eq!(bullet.body.speed, PLAYER_BULLET_SPEED);
}

#[test]
fn fire_with_full_magazine_is_dropped() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    for _ in 0..SHIP_BULLETS {
        assert!(ship.fire(&env, &mut rng));
    }
    assert!(!ship.fire(&env, &mut rng));
    assert_eq!(ship.bullets.live_count(), SHIP_BULLETS);
}

#[test]
fn box_follows_ship_every_tick() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    ship.body.y = 40.0;
    ship.update(FRAME_MS, Controls::default(), &env, &mut rng);
    assert_eq!(ship.bbox().y, 40.0 + ship.body.height / 4.0);
}

#[test]
fn init_empties_the_magazine() {
    let (mut ship, sprites) = ready_ship();
    let env = env(&sprites);
    let mut rng = seeded_rng();

    ship.fire(&env, &mut rng);
    ship.body.x = 200.0;
    ship.init(&env, &mut rng);
    assert_eq!(ship.bullets.live_count(), 0);
    assert_eq!(ship.body.x, 0.0);
}
