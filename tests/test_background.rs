mod common;

use rand::Rng;

use space_shooter::background::*;

use common::{seeded_rng, sprites, Recorder, FIELD};

#[test]
fn layers_start_at_origin_with_parallax_speeds() {
    let bg = Background::new(&sprites());
    for (layer, speed) in bg.layers.iter().zip(LAYER_SPEEDS) {
        assert_eq!((layer.x, layer.y), (0.0, 0.0));
        assert_eq!(layer.speed, speed);
        assert_eq!(layer.width, FIELD.width);
    }
    assert!(LAYER_SPEEDS.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn each_layer_pans_by_its_own_speed() {
    let mut bg = Background::with_widths([1000.0; 3]);
    // 100 ms = 6 frames
    bg.advance(100.0);
    let xs: Vec<f32> = bg.layers.iter().map(|l| l.x).collect();
    assert_eq!(xs, vec![-12.0, -18.0, -30.0]);
}

#[test]
fn layer_snaps_back_to_zero_after_a_full_width() {
    let mut bg = Background::with_widths([100.0; 3]);

    // layer 0 moves 12 px per tick: -96 after 8 ticks, then -108 would pass the width
    for _ in 0..8 {
        bg.advance(100.0);
    }
    assert_eq!(bg.layers[0].x, -96.0);
    bg.advance(100.0);
    assert_eq!(bg.layers[0].x, 0.0);

    // layer 2 moves 30 px per tick and resets on every 4th
    assert_eq!(bg.layers[2].x, -30.0);
}

#[test]
fn layers_never_scroll_out_of_view() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let widths = [0, 1, 2].map(|_| rng.gen_range(8.0..800.0));
        let mut bg = Background::with_widths(widths);
        for _ in 0..400 {
            bg.advance(rng.gen_range(0.1..250.0));
            for layer in &bg.layers {
                assert!(layer.x <= 0.0, "x = {}", layer.x);
                assert!(layer.x + layer.width > 0.0, "x = {}, width = {}", layer.x, layer.width);
            }
        }
    }
}

#[test]
fn exact_width_counts_as_scrolled_through() {
    let mut bg = Background::with_widths([12.0, 1000.0, 1000.0]);
    bg.advance(100.0);
    assert_eq!(bg.layers[0].x, 0.0);
}

#[test]
fn reset_rewinds_every_layer() {
    let mut bg = Background::new(&sprites());
    bg.advance(250.0);
    bg.reset();
    assert!(bg.layers.iter().all(|l| l.x == 0.0 && l.y == 0.0));
}

#[test]
fn draws_each_layer_twice_one_field_apart() {
    let sprites = sprites();
    let mut bg = Background::new(&sprites);
    bg.advance(100.0);

    let mut rec = Recorder::default();
    bg.draw(&mut rec, &sprites, FIELD);

    assert_eq!(rec.names(), vec!["bg1", "bg1", "bg2", "bg2", "bg3", "bg3"]);
    for pair in rec.sprites.chunks(2) {
        assert_eq!(pair[1].1 - pair[0].1, FIELD.width);
        assert_eq!(pair[0].2, pair[1].2);
    }
    assert_eq!(rec.sprites[0].1, -12.0);
}
