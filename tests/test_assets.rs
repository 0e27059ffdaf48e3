mod common;

use std::fs;

use crossterm::style::Color;

use space_shooter::assets::*;
use space_shooter::error::AssetError;

use common::{seeded_rng, FIELD};

fn dot(name: &str) -> Sprite {
    Sprite::from_art(name, "#", Color::White).expect("one-cell art parses")
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[test]
fn loader_starts_with_every_asset_pending() {
    let loader = AssetLoader::new();
    assert_eq!(loader.total(), ASSET_NAMES.len());
    assert_eq!(loader.loaded(), 0);
    assert!(!loader.is_finished());
    for name in ASSET_NAMES {
        assert_eq!(loader.status(name), Some(LoadStatus::Pending));
    }
    assert_eq!(loader.status("nope"), None);
}

#[test]
fn each_completion_counts_once() {
    let mut loader = AssetLoader::new();
    loader.request("enemy").unwrap();
    assert_eq!(loader.status("enemy"), Some(LoadStatus::Loading));

    assert_eq!(
        loader.complete("enemy", dot("enemy")).unwrap(),
        Progress::Counted {
            loaded: 1,
            total: ASSET_NAMES.len()
        }
    );
    assert_eq!(loader.status("enemy"), Some(LoadStatus::Loaded));

    assert_eq!(loader.complete("enemy", dot("enemy")).unwrap(), Progress::Ignored);
    assert_eq!(loader.loaded(), 1);
}

#[test]
fn completion_without_request_is_ignored() {
    let mut loader = AssetLoader::new();
    assert_eq!(loader.complete("bg1", dot("bg1")).unwrap(), Progress::Ignored);
    assert_eq!(loader.loaded(), 0);
    assert_eq!(loader.status("bg1"), Some(LoadStatus::Pending));
}

#[test]
fn requesting_twice_does_not_double_count() {
    let mut loader = AssetLoader::new();
    loader.request("bg2").unwrap();
    loader.request("bg2").unwrap();
    loader.complete("bg2", dot("bg2")).unwrap();
    loader.request("bg2").unwrap();
    assert_eq!(loader.status("bg2"), Some(LoadStatus::Loaded));
    assert_eq!(loader.loaded(), 1);
}

#[test]
fn unknown_asset_is_an_error() {
    let mut loader = AssetLoader::new();
    assert!(matches!(loader.request("boss"), Err(AssetError::Unknown(n)) if n == "boss"));
    assert!(matches!(
        loader.complete("boss", dot("boss")),
        Err(AssetError::Unknown(_))
    ));
}

#[test]
fn finished_is_reported_exactly_once() {
    let mut loader = AssetLoader::new();
    for name in ASSET_NAMES {
        loader.request(name).unwrap();
    }

    let mut finished = 0;
    // Completion order does not matter.
    for name in ASSET_NAMES.iter().rev() {
        match loader.complete(name, dot(name)).unwrap() {
            Progress::Finished => finished += 1,
            Progress::Counted { loaded, total } => assert!(loaded < total),
            Progress::Ignored => panic!("{name} was in flight"),
        }
    }
    assert_eq!(finished, 1);
    assert!(loader.is_finished());

    for name in ASSET_NAMES {
        assert_eq!(loader.complete(name, dot(name)).unwrap(), Progress::Ignored);
    }
    assert!(loader.into_sprites().is_ok());
}

#[test]
fn partial_catalog_is_refused() {
    let mut loader = AssetLoader::new();
    for name in &ASSET_NAMES[..5] {
        loader.request(name).unwrap();
        loader.complete(name, dot(name)).unwrap();
    }
    assert!(matches!(
        loader.into_sprites(),
        Err(AssetError::NotLoaded(n)) if n == ASSET_NAMES[5]
    ));
}

// ── Art parsing ───────────────────────────────────────────────────────────────

#[test]
fn art_is_padded_to_its_widest_row() {
    let sprite = Sprite::from_art("s", "\n ab\nabcd\n\n", Color::Red).unwrap();
    assert_eq!((sprite.cols, sprite.rows), (4, 2));
    assert_eq!(sprite.frames.len(), 1);
    assert_eq!(sprite.frames[0][0], vec![' ', 'a', 'b', ' ']);
    assert_eq!(sprite.width(), 4.0 * CELL_W);
    assert_eq!(sprite.height(), 2.0 * CELL_H);
}

#[test]
fn frames_split_on_separator() {
    let sprite = Sprite::from_art("s", "ab\ncd\n---\nef\ngh", Color::Red).unwrap();
    assert_eq!(sprite.frames.len(), 2);
    assert_eq!(sprite.frames[1][1], vec!['g', 'h']);
}

#[test]
fn frames_of_different_sizes_are_rejected() {
    let err = Sprite::from_art("s", "ab\n---\nabc", Color::Red).unwrap_err();
    assert!(matches!(err, AssetError::RaggedFrame { frame: 1, found: 3, .. }));
}

#[test]
fn blank_art_is_rejected() {
    assert!(matches!(
        Sprite::from_art("s", "  \n\n   ", Color::Red),
        Err(AssetError::Empty(_))
    ));
    assert!(matches!(
        Sprite::from_art("s", "", Color::Red),
        Err(AssetError::Empty(_))
    ));
}

#[test]
fn rotation_picks_a_frame() {
    let sprite = Sprite::from_art("s", "a\n---\nb\n---\nc\n---\nd", Color::Red).unwrap();
    let glyph = |rot: f32| sprite.frame(rot)[0][0];
    assert_eq!(glyph(0.0), 'a');
    assert_eq!(glyph(2.0), 'b');
    assert_eq!(glyph(3.5), 'c');
    assert_eq!(glyph(5.5), 'd');
    assert_eq!(glyph(-0.5), 'd');
}

#[test]
fn single_frame_ignores_rotation() {
    let sprite = dot("s");
    assert_eq!(sprite.frame(4.0)[0][0], '#');
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[test]
fn builtin_catalog_has_every_sprite() {
    let sprites = Sprites::builtin(FIELD, &mut seeded_rng()).unwrap();

    let ship = sprites.get(SpriteId::Ship);
    assert_eq!(ship.name, "playership");
    assert_eq!((ship.width(), ship.height()), (40.0, 48.0));

    for variant in 0..ASTEROID_VARIANTS {
        let rock = sprites.get(SpriteId::Asteroid(variant));
        assert_eq!(rock.name, format!("asteroid{}", variant + 1));
        assert_eq!(rock.frames.len(), 2);
    }
    assert_eq!(sprites.get(SpriteId::EnemyBullet).frames.len(), 4);

    for layer in 0..3 {
        let bg = sprites.get(SpriteId::Background(layer));
        assert_eq!(bg.width(), FIELD.width);
        assert_eq!(bg.height(), FIELD.height);
    }
}

#[test]
fn builtin_source_rejects_unknown_names() {
    let mut rng = seeded_rng();
    let mut source = BuiltinArt::new(FIELD, &mut rng);
    assert!(matches!(source.fetch("boss"), Err(AssetError::Unknown(_))));
}

#[test]
fn directory_overrides_fall_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("enemy.txt"), "XX\nXX\nXX\n").unwrap();

    let mut rng = seeded_rng();
    let mut source = ArtDirectory::new(dir.path(), BuiltinArt::new(FIELD, &mut rng));
    let sprites = AssetLoader::new().download_all(&mut source).unwrap();

    let enemy = sprites.get(SpriteId::Enemy);
    assert_eq!((enemy.cols, enemy.rows), (2, 3));
    assert_eq!(enemy.color, Color::Green);
    assert_eq!(sprites.get(SpriteId::Ship).cols, 5);
}

#[test]
fn broken_override_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("playership.txt"), "ab\n---\nabc\n").unwrap();

    let mut rng = seeded_rng();
    let mut source = ArtDirectory::new(dir.path(), BuiltinArt::new(FIELD, &mut rng));
    assert!(matches!(
        AssetLoader::new().download_all(&mut source),
        Err(AssetError::RaggedFrame { .. })
    ));
}
