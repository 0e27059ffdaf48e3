//! Sprite assets and the one-shot asset loader.
//!
//! Sprites are glyph art measured in terminal cells; every cell stands for
//! `CELL_W` x `CELL_H` playfield pixels, so the simulation can keep working in
//! pixels while the front-end draws characters.

use std::f32::consts::TAU;
use std::io::ErrorKind;
use std::path::PathBuf;

use crossterm::style::Color;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::entities::Playfield;
use crate::error::AssetError;

/// Playfield pixels covered by one terminal column.
pub const CELL_W: f32 = 8.0;
/// Playfield pixels covered by one terminal row.
pub const CELL_H: f32 = 16.0;

pub const ASTEROID_VARIANTS: usize = 4;

/// Every asset the game needs, in catalog order.
pub const ASSET_NAMES: [&str; 11] = [
    "bg1",
    "bg2",
    "bg3",
    "playership",
    "playerbullet",
    "asteroid1",
    "asteroid2",
    "asteroid3",
    "asteroid4",
    "enemy",
    "enemybullet",
];

const FRAME_SEPARATOR: &str = "---";

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub name: String,
    /// One or more frames of equal size; a space is transparent.
    pub frames: Vec<Vec<Vec<char>>>,
    pub color: Color,
    pub cols: usize,
    pub rows: usize,
}

impl Sprite {
    /// Parse glyph art.  Frames are separated by a line holding `---`;
    /// short rows are padded with transparent cells.
    pub fn from_art(name: &str, art: &str, color: Color) -> Result<Sprite, AssetError> {
        let mut frames: Vec<Vec<Vec<char>>> = Vec::new();
        for chunk in split_frames(art) {
            let rows: Vec<Vec<char>> = chunk.iter().map(|line| line.chars().collect()).collect();
            if rows.iter().all(|r| r.iter().all(|c| *c == ' ')) {
                return Err(AssetError::Empty(name.to_string()));
            }
            frames.push(rows);
        }
        if frames.is_empty() {
            return Err(AssetError::Empty(name.to_string()));
        }

        let cols = frames[0].iter().map(Vec::len).max().unwrap_or(0);
        let rows = frames[0].len();
        for (i, frame) in frames.iter_mut().enumerate() {
            let found = frame.iter().map(Vec::len).max().unwrap_or(0);
            if found != cols || frame.len() != rows {
                return Err(AssetError::RaggedFrame {
                    name: name.to_string(),
                    frame: i,
                    found,
                    rows: frame.len(),
                    width: cols,
                    height: rows,
                });
            }
            for row in frame.iter_mut() {
                row.resize(cols, ' ');
            }
        }

        Ok(Sprite {
            name: name.to_string(),
            frames,
            color,
            cols,
            rows,
        })
    }

    /// A layer of scattered stars covering `width` x `height` pixels.
    pub fn starfield(
        name: &str,
        width: f32,
        height: f32,
        density: f64,
        glyph: char,
        color: Color,
        rng: &mut dyn RngCore,
    ) -> Sprite {
        let cols = (width / CELL_W).ceil().max(1.0) as usize;
        let rows = (height / CELL_H).ceil().max(1.0) as usize;
        let frame = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| if rng.gen_bool(density) { glyph } else { ' ' })
                    .collect()
            })
            .collect();
        Sprite {
            name: name.to_string(),
            frames: vec![frame],
            color,
            cols,
            rows,
        }
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * CELL_W
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * CELL_H
    }

    /// The art frame shown for a rotation angle in radians.
    pub fn frame(&self, rotation: f32) -> &[Vec<char>] {
        let count = self.frames.len();
        let turn = rotation.rem_euclid(TAU) / TAU;
        let index = ((turn * count as f32) as usize).min(count - 1);
        &self.frames[index]
    }
}

fn split_frames(art: &str) -> Vec<Vec<&str>> {
    let mut frames = vec![Vec::new()];
    for line in art.lines() {
        if line.trim() == FRAME_SEPARATOR {
            frames.push(Vec::new());
        } else if let Some(current) = frames.last_mut() {
            current.push(line.trim_end());
        }
    }
    // Blank lines around the art are not part of it.
    for frame in frames.iter_mut() {
        while frame.first().is_some_and(|l| l.is_empty()) {
            frame.remove(0);
        }
        while frame.last().is_some_and(|l| l.is_empty()) {
            frame.pop();
        }
    }
    frames.retain(|f| !f.is_empty());
    frames
}

/// Handle to one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteId {
    Background(usize),
    Ship,
    PlayerBullet,
    Asteroid(usize),
    Enemy,
    EnemyBullet,
}

impl SpriteId {
    fn index(self) -> usize {
        match self {
            SpriteId::Background(layer) => layer.min(2),
            SpriteId::Ship => 3,
            SpriteId::PlayerBullet => 4,
            SpriteId::Asteroid(variant) => 5 + variant % ASTEROID_VARIANTS,
            SpriteId::Enemy => 9,
            SpriteId::EnemyBullet => 10,
        }
    }

    pub fn name(self) -> &'static str {
        ASSET_NAMES[self.index()]
    }
}

/// Every sprite, fully loaded.  Only the loader can build one.
#[derive(Clone, Debug)]
pub struct Sprites {
    sprites: Vec<Sprite>,
}

impl Sprites {
    pub fn get(&self, id: SpriteId) -> &Sprite {
        &self.sprites[id.index()]
    }

    /// Load the built-in art for a playfield in one go.
    pub fn builtin(field: Playfield, rng: &mut dyn RngCore) -> Result<Sprites, AssetError> {
        AssetLoader::new().download_all(&mut BuiltinArt::new(field, rng))
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

/// Where sprite art comes from.
pub trait AssetSource {
    fn fetch(&mut self, name: &str) -> Result<Sprite, AssetError>;
}

const SHIP_ART: &str = r"
 \=-.
=[##>
 /=-'";

const PLAYER_BULLET_ART: &str = "=-";

const ASTEROID_ART: [&str; ASTEROID_VARIANTS] = [
    r"
/##\
\##/
---
/%%\
\%%/",
    r"
 .--.
(  @ )
 `--'
---
 .--.
( @  )
 `--'",
    r"
{@}
{_}
---
{_}
{@}",
    r"
<#%#>
 `-'
---
<%#%>
 `-'",
];

const ENEMY_ART: &str = r"
 _/=
<(O)=
 ~\=";

const ENEMY_BULLET_ART: &str = "*\n---\n+\n---\nx\n---\n+";

/// The art compiled into the binary.  Background layers are generated to
/// cover the playfield.
pub struct BuiltinArt<'a> {
    field: Playfield,
    rng: &'a mut dyn RngCore,
}

impl<'a> BuiltinArt<'a> {
    pub fn new(field: Playfield, rng: &'a mut dyn RngCore) -> Self {
        BuiltinArt { field, rng }
    }
}

impl AssetSource for BuiltinArt<'_> {
    fn fetch(&mut self, name: &str) -> Result<Sprite, AssetError> {
        let (w, h) = (self.field.width, self.field.height);
        match name {
            "bg1" => Ok(Sprite::starfield(name, w, h, 0.02, '.', Color::DarkGrey, self.rng)),
            "bg2" => Ok(Sprite::starfield(name, w, h, 0.01, '+', Color::Grey, self.rng)),
            "bg3" => Ok(Sprite::starfield(name, w, h, 0.004, '*', Color::White, self.rng)),
            "playership" => Sprite::from_art(name, SHIP_ART, Color::White),
            "playerbullet" => Sprite::from_art(name, PLAYER_BULLET_ART, Color::Cyan),
            "asteroid1" | "asteroid2" | "asteroid3" | "asteroid4" => {
                let variant = name[name.len() - 1..]
                    .parse::<usize>()
                    .map_err(|_| AssetError::Unknown(name.to_string()))?;
                Sprite::from_art(name, ASTEROID_ART[variant - 1], Color::DarkYellow)
            }
            "enemy" => Sprite::from_art(name, ENEMY_ART, Color::Green),
            "enemybullet" => Sprite::from_art(name, ENEMY_BULLET_ART, Color::Magenta),
            _ => Err(AssetError::Unknown(name.to_string())),
        }
    }
}

/// Reads `<dir>/<name>.txt` overrides, deferring to `fallback` for any
/// sprite without a file.  Overrides keep the fallback's colour.
pub struct ArtDirectory<S> {
    dir: PathBuf,
    fallback: S,
}

impl<S: AssetSource> ArtDirectory<S> {
    pub fn new(dir: impl Into<PathBuf>, fallback: S) -> Self {
        ArtDirectory {
            dir: dir.into(),
            fallback,
        }
    }
}

impl<S: AssetSource> AssetSource for ArtDirectory<S> {
    fn fetch(&mut self, name: &str) -> Result<Sprite, AssetError> {
        let default = self.fallback.fetch(name)?;
        let path = self.dir.join(format!("{name}.txt"));
        match std::fs::read_to_string(&path) {
            Ok(art) => {
                debug!(asset = name, path = %path.display(), "using sprite override");
                Sprite::from_art(name, &art, default.color)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(default),
            Err(source) => Err(AssetError::Io {
                name: name.to_string(),
                path,
                source,
            }),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loading,
    Loaded,
}

/// Result of reporting one completed asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The asset was not in flight (never requested, or already counted).
    Ignored,
    Counted { loaded: usize, total: usize },
    /// The last outstanding asset arrived.  Reported exactly once.
    Finished,
}

struct Slot {
    name: &'static str,
    status: LoadStatus,
    sprite: Option<Sprite>,
}

/// Tallies asset completions and signals once when all of them are in.
pub struct AssetLoader {
    slots: Vec<Slot>,
    loaded: usize,
    finished: bool,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        AssetLoader {
            slots: ASSET_NAMES
                .iter()
                .map(|&name| Slot {
                    name,
                    status: LoadStatus::Pending,
                    sprite: None,
                })
                .collect(),
            loaded: 0,
            finished: false,
        }
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn status(&self, name: &str) -> Option<LoadStatus> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.status)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut Slot, AssetError> {
        self.slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| AssetError::Unknown(name.to_string()))
    }

    /// Mark an asset as in flight.
    pub fn request(&mut self, name: &str) -> Result<(), AssetError> {
        let slot = self.slot_mut(name)?;
        if slot.status == LoadStatus::Pending {
            slot.status = LoadStatus::Loading;
        }
        Ok(())
    }

    /// Report that an asset finished loading.
    pub fn complete(&mut self, name: &str, sprite: Sprite) -> Result<Progress, AssetError> {
        let slot = self.slot_mut(name)?;
        if slot.status != LoadStatus::Loading {
            return Ok(Progress::Ignored);
        }
        slot.status = LoadStatus::Loaded;
        slot.sprite = Some(sprite);
        self.loaded += 1;

        if self.loaded == self.total() && !self.finished {
            self.finished = true;
            return Ok(Progress::Finished);
        }
        Ok(Progress::Counted {
            loaded: self.loaded,
            total: self.total(),
        })
    }

    /// Request and load every asset from `source`, returning the catalog.
    pub fn download_all(mut self, source: &mut dyn AssetSource) -> Result<Sprites, AssetError> {
        for name in ASSET_NAMES {
            self.request(name)?;
        }
        for name in ASSET_NAMES {
            let sprite = source.fetch(name)?;
            if self.complete(name, sprite)? == Progress::Finished {
                info!(count = self.total(), "all assets loaded");
            }
        }
        self.into_sprites()
    }

    /// The finished catalog.  Fails if any asset is still outstanding.
    pub fn into_sprites(self) -> Result<Sprites, AssetError> {
        let sprites = self
            .slots
            .into_iter()
            .map(|slot| slot.sprite.ok_or_else(|| AssetError::NotLoaded(slot.name.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sprites { sprites })
    }
}
