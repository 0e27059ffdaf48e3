//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::assets::{CELL_H, CELL_W};
use crate::entities::Playfield;
use crate::error::ConfigError;
use crate::game::GameConfig;

/// Terminal rows reserved outside the playfield (HUD on top, hints below).
pub const CHROME_ROWS: u16 = 2;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "space_shooter")]
#[command(about = "Side-scrolling starfield shooter for the terminal")]
pub struct Config {
    /// Enemy bullets aim at the ship
    #[arg(long)]
    pub hard: bool,

    /// Seed for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Outline bounding boxes
    #[arg(long)]
    pub debug_boxes: bool,

    /// Directory of `<name>.txt` sprite overrides
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        Ok(())
    }

    /// Game settings for a terminal of `cols` x `rows` cells.
    pub fn game_config(&self, cols: u16, rows: u16) -> GameConfig {
        GameConfig {
            field: playfield_for_terminal(cols, rows),
            hard_mode: self.hard,
            debug_boxes: self.debug_boxes,
        }
    }
}

pub fn playfield_for_terminal(cols: u16, rows: u16) -> Playfield {
    Playfield::new(
        f32::from(cols) * CELL_W,
        f32::from(rows.saturating_sub(CHROME_ROWS)) * CELL_H,
    )
}

/// The playfield must be able to hold a ship of the given size.
pub fn check_playfield(field: Playfield, ship_width: f32, ship_height: f32) -> Result<(), ConfigError> {
    if field.width < ship_width || field.height < ship_height {
        return Err(ConfigError::PlayfieldTooSmall {
            width: field.width,
            height: field.height,
            ship_width,
            ship_height,
        });
    }
    Ok(())
}
