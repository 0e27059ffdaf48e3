use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or cataloguing sprite assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read sprite `{name}` from {path}")]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sprite `{0}` has no visible rows")]
    Empty(String),
    #[error("sprite `{name}` frame {frame} is {found}x{rows} cells, expected {width}x{height}")]
    RaggedFrame {
        name: String,
        frame: usize,
        found: usize,
        rows: usize,
        width: usize,
        height: usize,
    },
    #[error("unknown asset `{0}`")]
    Unknown(String),
    #[error("asset `{0}` has not finished loading")]
    NotLoaded(String),
}

/// Invalid command-line configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("fps must be greater than zero")]
    ZeroFps,
    #[error("playfield {width}x{height} px cannot fit the ship ({ship_width}x{ship_height} px)")]
    PlayfieldTooSmall {
        width: f32,
        height: f32,
        ship_width: f32,
        ship_height: f32,
    },
}
