//! Side-scrolling starfield shooter.
//!
//! The library holds the whole simulation: pooled entities, AABB collision,
//! the parallax background, the ship controller and the frame-driven game
//! loop.  Drawing and score display go through the [`render::Canvas`] and
//! [`render::Hud`] traits so the binary can rasterise into a terminal.

pub mod assets;
pub mod background;
pub mod collision;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod pool;
pub mod render;
pub mod scheduler;
pub mod ship;
