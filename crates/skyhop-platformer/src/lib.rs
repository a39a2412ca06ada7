//! Side-scrolling platformer: a procedurally generated strip of ground and
//! floating brick clusters, coins to collect, and zombies to stomp.
//!
//! [`World`] drives one run per [`skyhop_core::game_trait::Game`] tick.

pub mod animation;
pub mod character;
pub mod coin;
pub mod config;
pub mod level_gen;
pub mod physics;
pub mod render;
pub mod scoring;
pub mod world;

pub use config::{ConfigError, PlatformerConfig};
pub use level_gen::{Level, LevelGenerator};
pub use render::{Canvas, Sprite};
pub use world::{RunPhase, World};
