//! Headless driver for the shuttle crates: TOML configuration and a rally
//! runner that stands in for the game's scheduler and ground collider.

pub mod config;
pub mod runner;

pub use config::{SimConfig, SimulationConfig};
pub use runner::{GroundPlane, RallyRunner, ShotReport};
