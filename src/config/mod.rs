//! Configuration module for the visualizer
//!
//! Provides types and parsing for `fviz.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::*;
