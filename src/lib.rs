//! Food Visualizer - a tile mosaic that reveals pixel food templates
//!
//! This library provides functionality to:
//! - Load palette-indexed food templates listed in a manifest
//! - Map a template onto a grid of square tiles sized to a surface
//! - Animate tiles through four stages, from noise to the finished picture
//! - Render frames to PNG or animated GIF

pub mod automation;
pub mod builder;
pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod motion;
pub mod output;
pub mod palette;
pub mod panel;
pub mod renderer;
pub mod stage;
pub mod template;
pub mod tiles;
