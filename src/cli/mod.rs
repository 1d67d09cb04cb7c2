//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod render;
mod status;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::automation::load_automation;
use crate::config::{load_config, FvizConfig};
use crate::engine::Engine;
use crate::manifest::TemplateLibrary;
use crate::motion::{parse_interpolation, Interpolation};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Food Visualizer - tiles that reveal a food, one stage at a time
#[derive(Parser)]
#[command(name = "fviz")]
#[command(about = "Food Visualizer - render and manage tile mosaic food templates")]
#[command(version)]
pub struct Cli {
    /// Path to fviz.toml (default: search upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Surface and randomness overrides shared by rendering commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SceneArgs {
    /// Surface width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Surface height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Fixed random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Visible-tile fraction (0-1) or percentage (0-100), overriding the automation file
    #[arg(long)]
    pub automation: Option<f64>,

    /// Template directory, overriding the config
    #[arg(long)]
    pub foods: Option<PathBuf>,

    /// Easing curve (linear, ease-in, ease-out, smoothstep)
    #[arg(long, value_parser = parse_easing)]
    pub easing: Option<Interpolation>,
}

fn parse_easing(s: &str) -> Result<Interpolation, String> {
    parse_interpolation(s).ok_or_else(|| format!("unknown easing '{}'", s))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the engine state at a point in time to PNG
    Frame {
        /// Time in milliseconds since start
        #[arg(long, default_value = "0")]
        at: u64,

        /// Output PNG path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Simulation step in milliseconds (one engine tick per step)
        #[arg(long, default_value = "16", value_parser = clap::value_parser!(u64).range(1..))]
        step: u64,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Capture the running cycle as an animated GIF
    Animate {
        /// Output GIF path
        #[arg(short, long, default_value = "cycle.gif")]
        output: PathBuf,

        /// Frames per second (1-50)
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
        fps: u32,

        /// Capture length in milliseconds (default: one full cycle)
        #[arg(long)]
        duration: Option<u64>,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Convert palette PNGs into templates and register them in the manifest
    Convert {
        /// Input PNG files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Template directory (default: from config)
        #[arg(long)]
        foods: Option<PathBuf>,

        /// Required square image size in pixels (0 accepts any size)
        #[arg(long, default_value = "40")]
        size: u32,
    },

    /// Render a template file to PNG with the theme palette
    Preview {
        /// Template JSON file
        input: PathBuf,

        /// Output PNG path (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-64)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,
    },

    /// Show configuration, templates and automation value
    Status,
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose, cli.quiet);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match cli.command {
        Commands::Frame { at, output, step, scene } => {
            render::run_frame(&config, &scene, at, step, &output)
        }
        Commands::Animate { output, fps, duration, scene } => {
            render::run_animate(&config, &scene, fps, duration, &output)
        }
        Commands::Convert { inputs, foods, size } => {
            let foods = foods.unwrap_or_else(|| config.assets.foods.clone());
            convert::run_convert(&config, &inputs, &foods, size)
        }
        Commands::Preview { input, output, scale } => {
            let output = output.unwrap_or_else(|| input.with_extension("png"));
            convert::run_preview(&config, &input, &output, scale)
        }
        Commands::Status => status::run_status(&config, cli.config.as_deref()),
    }
}

/// Build an engine from configuration plus command-line overrides.
pub(crate) fn build_engine(config: &FvizConfig, scene: &SceneArgs) -> Engine {
    let foods = scene.foods.as_deref().unwrap_or(&config.assets.foods);
    let library = TemplateLibrary::load_dir(foods, &config.assets.manifest);

    let automation = match scene.automation.and_then(crate::automation::normalize) {
        Some(value) => value,
        None => load_automation(&config.assets.automation),
    };

    let surface = (
        scene.width.unwrap_or(config.surface.width),
        scene.height.unwrap_or(config.surface.height),
    );

    let mut settings = config.engine_settings();
    if let Some(easing) = scene.easing {
        settings.easing = easing;
    }

    Engine::new(
        settings,
        config.resolve_theme(),
        library,
        automation,
        scene.seed.or(config.seed),
        surface,
    )
}

/// Expand file arguments, treating each as a glob pattern.
///
/// Arguments that match nothing are passed through unchanged so the caller
/// reports them as missing files.
pub(crate) fn expand_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        let matched: Vec<PathBuf> = match glob(input) {
            Ok(paths) => paths.filter_map(Result::ok).collect(),
            Err(_) => Vec::new(),
        };
        if matched.is_empty() {
            files.push(PathBuf::from(input));
        } else {
            files.extend(matched);
        }
    }
    files
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
