//! Frame and animate command implementations

use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, info};

use crate::config::FvizConfig;
use crate::engine::Engine;
use crate::output::{save_gif, save_png};
use crate::panel::Overlay;
use crate::renderer::render_frame;

use super::{build_engine, display, SceneArgs, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the frame command
pub fn run_frame(
    config: &FvizConfig,
    scene: &SceneArgs,
    at: u64,
    step: u64,
    output: &Path,
) -> ExitCode {
    let mut engine = match start_engine(config, scene) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    advance(&mut engine, 0, at, step);

    let image = render_frame(&engine.frame(at));
    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: Failed to save '{}': {}", display(output), e);
        return ExitCode::from(EXIT_ERROR);
    }
    if let Some(status) = engine.status(at) {
        let overlay = Overlay::from_status(&status);
        info!(
            stage = %status.stage,
            template = %status.template_id,
            automation = %overlay.automation.value,
            label_alpha = overlay.food.map_or(0.0, |f| f.alpha),
            "rendered frame at {} ms",
            at
        );
    }
    println!("Saved: {}", display(output));
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the animate command
pub fn run_animate(
    config: &FvizConfig,
    scene: &SceneArgs,
    fps: u32,
    duration: Option<u64>,
    output: &Path,
) -> ExitCode {
    let mut engine = match start_engine(config, scene) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let frame_ms = (1000 / u64::from(fps.max(1))).max(1);
    let duration = duration.unwrap_or_else(|| 4 * engine.settings().timings.stage_length_ms());

    let mut frames = Vec::new();
    let mut now = 0;
    while now <= duration {
        engine.tick(now);
        frames.push(render_frame(&engine.frame(now)));
        now += frame_ms;
    }
    debug!("captured {} frames at {} ms intervals", frames.len(), frame_ms);

    if let Err(e) = save_gif(&frames, frame_ms as u32, output) {
        eprintln!("Error: Failed to save '{}': {}", display(output), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {} ({} frames)", display(output), frames.len());
    ExitCode::from(EXIT_SUCCESS)
}

/// Build the engine and run its first tick, reporting why it cannot start.
fn start_engine(config: &FvizConfig, scene: &SceneArgs) -> Result<Engine, ExitCode> {
    let mut engine = build_engine(config, scene);

    if engine.library().is_empty() {
        let foods = scene.foods.as_deref().unwrap_or(&config.assets.foods);
        eprintln!("Error: No templates loaded from '{}'", display(foods));
        return Err(ExitCode::from(EXIT_ERROR));
    }

    engine.tick(0);
    if !engine.is_initialized() {
        let (w, h) = engine.surface();
        eprintln!("Error: Surface {}x{} has no room for a tile grid", w, h);
        return Err(ExitCode::from(EXIT_ERROR));
    }
    Ok(engine)
}

/// Tick from `from` to `to` in `step` increments, ending exactly at `to`.
fn advance(engine: &mut Engine, from: u64, to: u64, step: u64) {
    let step = step.max(1);
    let mut now = from;
    while now < to {
        now = (now + step).min(to);
        engine.tick(now);
    }
}
