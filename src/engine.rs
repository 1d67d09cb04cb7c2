//! The visualizer engine
//!
//! One [`Engine`] value owns all animation state: the active template and its
//! grid mapping, the tile pool, the stage cycle and the random source. A host
//! drives it once per rendered frame:
//!
//! ```
//! use foodviz::engine::{Engine, EngineSettings};
//! use foodviz::manifest::TemplateLibrary;
//! use foodviz::palette::Theme;
//! use foodviz::template::Template;
//!
//! let mut library = TemplateLibrary::new();
//! library.insert("dot", Template::from_strings(&["212", "232", "212"]).unwrap());
//!
//! let mut engine =
//!     Engine::new(EngineSettings::default(), Theme::wall(), library, 0.6, Some(1), (300, 300));
//! engine.tick(0);
//! let frame = engine.frame(16);
//! assert!(frame.tiles.len() <= 9);
//! ```
//!
//! `tick` performs at most one stage transition and always finishes
//! reassigning tiles before returning, so a following `frame` call sees a
//! consistent pool. `frame` never mutates anything.

use image::Rgba;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::builder::TemplateMap;
use crate::layout::GridLayout;
use crate::manifest::TemplateLibrary;
use crate::motion::{ease, transition_progress, Interpolation};
use crate::palette::Theme;
use crate::stage::{assign_colors, AssignContext, Stage};
use crate::template::Template;
use crate::tiles::{Tile, TilePool};

/// How long each stage animates and then rests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    pub transition_ms: u64,
    pub hold_ms: u64,
}

impl StageTimings {
    /// Total time a stage stays active.
    pub fn stage_length_ms(&self) -> u64 {
        self.transition_ms + self.hold_ms
    }

    /// Whether a stage started at `stage_start_ms` is over at `now_ms`.
    pub fn is_due(&self, now_ms: u64, stage_start_ms: u64) -> bool {
        now_ms.saturating_sub(stage_start_ms) > self.stage_length_ms()
    }
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            transition_ms: 2000,
            hold_ms: 4000,
        }
    }
}

/// Engine tuning that does not change while running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub timings: StageTimings,
    /// Retry interval for initialization while no template is available
    pub poll_ms: u64,
    pub easing: Interpolation,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timings: StageTimings::default(),
            poll_ms: 50,
            easing: Interpolation::Smoothstep,
        }
    }
}

/// Position in the stage cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    pub stage: Stage,
    pub stage_start_ms: u64,
    pub template_id: String,
    /// Completed `Final -> Random` wraps since the last (re)initialization
    pub cycles: u64,
}

/// What a call to [`Engine::tick`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No template yet; initialization is retried at `next_attempt_ms`
    Pending { next_attempt_ms: u64 },
    /// The scene was built and the cycle started at `Random`
    Initialized,
    /// The cycle moved to `stage`
    Advanced { stage: Stage, template_changed: bool },
    /// Nothing to do this frame
    Idle,
}

/// A tile ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTile {
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub palette_index: usize,
    pub color: Rgba<u8>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    /// Eased transition progress shared by all tiles
    pub ease: f64,
    /// Visible tiles only; blank tiles are omitted
    pub tiles: Vec<RenderTile>,
}

/// Read-only state for overlay panels
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub automation: f64,
    pub stage: Stage,
    pub template_id: String,
    pub stage_elapsed_ms: u64,
}

#[derive(Debug, Clone)]
struct Scene {
    template: Template,
    layout: GridLayout,
    map: TemplateMap,
    pool: TilePool,
    cycle: CycleState,
}

/// Owner of all animation state
#[derive(Debug)]
pub struct Engine {
    settings: EngineSettings,
    theme: Theme,
    library: TemplateLibrary,
    automation: f64,
    rng: StdRng,
    surface: (u32, u32),
    scene: Option<Scene>,
    /// Template to rebuild from after a resize, kept until a layout fits
    resume: Option<(String, Template)>,
    next_attempt_ms: u64,
}

impl Engine {
    /// Create an engine; nothing is built until the first `tick`.
    ///
    /// With `seed` set every random decision is reproducible.
    pub fn new(
        settings: EngineSettings,
        theme: Theme,
        library: TemplateLibrary,
        automation: f64,
        seed: Option<u64>,
        surface: (u32, u32),
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            settings,
            theme,
            library,
            automation: clamp_automation(automation),
            rng,
            surface,
            scene: None,
            resume: None,
            next_attempt_ms: 0,
        }
    }

    /// Make another template selectable. Used by loaders that finish after
    /// the engine has started polling.
    pub fn add_template(&mut self, id: impl Into<String>, template: Template) {
        self.library.insert(id, template);
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn set_automation(&mut self, automation: f64) {
        self.automation = clamp_automation(automation);
    }

    pub fn automation(&self) -> f64 {
        self.automation
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn surface(&self) -> (u32, u32) {
        self.surface
    }

    pub fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    pub fn cycle(&self) -> Option<&CycleState> {
        self.scene.as_ref().map(|s| &s.cycle)
    }

    pub fn layout(&self) -> Option<GridLayout> {
        self.scene.as_ref().map(|s| s.layout)
    }

    pub fn template_map(&self) -> Option<&TemplateMap> {
        self.scene.as_ref().map(|s| &s.map)
    }

    pub fn tiles(&self) -> &[Tile] {
        match &self.scene {
            Some(scene) => scene.pool.tiles(),
            None => &[],
        }
    }

    /// Tile assigned to grid cell `(row, col)`.
    pub fn tile_at(&self, row: u32, col: u32) -> Option<&Tile> {
        self.scene.as_ref().and_then(|s| s.pool.tile_at(row, col))
    }

    /// Advance the engine to `now_ms`.
    ///
    /// Before initialization this polls for a template every `poll_ms`.
    /// Afterwards it performs at most one stage transition.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        let Some(scene) = self.scene.as_ref() else {
            if now_ms < self.next_attempt_ms {
                return TickOutcome::Pending { next_attempt_ms: self.next_attempt_ms };
            }
            return self.initialize(now_ms);
        };

        if !self.settings.timings.is_due(now_ms, scene.cycle.stage_start_ms) {
            return TickOutcome::Idle;
        }
        self.advance(now_ms)
    }

    /// Change the surface size and restart from scratch.
    ///
    /// Layout, template mapping and tiles are rebuilt and the cycle restarts
    /// at `Random`. Only the active template survives.
    pub fn resize(&mut self, width: u32, height: u32, now_ms: u64) -> TickOutcome {
        debug!(width, height, "surface resized");
        self.surface = (width, height);
        if let Some(scene) = self.scene.take() {
            self.resume = Some((scene.cycle.template_id, scene.template));
        }
        self.next_attempt_ms = now_ms;
        self.initialize(now_ms)
    }

    fn initialize(&mut self, now_ms: u64) -> TickOutcome {
        let chosen = self.resume.take().or_else(|| {
            self.library.first().map(|(id, template)| (id.to_string(), template.clone()))
        });
        let Some((id, template)) = chosen else {
            return self.defer(now_ms);
        };

        let palette_len = self.theme.palette.len();
        let Some(layout) = layout_for(self.surface, &template) else {
            self.resume = Some((id, template));
            return self.defer(now_ms);
        };
        let map = TemplateMap::build(&template, layout.cols, layout.rows, palette_len);
        let pool = TilePool::scatter(layout, self.surface.0, self.surface.1, &mut self.rng);

        let mut scene = Scene {
            template,
            layout,
            map,
            pool,
            cycle: CycleState {
                stage: Stage::Random,
                stage_start_ms: now_ms,
                template_id: id,
                cycles: 0,
            },
        };
        enter_stage(
            &mut scene,
            Stage::Random,
            now_ms,
            1.0,
            self.automation,
            palette_len,
            &mut self.rng,
        );

        info!(
            template = %scene.cycle.template_id,
            cols = layout.cols,
            rows = layout.rows,
            cell_size = layout.cell_size,
            "visualizer initialized"
        );
        self.scene = Some(scene);
        TickOutcome::Initialized
    }

    fn defer(&mut self, now_ms: u64) -> TickOutcome {
        self.next_attempt_ms = now_ms + self.settings.poll_ms;
        TickOutcome::Pending { next_attempt_ms: self.next_attempt_ms }
    }

    fn advance(&mut self, now_ms: u64) -> TickOutcome {
        let surface = self.surface;
        let palette_len = self.theme.palette.len();
        let timings = self.settings.timings;
        let easing = self.settings.easing;
        let Some(scene) = self.scene.as_mut() else {
            return TickOutcome::Idle;
        };

        let current_ease = ease(
            transition_progress(now_ms, scene.cycle.stage_start_ms, timings.transition_ms),
            easing,
        );
        let next = scene.cycle.stage.next();

        let mut template_changed = false;
        if next == Stage::Random {
            scene.cycle.cycles += 1;
            if let Some((id, template)) = self.library.choose(&mut self.rng) {
                template_changed = id != scene.cycle.template_id;
                scene.cycle.template_id = id.to_string();
                scene.template = template.clone();
            }

            let layout = layout_for(surface, &scene.template).unwrap_or(scene.layout);
            if layout != scene.layout {
                debug!(cols = layout.cols, rows = layout.rows, "template changed grid layout");
                scene.layout = layout;
                scene.pool = TilePool::scatter(layout, surface.0, surface.1, &mut self.rng);
            }
            scene.map = TemplateMap::build(&scene.template, layout.cols, layout.rows, palette_len);
            debug!(template = %scene.cycle.template_id, "template selected");
        }

        enter_stage(
            scene,
            next,
            now_ms,
            current_ease,
            self.automation,
            palette_len,
            &mut self.rng,
        );
        TickOutcome::Advanced { stage: next, template_changed }
    }

    /// Tiles at their interpolated positions for time `now_ms`.
    ///
    /// Returns an empty frame before initialization.
    pub fn frame(&self, now_ms: u64) -> Frame {
        let (width, height) = self.surface;
        let background = self.theme.background;
        let Some(scene) = self.scene.as_ref() else {
            return Frame { width, height, background, ease: 0.0, tiles: Vec::new() };
        };

        let t = transition_progress(
            now_ms,
            scene.cycle.stage_start_ms,
            self.settings.timings.transition_ms,
        );
        let eased = ease(t, self.settings.easing);
        let size = scene.layout.cell_size;

        let tiles = scene
            .pool
            .tiles()
            .iter()
            .filter_map(|tile| {
                let palette_index = tile.color?;
                let color = self.theme.palette.get(palette_index)?;
                let position = tile.position_at(eased);
                Some(RenderTile { x: position.x, y: position.y, size, palette_index, color })
            })
            .collect();

        Frame { width, height, background, ease: eased, tiles }
    }

    /// Overlay status, or `None` before initialization.
    pub fn status(&self, now_ms: u64) -> Option<EngineStatus> {
        let scene = self.scene.as_ref()?;
        Some(EngineStatus {
            automation: self.automation,
            stage: scene.cycle.stage,
            template_id: scene.cycle.template_id.clone(),
            stage_elapsed_ms: now_ms.saturating_sub(scene.cycle.stage_start_ms),
        })
    }
}

fn clamp_automation(automation: f64) -> f64 {
    if automation.is_finite() {
        automation.clamp(0.0, 1.0)
    } else {
        crate::automation::DEFAULT_AUTOMATION
    }
}

fn layout_for(surface: (u32, u32), template: &Template) -> Option<GridLayout> {
    GridLayout::compute(surface.0, surface.1, template.width(), template.height())
}

fn enter_stage(
    scene: &mut Scene,
    stage: Stage,
    now_ms: u64,
    current_ease: f64,
    automation: f64,
    palette_len: usize,
    rng: &mut StdRng,
) {
    let ctx = AssignContext {
        layout: scene.layout,
        palette_len,
        map: &scene.map,
        automation,
    };
    let colors = assign_colors(stage, &ctx, rng);
    scene.pool.reassign(&colors, current_ease, rng);
    scene.cycle.stage = stage;
    scene.cycle.stage_start_ms = now_ms;
    debug!(stage = %stage, template = %scene.cycle.template_id, "stage entered");
}
