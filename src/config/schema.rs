//! Configuration schema types for `fviz.toml`
//!
//! Defines the structure and validation rules for visualizer configuration.
//! Every section is optional; an empty file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::parse_color;
use crate::engine::{EngineSettings, StageTimings};
use crate::motion::Interpolation;
use crate::palette::{Palette, Theme, BUILTIN_THEMES};

/// Where templates and the automation value live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory holding the manifest and template files
    #[serde(default = "default_foods")]
    pub foods: PathBuf,
    /// Manifest file name inside `foods`
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Automation JSON document
    #[serde(default = "default_automation")]
    pub automation: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            foods: default_foods(),
            manifest: default_manifest(),
            automation: default_automation(),
        }
    }
}

fn default_foods() -> PathBuf {
    PathBuf::from("foods")
}

fn default_manifest() -> String {
    "manifest.json".to_string()
}

fn default_automation() -> PathBuf {
    PathBuf::from("vi_auto_data.json")
}

/// Stage timing and easing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Length of the tile flight at the start of each stage
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Time tiles rest on the grid before the next stage
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Retry interval while no template is loaded
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    /// Easing curve for tile flight
    #[serde(default)]
    pub easing: Interpolation,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            hold_ms: default_hold_ms(),
            poll_ms: default_poll_ms(),
            easing: Interpolation::default(),
        }
    }
}

fn default_transition_ms() -> u64 {
    2000
}

fn default_hold_ms() -> u64 {
    4000
}

fn default_poll_ms() -> u64 {
    50
}

/// Color scheme selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Built-in theme to start from
    #[serde(default = "default_theme_name")]
    pub name: String,
    /// Replacement tile palette (any CSS color syntax)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
    /// Replacement background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            palette: None,
            background: None,
        }
    }
}

fn default_theme_name() -> String {
    "wall".to_string()
}

/// Surface size used by offline rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

/// Root of `fviz.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FvizConfig {
    /// Fixed PRNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// A validation error in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// The field path (e.g., "timing.transition_ms")
    pub field: String,
    /// Description of the error
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FvizConfig {
    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.timing.transition_ms == 0 {
            push("timing.transition_ms", "must be a positive integer".to_string());
        }
        if self.timing.poll_ms == 0 {
            push("timing.poll_ms", "must be a positive integer".to_string());
        }

        if Theme::builtin(&self.theme.name).is_none() {
            push(
                "theme.name",
                format!("unknown theme, expected one of: {}", BUILTIN_THEMES.join(", ")),
            );
        }
        if let Some(palette) = &self.theme.palette {
            if palette.is_empty() {
                push("theme.palette", "must contain at least one color".to_string());
            }
            for (i, color) in palette.iter().enumerate() {
                if let Err(e) = parse_color(color) {
                    push(&format!("theme.palette[{}]", i), format!("'{}': {}", color, e));
                }
            }
        }
        if let Some(background) = &self.theme.background {
            if let Err(e) = parse_color(background) {
                push("theme.background", format!("'{}': {}", background, e));
            }
        }

        if self.surface.width == 0 || self.surface.height == 0 {
            push("surface", "dimensions must be positive".to_string());
        }

        errors
    }

    /// Check if the configuration is valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Resolve the theme, applying palette and background overrides.
    ///
    /// Unknown names and unparseable colors fall back to the built-in values;
    /// `validate` reports them.
    pub fn resolve_theme(&self) -> Theme {
        let mut theme = Theme::builtin(&self.theme.name).unwrap_or_default();
        if let Some(colors) = &self.theme.palette {
            if let Ok(palette) = Palette::parse(colors) {
                if !palette.is_empty() {
                    theme.palette = palette;
                }
            }
        }
        if let Some(background) = self.theme.background.as_deref().and_then(|c| parse_color(c).ok()) {
            theme.background = background;
        }
        theme
    }

    /// Engine settings derived from the timing section.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            timings: StageTimings {
                transition_ms: self.timing.transition_ms.max(1),
                hold_ms: self.timing.hold_ms,
            },
            poll_ms: self.timing.poll_ms.max(1),
            easing: self.timing.easing,
        }
    }

    /// Resolve asset paths relative to the directory holding the config file.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.assets.foods.is_relative() {
            self.assets.foods = base.join(&self.assets.foods);
        }
        if self.assets.automation.is_relative() {
            self.assets.automation = base.join(&self.assets.automation);
        }
    }
}
