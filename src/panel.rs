//! Overlay panel model
//!
//! Two panels sit on top of the tiles: the automation readout in the top
//! right corner and the food name in the bottom left. This module only
//! computes what they show and how opaque they are; drawing text belongs to
//! the host surface.

use crate::engine::EngineStatus;
use crate::stage::Stage;

/// Title line of the automation panel
pub const AUTOMATION_LABEL: &str = "VI Task Automation";

/// Duration of the food label fade-in during the final stage
pub const FOOD_FADE_MS: u64 = 500;

/// Content of the automation readout
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationPanel {
    pub label: &'static str,
    /// Percentage with one decimal, e.g. `60.1%`
    pub value: String,
}

impl AutomationPanel {
    pub fn new(automation: f64) -> Self {
        Self {
            label: AUTOMATION_LABEL,
            value: format_percentage(automation),
        }
    }
}

/// Content and styling of the food name label
#[derive(Debug, Clone, PartialEq)]
pub struct FoodPanel {
    pub text: String,
    /// Text alpha, 0-255
    pub alpha: f64,
    /// Text blur radius in pixels
    pub blur: f64,
}

impl FoodPanel {
    /// Background alpha, kept slightly translucent.
    pub fn background_alpha(&self) -> f64 {
        self.alpha * 0.8
    }

    /// Label for `stage`, or `None` while the food should stay a mystery.
    ///
    /// `Closer` shows a heavily blurred hint. `Final` sharpens it over
    /// [`FOOD_FADE_MS`].
    pub fn for_stage(template_id: &str, stage: Stage, stage_elapsed_ms: u64) -> Option<Self> {
        let (alpha, blur) = match stage {
            Stage::Random | Stage::Slight => return None,
            Stage::Closer => (100.0, 14.0),
            Stage::Final => {
                let t = (stage_elapsed_ms as f64 / FOOD_FADE_MS as f64).clamp(0.0, 1.0);
                (lerp(100.0, 255.0, t), lerp(4.0, 0.0, t))
            }
        };
        Some(Self {
            text: template_id.to_string(),
            alpha,
            blur,
        })
    }
}

/// Both panels for the current engine status
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub automation: AutomationPanel,
    pub food: Option<FoodPanel>,
}

impl Overlay {
    pub fn from_status(status: &EngineStatus) -> Self {
        Self {
            automation: AutomationPanel::new(status.automation),
            food: FoodPanel::for_stage(&status.template_id, status.stage, status.stage_elapsed_ms),
        }
    }
}

/// Format a fraction as a percentage with one decimal.
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.601), "60.1%");
        assert_eq!(format_percentage(1.0), "100.0%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn test_food_hidden_early() {
        assert_eq!(FoodPanel::for_stage("banana", Stage::Random, 0), None);
        assert_eq!(FoodPanel::for_stage("banana", Stage::Slight, 9000), None);
    }

    #[test]
    fn test_food_closer_is_blurred() {
        let panel = FoodPanel::for_stage("banana", Stage::Closer, 1234).unwrap();
        assert_eq!(panel.text, "banana");
        assert_eq!(panel.alpha, 100.0);
        assert_eq!(panel.blur, 14.0);
        assert_eq!(panel.background_alpha(), 80.0);
    }

    #[test]
    fn test_food_final_fades_in() {
        let start = FoodPanel::for_stage("taco", Stage::Final, 0).unwrap();
        assert_eq!((start.alpha, start.blur), (100.0, 4.0));

        let half = FoodPanel::for_stage("taco", Stage::Final, 250).unwrap();
        assert_eq!((half.alpha, half.blur), (177.5, 2.0));

        let done = FoodPanel::for_stage("taco", Stage::Final, 5000).unwrap();
        assert_eq!((done.alpha, done.blur), (255.0, 0.0));
    }

    #[test]
    fn test_overlay_from_status() {
        let status = EngineStatus {
            automation: 0.5,
            stage: Stage::Final,
            template_id: "cake".to_string(),
            stage_elapsed_ms: 600,
        };
        let overlay = Overlay::from_status(&status);
        assert_eq!(overlay.automation.label, AUTOMATION_LABEL);
        assert_eq!(overlay.automation.value, "50.0%");
        assert_eq!(overlay.food.map(|f| f.alpha), Some(255.0));
    }
}
