//! Visible-tile fraction ("automation")
//!
//! Read from a small JSON document, `{"automation_percentage": 60.1}`. The
//! value may be a fraction (`0.601`) or a percentage (`60.1`); anything that
//! cannot be read falls back to [`DEFAULT_AUTOMATION`] with a warning.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Fraction used when no automation value is available
pub const DEFAULT_AUTOMATION: f64 = 0.601;

#[derive(Debug, Deserialize)]
struct AutomationFile {
    automation_percentage: Option<serde_json::Value>,
}

/// Normalize a raw value to a fraction in `[0, 1]`.
///
/// Values above 1 are read as percentages. Non-finite input yields `None`.
///
/// ```
/// use foodviz::automation::normalize;
///
/// assert_eq!(normalize(0.25), Some(0.25));
/// assert_eq!(normalize(75.0), Some(0.75));
/// assert_eq!(normalize(250.0), Some(1.0));
/// assert_eq!(normalize(f64::NAN), None);
/// ```
pub fn normalize(raw: f64) -> Option<f64> {
    if !raw.is_finite() {
        return None;
    }
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    Some(fraction.clamp(0.0, 1.0))
}

/// Parse an automation document; `None` when the value is absent or unusable.
pub fn parse_automation(json: &str) -> Option<f64> {
    let file: AutomationFile = serde_json::from_str(json).ok()?;
    let raw = match file.automation_percentage? {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    normalize(raw)
}

/// Load the automation fraction from `path`, falling back to the default.
pub fn load_automation(path: &Path) -> f64 {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "automation file not readable; using {:.1}%",
                DEFAULT_AUTOMATION * 100.0
            );
            return DEFAULT_AUTOMATION;
        }
    };

    match parse_automation(&contents) {
        Some(value) => value,
        None => {
            warn!(
                path = %path.display(),
                "automation value missing or invalid; using {:.1}%",
                DEFAULT_AUTOMATION * 100.0
            );
            DEFAULT_AUTOMATION
        }
    }
}
