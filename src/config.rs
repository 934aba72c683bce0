//! Runtime configuration loaded from `MAPCANVAS_*` environment variables.
//!
//! Every variable is optional; an absent variable keeps the built-in
//! default. A present but unparsable or out-of-range value is an error
//! rather than a silent fallback, so a typo in a deployment shows up at
//! startup.
//!
//! | Variable | Field |
//! |---|---|
//! | `MAPCANVAS_CLOSURE_RATIO` | `classifier.closure_ratio` |
//! | `MAPCANVAS_CIRCULARITY_THRESHOLD` | `classifier.circularity_threshold` |
//! | `MAPCANVAS_ASPECT_RATIO_THRESHOLD` | `classifier.aspect_ratio_threshold` |
//! | `MAPCANVAS_OPEN_TOLERANCE` | `classifier.open_tolerance` |
//! | `MAPCANVAS_IRREGULAR_TOLERANCE` | `classifier.irregular_tolerance` |
//! | `MAPCANVAS_MAX_UNDO` | `max_undo` |
//! | `MAPCANVAS_ZOOM_STEP` | `zoom_step` |
//! | `MAPCANVAS_GRATICULE_SPACING` | `graticule_spacing` |

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify::ClassifierConfig;
use crate::consts::{GRATICULE_SPACING_DEG, MAX_UNDO, ZOOM_STEP};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Malformed { var: &'static str, value: String },
    #[error("{var}: {value} is out of range, expected {expected}")]
    OutOfRange { var: &'static str, value: String, expected: &'static str },
}

/// Settings for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub classifier: ClassifierConfig,
    /// Undo history depth.
    pub max_undo: usize,
    /// Zoom factor per wheel notch.
    pub zoom_step: f64,
    /// Degrees between graticule lines.
    pub graticule_spacing: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            max_undo: MAX_UNDO,
            zoom_step: ZOOM_STEP,
            graticule_spacing: GRATICULE_SPACING_DEG,
        }
    }
}

impl CanvasConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable is malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            // Surface as a parse failure with the lossy text.
            Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable is malformed or out of range.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let classifier = ClassifierConfig {
            closure_ratio: var(&lookup, "MAPCANVAS_CLOSURE_RATIO", defaults.classifier.closure_ratio, non_negative)?,
            circularity_threshold: var(
                &lookup,
                "MAPCANVAS_CIRCULARITY_THRESHOLD",
                defaults.classifier.circularity_threshold,
                non_negative,
            )?,
            aspect_ratio_threshold: var(
                &lookup,
                "MAPCANVAS_ASPECT_RATIO_THRESHOLD",
                defaults.classifier.aspect_ratio_threshold,
                unit_interval,
            )?,
            open_tolerance: var(&lookup, "MAPCANVAS_OPEN_TOLERANCE", defaults.classifier.open_tolerance, non_negative)?,
            irregular_tolerance: var(
                &lookup,
                "MAPCANVAS_IRREGULAR_TOLERANCE",
                defaults.classifier.irregular_tolerance,
                non_negative,
            )?,
            ..defaults.classifier
        };

        Ok(Self {
            classifier,
            max_undo: var(&lookup, "MAPCANVAS_MAX_UNDO", defaults.max_undo, |_| Ok(()))?,
            zoom_step: var(&lookup, "MAPCANVAS_ZOOM_STEP", defaults.zoom_step, above_one)?,
            graticule_spacing: var(&lookup, "MAPCANVAS_GRATICULE_SPACING", defaults.graticule_spacing, spacing)?,
        })
    }
}

/// Parse one variable, falling back to `default` when absent.
fn var<T, F, C>(lookup: &F, key: &'static str, default: T, check: C) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
    C: Fn(&T) -> Result<(), &'static str>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let Ok(value) = raw.trim().parse::<T>() else {
        warn!(var = key, value = %raw, "rejecting malformed configuration");
        return Err(ConfigError::Malformed { var: key, value: raw });
    };
    if let Err(expected) = check(&value) {
        warn!(var = key, value = %raw, expected, "rejecting out-of-range configuration");
        return Err(ConfigError::OutOfRange { var: key, value: raw, expected });
    }
    Ok(value)
}

fn non_negative(v: &f64) -> Result<(), &'static str> {
    if v.is_finite() && *v >= 0.0 { Ok(()) } else { Err("a finite value >= 0") }
}

fn unit_interval(v: &f64) -> Result<(), &'static str> {
    if (0.0..=1.0).contains(v) { Ok(()) } else { Err("a value in [0, 1]") }
}

fn above_one(v: &f64) -> Result<(), &'static str> {
    if v.is_finite() && *v > 1.0 { Ok(()) } else { Err("a finite value > 1") }
}

fn spacing(v: &u32) -> Result<(), &'static str> {
    if (1..=180).contains(v) { Ok(()) } else { Err("1 to 180 degrees") }
}
