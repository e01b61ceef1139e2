//! Serde descriptors for animation configuration documents.

use indexmap::IndexMap;
use log::error;
use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, AnimationStyle, TransitionKind, DEFAULT_FREQUENCY_MS};
use crate::error::{ConfigError, CurveError};
use crate::path::AnimationPath;
use crate::phase::AnimationCurve;

/// Public API: parse a JSON animation configuration into an [`AnimationConfig`].
///
/// Shape:
/// ```json
/// {
///   "enabled": true,
///   "frequency_ms": 16,
///   "style": "scale",
///   "paths": {
///     "default": [{ "duration_ms": 300, "order": 3, "points": [0.215, 0.61, 0.355, 1.0] }],
///     "window_move": [
///       { "duration_ms": 120, "order": 3, "points": [0.25, 0.1, 0.25, 1.0], "simple": true },
///       { "duration_ms": 80 }
///     ],
///     "jump": null
///   }
/// }
/// ```
///
/// Notes:
/// - Every top-level key is optional.
/// - A `null` or missing kind falls back to the default path; `[]` plays instantly.
/// - Rejected curve descriptors are logged and skipped, never returned as errors.
pub fn parse_animation_config_json(s: &str) -> Result<AnimationConfig, ConfigError> {
    AnimationConfig::from_json(s)
}

/// One phase as written in configuration. Points are flattened `x, y` pairs of
/// the interior control points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    pub duration_ms: u32,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub points: Vec<f64>,
    #[serde(default)]
    pub simple: bool,
    #[serde(default)]
    pub offset_scale: f64,
    #[serde(default)]
    pub offset_order: u32,
    #[serde(default)]
    pub offset_points: Vec<f64>,
}

impl CurveSpec {
    pub fn build(&self) -> Result<AnimationCurve, CurveError> {
        AnimationCurve::from_points(
            self.duration_ms,
            self.order,
            &self.points,
            self.simple,
            self.offset_scale,
            self.offset_order,
            &self.offset_points,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfigSpec {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_frequency_ms")]
    pub frequency_ms: u32,
    #[serde(default)]
    pub style: AnimationStyle,
    #[serde(default)]
    pub paths: IndexMap<String, Option<Vec<CurveSpec>>>,
}

impl Default for AnimationConfigSpec {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            frequency_ms: default_frequency_ms(),
            style: AnimationStyle::default(),
            paths: IndexMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_frequency_ms() -> u32 {
    DEFAULT_FREQUENCY_MS
}

/// Build a path from descriptors, dropping (and logging) any that fail.
pub(crate) fn build_path(kind: TransitionKind, curves: &[CurveSpec]) -> AnimationPath {
    let mut path = AnimationPath::new(true);
    for (idx, spec) in curves.iter().enumerate() {
        match spec.build() {
            Ok(phase) => path.push(phase),
            Err(err) => error!(
                "animation '{}': phase {idx} rejected: {err}",
                kind.name()
            ),
        }
    }
    path
}
