//! Animation configuration: one path per transition kind plus global knobs.

use std::time::Duration;

use hashbrown::HashMap;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::path::AnimationPath;
use crate::phase::AnimationCurve;
use crate::spec::AnimationConfigSpec;

/// Tick period used when none is configured (~60 Hz).
pub const DEFAULT_FREQUENCY_MS: u32 = 16;

/// Built-in default easing: 300 ms ease-out cubic, arc-length mode.
pub const DEFAULT_DURATION_MS: u32 = 300;
pub const DEFAULT_CURVE_POINTS: [f64; 4] = [0.215, 0.61, 0.355, 1.0];

/// Transition kinds a caller can request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Disabled,
    #[default]
    Default,
    WindowOpen,
    WindowSize,
    WindowMove,
    WindowMoveFloat,
    WindowFullscreen,
    WorkspaceSwitch,
    Overview,
    Jump,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 10] = [
        TransitionKind::Disabled,
        TransitionKind::Default,
        TransitionKind::WindowOpen,
        TransitionKind::WindowSize,
        TransitionKind::WindowMove,
        TransitionKind::WindowMoveFloat,
        TransitionKind::WindowFullscreen,
        TransitionKind::WorkspaceSwitch,
        TransitionKind::Overview,
        TransitionKind::Jump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransitionKind::Disabled => "disabled",
            TransitionKind::Default => "default",
            TransitionKind::WindowOpen => "window_open",
            TransitionKind::WindowSize => "window_size",
            TransitionKind::WindowMove => "window_move",
            TransitionKind::WindowMoveFloat => "window_move_float",
            TransitionKind::WindowFullscreen => "window_fullscreen",
            TransitionKind::WorkspaceSwitch => "workspace_switch",
            TransitionKind::Overview => "overview",
            TransitionKind::Jump => "jump",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// How hosts render in-flight geometry. Carried for callers; the engine does
/// not read it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    Clip,
    #[default]
    Scale,
}

#[derive(Clone, Debug)]
pub struct AnimationConfig {
    /// Master switch; when off every transition applies instantly.
    pub enabled: bool,
    /// Frame request period in milliseconds.
    pub frequency_ms: u32,
    pub style: AnimationStyle,
    default_path: AnimationPath,
    disabled_path: AnimationPath,
    paths: HashMap<TransitionKind, AnimationPath>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_ms: DEFAULT_FREQUENCY_MS,
            style: AnimationStyle::default(),
            default_path: builtin_default_path(),
            disabled_path: AnimationPath::disabled(),
            paths: HashMap::new(),
        }
    }
}

fn builtin_default_path() -> AnimationPath {
    match AnimationCurve::from_points(
        DEFAULT_DURATION_MS,
        3,
        &DEFAULT_CURVE_POINTS,
        false,
        0.0,
        0,
        &[],
    ) {
        Ok(curve) => AnimationPath::with_phases(vec![curve]),
        Err(err) => {
            error!("built-in default animation curve rejected: {err}");
            AnimationPath::disabled()
        }
    }
}

impl AnimationConfig {
    /// Parse a JSON configuration document. See [`crate::spec`] for the shape.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let spec: AnimationConfigSpec = serde_json::from_str(s)?;
        Self::from_spec(&spec)
    }

    /// Build from parsed descriptors. Rejected curves are logged and skipped.
    pub fn from_spec(spec: &AnimationConfigSpec) -> Result<Self, ConfigError> {
        if spec.frequency_ms == 0 {
            return Err(ConfigError::InvalidFrequency);
        }
        let mut config = Self {
            enabled: spec.enabled,
            frequency_ms: spec.frequency_ms,
            style: spec.style,
            ..Self::default()
        };
        for (name, entry) in &spec.paths {
            let Some(kind) = TransitionKind::from_name(name) else {
                warn!("ignoring animation path for unknown transition '{name}'");
                continue;
            };
            if kind == TransitionKind::Disabled {
                debug!("'disabled' always plays instantly; ignoring its configured curves");
                continue;
            }
            let Some(curves) = entry else {
                // null: fall back to the default path
                continue;
            };
            config.set_path(kind, crate::spec::build_path(kind, curves));
        }
        Ok(config)
    }

    /// Tick period as a `Duration` (never zero).
    #[inline]
    pub fn frequency(&self) -> Duration {
        Duration::from_millis(u64::from(self.frequency_ms.max(1)))
    }

    /// The path configured for `kind`, or `None` when the kind is unmapped.
    pub fn path(&self, kind: TransitionKind) -> Option<&AnimationPath> {
        match kind {
            TransitionKind::Disabled => Some(&self.disabled_path),
            TransitionKind::Default => Some(&self.default_path),
            other => self.paths.get(&other),
        }
    }

    /// The path `kind` plays: its own when mapped, the default path otherwise.
    pub fn resolve(&self, kind: TransitionKind) -> &AnimationPath {
        self.path(kind).unwrap_or(&self.default_path)
    }

    pub(crate) fn resolve_mut(&mut self, kind: TransitionKind) -> &mut AnimationPath {
        match kind {
            TransitionKind::Disabled => &mut self.disabled_path,
            TransitionKind::Default => &mut self.default_path,
            other => match self.paths.get_mut(&other) {
                Some(path) => path,
                None => &mut self.default_path,
            },
        }
    }

    /// Install a path for `kind`. `Default` replaces the default path;
    /// `Disabled` is fixed and cannot be replaced.
    pub fn set_path(&mut self, kind: TransitionKind, path: AnimationPath) {
        match kind {
            TransitionKind::Disabled => warn!("the disabled animation path is fixed"),
            TransitionKind::Default => self.default_path = path,
            other => {
                self.paths.insert(other, path);
            }
        }
    }

    /// Unmap `kind` so it falls back to the default path. Clearing `Default`
    /// restores the built-in default.
    pub fn clear_path(&mut self, kind: TransitionKind) {
        match kind {
            TransitionKind::Disabled => {}
            TransitionKind::Default => self.default_path = builtin_default_path(),
            other => {
                self.paths.remove(&other);
            }
        }
    }

    #[inline]
    pub fn default_path(&self) -> &AnimationPath {
        &self.default_path
    }

    /// Whether `kind` has its own path (rather than falling back).
    #[inline]
    pub fn is_mapped(&self, kind: TransitionKind) -> bool {
        self.path(kind).is_some()
    }
}
