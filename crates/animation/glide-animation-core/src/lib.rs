//! Glide Animation Core (compositor-agnostic)
//!
//! Timed transition curves for a tiling window manager. Bezier curves with
//! arc-length lookup tables are grouped into multi-phase paths, one per
//! transition kind, and a single engine drives the active path across the
//! participating outputs, handing `(t, x, y, scale)` to a step hook once per
//! output per frame.
//!
//! The engine never touches geometry or rendering; hosts plug in through the
//! traits in [`host`].

pub mod callbacks;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod host;
pub mod outputs;
pub mod path;
pub mod phase;
pub mod spec;
pub mod values;

// Re-exports for hosts
pub use callbacks::{Callbacks, HookFn, StepFn};
pub use config::{AnimationConfig, AnimationStyle, TransitionKind};
pub use curve::{Curve, CurveRole, LOOKUP_INTERVALS, MAX_CURVE_ORDER};
pub use engine::{AnimationEngine, Decision};
pub use error::{ConfigError, CurveError, TimerError};
pub use host::{AnimationHost, Clock, FrameScheduler, ManualHost, TimerId, TimerSource};
pub use outputs::{OutputId, OutputScope, Participants, ScopeGuard};
pub use path::AnimationPath;
pub use phase::AnimationCurve;
pub use spec::{parse_animation_config_json, AnimationConfigSpec, CurveSpec};
pub use values::FrameValues;
