//! Per-frame interpolation parameters handed to the step hook.

use serde::{Deserialize, Serialize};

/// `t` is the primary eased progress (size/position), `(x, y)` a secondary
/// vector such as drift or parallax, and `scale` the weight to apply to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameValues {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl FrameValues {
    /// Values reported once a phase, path, or animation has completed.
    pub const TERMINAL: FrameValues = FrameValues {
        t: 1.0,
        x: 1.0,
        y: 0.0,
        scale: 0.0,
    };

    #[inline]
    pub fn new(t: f64, x: f64, y: f64, scale: f64) -> Self {
        Self { t, x, y, scale }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINAL
    }

    /// Offset vector already weighted by `scale`.
    #[inline]
    pub fn weighted_offset(&self) -> [f64; 2] {
        [self.x * self.scale, self.y * self.scale]
    }

    /// Tuple form `(t, x, y, scale)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.t, self.x, self.y, self.scale)
    }
}

impl Default for FrameValues {
    fn default() -> Self {
        Self::TERMINAL
    }
}
