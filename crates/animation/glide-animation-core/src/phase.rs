//! One timed phase of a transition: a variable (easing) curve paired with an
//! offset curve and a duration.

use std::time::Duration;

use crate::curve::Curve;
use crate::error::CurveError;
use crate::values::FrameValues;

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationCurve {
    duration_ms: u32,
    offset_scale: f64,
    variable: Curve,
    offset: Curve,
}

impl AnimationCurve {
    /// Pair two already-built curves. Rejects a zero duration, which would
    /// divide by zero when normalizing elapsed time.
    pub fn new(
        duration_ms: u32,
        variable: Curve,
        offset_scale: f64,
        offset: Curve,
    ) -> Result<Self, CurveError> {
        if duration_ms == 0 {
            return Err(CurveError::ZeroDuration);
        }
        Ok(Self {
            duration_ms,
            offset_scale,
            variable,
            offset,
        })
    }

    /// Build both curves from flattened control points.
    #[allow(clippy::too_many_arguments)]
    pub fn from_points(
        duration_ms: u32,
        var_order: u32,
        var_points: &[f64],
        var_simple: bool,
        offset_scale: f64,
        off_order: u32,
        off_points: &[f64],
    ) -> Result<Self, CurveError> {
        if duration_ms == 0 {
            return Err(CurveError::ZeroDuration);
        }
        let variable = Curve::variable(var_order, var_points, var_simple)?;
        let offset = Curve::offset(off_order, off_points)?;
        Self::new(duration_ms, variable, offset_scale, offset)
    }

    /// Linear easing, no offset.
    pub fn linear(duration_ms: u32) -> Result<Self, CurveError> {
        Self::new(duration_ms, Curve::linear(), 0.0, Curve::linear())
    }

    #[inline]
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }

    #[inline]
    pub fn offset_scale(&self) -> f64 {
        self.offset_scale
    }

    #[inline]
    pub fn variable(&self) -> &Curve {
        &self.variable
    }

    #[inline]
    pub fn offset(&self) -> &Curve {
        &self.offset
    }

    /// Evaluate at normalized progress `u` within this phase.
    pub fn values(&self, u: f64) -> FrameValues {
        if u >= 1.0 {
            return FrameValues::TERMINAL;
        }
        let (t_off, t) = if self.variable.is_linear() {
            (u, u)
        } else {
            self.variable.lookup(u)
        };

        let t_off = t_off.max(0.0);
        if t_off >= 1.0 {
            return FrameValues::TERMINAL;
        }
        if self.offset.is_linear() {
            return FrameValues::new(t, t, 0.0, 0.0);
        }
        let (x, y) = self.offset.lookup(t_off);
        FrameValues::new(t, x, y, self.offset_scale)
    }
}
