//! Bezier curves with a precomputed reparametrization table.
//!
//! Control points live in two dimensions: dimension 0 is the progress axis and
//! dimension 1 is the curve's own secondary axis. The first control point is
//! always the origin and the last one is fixed by the curve's [`CurveRole`].
//!
//! Two table modes exist:
//! - arc-length (default): `table[i]` is the Bezier parameter at which `i/K`
//!   of the total arc length has been travelled;
//! - simple: a cubic in compatibility mode (CSS-style `cubic-bezier`), where
//!   `table[i]` approximates `y` at `x = i/K`.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Number of intervals in a lookup table; tables hold `LOOKUP_INTERVALS + 1` samples.
pub const LOOKUP_INTERVALS: usize = 100;

const NDIM: usize = 2;

/// Width (on the progress axis) below which simple-mode bisection stops.
const SIMPLE_TOLERANCE: f64 = 0.001;
/// Bisection depth bound for curves whose `x(t)` never narrows (looping inputs).
const MAX_BISECT_DEPTH: u32 = 40;
/// Total spans one simple-mode table may visit; unreached buckets are gap-filled.
const MAX_BISECT_SPANS: usize = 50_000;

/// Highest accepted curve order.
pub const MAX_CURVE_ORDER: u32 = 256;

/// What a curve drives; fixes the end control point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveRole {
    /// Primary easing: ends at (1, 1).
    Variable,
    /// Secondary offset vector: ends at (1, 0).
    Offset,
}

impl CurveRole {
    #[inline]
    pub fn end_point(self) -> [f64; NDIM] {
        match self {
            CurveRole::Variable => [1.0, 1.0],
            CurveRole::Offset => [1.0, 0.0],
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            CurveRole::Variable => "variable",
            CurveRole::Offset => "offset",
        }
    }
}

/// A single Bezier polynomial plus its lookup table.
///
/// A degree-0 curve is the "no curve" marker: it evaluates and looks up as the
/// linear identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    degree: usize,
    control: [Vec<f64>; NDIM],
    simple: bool,
    table: [f64; LOOKUP_INTERVALS + 1],
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Curve {
    /// Linear identity (degree 0).
    pub fn linear() -> Self {
        let mut table = [0.0; LOOKUP_INTERVALS + 1];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as f64 / LOOKUP_INTERVALS as f64;
        }
        Self {
            degree: 0,
            control: [vec![0.0], vec![0.0]],
            simple: false,
            table,
        }
    }

    /// Build a curve of `order` from the flattened interior control points
    /// `[x1, y1, x2, y2, ...]`.
    ///
    /// `points` must hold `2 * (order - 1)` values. An empty point list yields
    /// the linear identity. `simple` is only accepted for cubics.
    pub fn new(
        order: u32,
        points: &[f64],
        simple: bool,
        role: CurveRole,
    ) -> Result<Self, CurveError> {
        if order > MAX_CURVE_ORDER {
            return Err(CurveError::OrderTooHigh {
                curve: role.name(),
                order,
                max: MAX_CURVE_ORDER,
            });
        }
        let expected = NDIM * order.saturating_sub(1) as usize;
        if points.len() != expected {
            return Err(CurveError::InvalidPointCount {
                curve: role.name(),
                order,
                expected,
                actual: points.len(),
            });
        }
        if simple && order != 3 {
            return Err(CurveError::InvalidSimpleCurve { order });
        }
        if points.is_empty() {
            return Ok(Self::linear());
        }

        let n = order as usize;
        let end = role.end_point();
        let mut control = [vec![0.0; n + 1], vec![0.0; n + 1]];
        for (i, pair) in points.chunks_exact(NDIM).enumerate() {
            for (d, value) in pair.iter().enumerate() {
                control[d][i + 1] = *value;
            }
        }
        for (d, axis) in control.iter_mut().enumerate() {
            axis[n] = end[d];
        }

        let mut curve = Self {
            degree: n,
            control,
            simple,
            table: [0.0; LOOKUP_INTERVALS + 1],
        };
        if simple {
            curve.fill_table_simple();
        } else {
            curve.fill_table_arc_length();
        }
        Ok(curve)
    }

    /// Primary easing curve ending at (1, 1).
    #[inline]
    pub fn variable(order: u32, points: &[f64], simple: bool) -> Result<Self, CurveError> {
        Self::new(order, points, simple, CurveRole::Variable)
    }

    /// Offset curve ending at (1, 0); always arc-length mode.
    #[inline]
    pub fn offset(order: u32, points: &[f64]) -> Result<Self, CurveError> {
        Self::new(order, points, false, CurveRole::Offset)
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.degree == 0
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Control points of one dimension (0 = progress axis, 1 = secondary axis).
    #[inline]
    pub fn control(&self, dim: usize) -> &[f64] {
        &self.control[dim]
    }

    #[inline]
    pub fn table(&self) -> &[f64] {
        &self.table
    }

    /// Evaluate the Bezier at parameter `t` via the Bernstein basis.
    pub fn evaluate(&self, t: f64) -> [f64; NDIM] {
        if self.is_linear() {
            return [t, t];
        }
        let n = self.degree;
        let mut out = [0.0; NDIM];
        for i in 0..=n {
            let b = bernstein(n, i, t);
            for (d, acc) in out.iter_mut().enumerate() {
                *acc += self.control[d][i] * b;
            }
        }
        out
    }

    /// Map uniform progress `t` through the table.
    ///
    /// Simple curves return `(t, y(t))`; arc-length curves return the Bezier
    /// point at the reparametrized parameter.
    pub fn lookup(&self, t: f64) -> (f64, f64) {
        if self.is_linear() {
            return (t, t);
        }
        let t = t.clamp(0.0, 1.0);
        let pos = t * LOOKUP_INTERVALS as f64;
        let lo = pos.floor();
        let hi = pos.ceil();
        let u = if lo != hi {
            let k = pos - lo;
            (1.0 - k) * self.table[lo as usize] + k * self.table[hi as usize]
        } else {
            self.table[lo as usize]
        };
        if self.simple {
            return (t, u);
        }
        let p = self.evaluate(u);
        (p[0], p[1])
    }

    fn fill_table_arc_length(&mut self) {
        let k = LOOKUP_INTERVALS as f64;
        let mut segments = [0.0; LOOKUP_INTERVALS + 1];
        let mut prev = self.evaluate(0.0);
        let mut length = 0.0;
        for (i, seg) in segments.iter_mut().enumerate() {
            let p = self.evaluate(i as f64 / k);
            *seg = distance(prev, p);
            length += *seg;
            prev = p;
        }

        let mut last = 0usize;
        let mut len0 = 0.0;
        let mut len1 = 0.0;
        let mut u0 = 0.0;
        for i in 0..=LOOKUP_INTERVALS {
            let target = i as f64 * length / k;
            while target > len1 && last < LOOKUP_INTERVALS {
                len0 = len1;
                u0 = last as f64 / k;
                last += 1;
                len1 += segments[last];
            }
            self.table[i] = if last == 0 {
                0.0
            } else {
                let u1 = last as f64 / k;
                let span = len1 - len0;
                if span > 0.0 {
                    let w = ((target - len0) / span).clamp(0.0, 1.0);
                    (1.0 - w) * u0 + w * u1
                } else {
                    u1
                }
            };
        }
    }

    /// Invert `x(t)` by bisection on an explicit stack.
    ///
    /// Spans entirely outside `[0, 1]` on the progress axis are dropped, and
    /// the walk stops after `MAX_BISECT_SPANS` spans. Buckets never reached
    /// (possible when `x(t)` loops back or is very steep) inherit the previous
    /// bucket's value, so the table stays defined everywhere.
    fn fill_table_simple(&mut self) {
        let k = LOOKUP_INTERVALS as f64;
        let mut filled = [false; LOOKUP_INTERVALS + 1];
        let mut stack = vec![Bisect {
            t0: 0.0,
            x0: 0.0,
            t1: 1.0,
            x1: 1.0,
            depth: 0,
        }];

        let mut visited = 0usize;
        while let Some(span) = stack.pop() {
            visited += 1;
            if visited > MAX_BISECT_SPANS {
                break;
            }
            if span.x1 < 0.0
                || span.x0.min(span.x1) > 1.0
                || span.x0 * k > (span.x1 * k).floor()
            {
                continue;
            }
            let t = 0.5 * (span.t0 + span.t1);
            let mid = self.evaluate(t);
            if span.x1 - span.x0 < SIMPLE_TOLERANCE || span.depth >= MAX_BISECT_DEPTH {
                let bucket = ((span.x1 * k).floor() as usize).min(LOOKUP_INTERVALS);
                self.table[bucket] = mid[1];
                filled[bucket] = true;
                continue;
            }
            // Right half first so the left half is processed first.
            stack.push(Bisect {
                t0: t,
                x0: mid[0],
                t1: span.t1,
                x1: span.x1,
                depth: span.depth + 1,
            });
            stack.push(Bisect {
                t0: span.t0,
                x0: span.x0,
                t1: t,
                x1: mid[0],
                depth: span.depth + 1,
            });
        }

        let mut carry = 0.0;
        for (slot, hit) in self.table.iter_mut().zip(filled) {
            if hit {
                carry = *slot;
            } else {
                *slot = carry;
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Bisect {
    t0: f64,
    x0: f64,
    t1: f64,
    x1: f64,
    depth: u32,
}

/// `C(n, i)` by iterative product/quotient in `f64`; finite for every
/// accepted order.
#[inline]
fn binomial(n: usize, i: usize) -> f64 {
    if i > n {
        return 0.0;
    }
    let i = i.min(n - i);
    let mut c = 1.0;
    for k in 0..i {
        c = c * (n - k) as f64 / (k + 1) as f64;
    }
    c
}

#[inline]
fn bernstein(n: usize, i: usize, t: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }
    binomial(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
}

#[inline]
fn distance(a: [f64; NDIM], b: [f64; NDIM]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(p, q)| (q - p) * (q - p))
        .sum::<f64>()
        .sqrt()
}
