//! Ordered phases played back-to-back, with a playback cursor.

use crate::phase::AnimationCurve;

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationPath {
    enabled: bool,
    phases: Vec<AnimationCurve>,
    cursor: usize,
}

impl Default for AnimationPath {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AnimationPath {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phases: Vec::new(),
            cursor: 0,
        }
    }

    /// A path that never animates; transitions using it apply instantly.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn with_phases(phases: Vec<AnimationCurve>) -> Self {
        Self {
            enabled: true,
            phases,
            cursor: 0,
        }
    }

    pub fn push(&mut self, phase: AnimationCurve) {
        self.phases.push(phase);
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Enabled and holding at least one phase.
    #[inline]
    pub fn is_playable(&self) -> bool {
        self.enabled && !self.phases.is_empty()
    }

    #[inline]
    pub fn phases(&self) -> &[AnimationCurve] {
        &self.phases
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total duration of all phases in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.duration_ms())).sum()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Phase under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&AnimationCurve> {
        self.phases.get(self.cursor)
    }

    /// Move to the next phase. Returns `false` once the path is exhausted, in
    /// which case the cursor stays clamped on the last phase.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.phases.len() {
            self.cursor += 1;
            true
        } else {
            self.cursor = self.phases.len().saturating_sub(1);
            false
        }
    }
}
