//! Seams between the engine and the event loop that drives it.
//!
//! A compositor implements these over its real clock, render backend, and
//! event-loop timers. [`ManualHost`] is a deterministic in-process host for
//! headless drivers and tests.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::AnimationEngine;
use crate::error::TimerError;
use crate::outputs::OutputId;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub trait FrameScheduler {
    /// Ask the render backend to produce a frame for `output`; it answers
    /// later with [`AnimationEngine::animate`].
    fn schedule_frame(&mut self, output: OutputId);

    /// Outputs currently enabled on the host, in host order.
    fn enabled_outputs(&self) -> Vec<OutputId>;
}

/// One-shot event-loop timers. The engine re-arms after every tick.
pub trait TimerSource {
    fn create_timer(&mut self) -> Result<TimerId, TimerError>;
    fn arm_timer(&mut self, timer: TimerId, after: Duration);
    fn remove_timer(&mut self, timer: TimerId);
}

/// Everything the engine needs from its host.
pub trait AnimationHost: Clock + FrameScheduler + TimerSource {}

impl<T: Clock + FrameScheduler + TimerSource + ?Sized> AnimationHost for T {}

/// Host with a hand-driven clock that records frame requests and timers.
#[derive(Debug)]
pub struct ManualHost {
    origin: Instant,
    offset: Duration,
    outputs: Vec<OutputId>,
    frame_requests: Vec<OutputId>,
    timers: IndexMap<TimerId, Option<Duration>>,
    next_timer: u32,
    fail_timers: bool,
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
            outputs: Vec::new(),
            frame_requests: Vec::new(),
            timers: IndexMap::new(),
            next_timer: 0,
            fail_timers: false,
        }
    }

    pub fn with_outputs(outputs: impl IntoIterator<Item = OutputId>) -> Self {
        let mut host = Self::new();
        host.set_outputs(outputs);
        host
    }

    pub fn set_outputs(&mut self, outputs: impl IntoIterator<Item = OutputId>) {
        self.outputs = outputs.into_iter().collect();
    }

    /// Make every later `create_timer` call fail.
    pub fn set_fail_timers(&mut self, fail: bool) {
        self.fail_timers = fail;
    }

    pub fn advance(&mut self, by: Duration) {
        self.offset += by;
    }

    #[inline]
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Time elapsed on this host's clock since it was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.offset
    }

    pub fn frame_requests(&self) -> &[OutputId] {
        &self.frame_requests
    }

    pub fn take_frame_requests(&mut self) -> Vec<OutputId> {
        std::mem::take(&mut self.frame_requests)
    }

    /// Live timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// The first armed timer and its interval.
    pub fn armed_timer(&self) -> Option<(TimerId, Duration)> {
        self.timers
            .iter()
            .find_map(|(id, armed)| armed.map(|after| (*id, after)))
    }

    /// Fire the armed timer, if any, into `engine`. Returns whether one fired.
    pub fn fire_timer(&mut self, engine: &mut AnimationEngine) -> bool {
        let Some((id, _)) = self.armed_timer() else {
            return false;
        };
        if let Some(slot) = self.timers.get_mut(&id) {
            *slot = None;
        }
        engine.on_timer(self);
        true
    }

    /// Deliver every outstanding frame request to `engine`, one `animate`
    /// per distinct output. Returns the number delivered.
    pub fn render_pending(&mut self, engine: &mut AnimationEngine) -> usize {
        let mut requests = self.take_frame_requests();
        let mut seen = Vec::with_capacity(requests.len());
        requests.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        for output in &requests {
            engine.animate(*output, self);
        }
        requests.len()
    }

    /// Advance the clock, fire the timer, and render what it requested.
    pub fn tick(&mut self, engine: &mut AnimationEngine, by: Duration) -> usize {
        self.advance(by);
        self.fire_timer(engine);
        self.render_pending(engine)
    }
}

impl Clock for ManualHost {
    fn now(&self) -> Instant {
        self.origin + self.offset
    }
}

impl FrameScheduler for ManualHost {
    fn schedule_frame(&mut self, output: OutputId) {
        self.frame_requests.push(output);
    }

    fn enabled_outputs(&self) -> Vec<OutputId> {
        self.outputs.clone()
    }
}

impl TimerSource for ManualHost {
    fn create_timer(&mut self) -> Result<TimerId, TimerError> {
        if self.fail_timers {
            return Err(TimerError::Unavailable("manual host timers disabled".into()));
        }
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        self.timers.insert(id, None);
        Ok(id)
    }

    fn arm_timer(&mut self, timer: TimerId, after: Duration) {
        if let Some(slot) = self.timers.get_mut(&timer) {
            *slot = Some(after);
        }
    }

    fn remove_timer(&mut self, timer: TimerId) {
        self.timers.shift_remove(&timer);
    }
}
