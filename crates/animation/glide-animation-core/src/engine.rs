//! AnimationEngine: the single state machine arbitrating which transition is
//! playing, on which outputs, and at what tick rate.
//!
//! Flow:
//! - callers pick the pending kind and hooks (`set_type`, `set_callbacks`), then `begin`
//! - `begin` arms a repeating timer and requests frames from every participant
//! - the host answers each frame request with `animate(output)`, which steps the hook
//! - outputs drop out once the path is exhausted; the last one stops the animation

use std::time::Instant;

use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};

use crate::callbacks::Callbacks;
use crate::config::{AnimationConfig, AnimationStyle, TransitionKind};
use crate::host::{AnimationHost, TimerId};
use crate::outputs::{OutputId, OutputScope, Participants};
use crate::path::AnimationPath;
use crate::values::FrameValues;

/// Whether a tentatively started animation is actually going to be shown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[default]
    Unknown,
    Yes,
    No,
}

impl Decision {
    /// `Unknown` takes either answer, `No` can be overturned to `Yes`, and
    /// `Yes` is final.
    pub fn ratchet(self, enable: bool) -> Self {
        match (self, enable) {
            (Decision::Unknown, true) | (Decision::No, true) => Decision::Yes,
            (Decision::Unknown, false) => Decision::No,
            (current, _) => current,
        }
    }
}

/// Transition kind plus the hooks that will run for it.
#[derive(Clone, Debug, Default)]
struct Slot {
    kind: TransitionKind,
    callbacks: Callbacks,
}

impl Slot {
    fn with_callbacks(callbacks: Callbacks) -> Self {
        Self {
            kind: TransitionKind::Default,
            callbacks,
        }
    }
}

#[derive(Debug)]
pub struct AnimationEngine {
    config: AnimationConfig,
    reloading: bool,

    running: bool,
    start: Option<Instant>,
    elapsed: f64,
    timer: Option<TimerId>,
    decision: Decision,

    current: Slot,
    pending: Slot,
    default_callbacks: Callbacks,

    participants: Participants,
    scope: OutputScope,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

/// The path a slot plays, if animations are on and the path is enabled.
fn active_path(
    config: &AnimationConfig,
    kind: TransitionKind,
    reloading: bool,
) -> Option<&AnimationPath> {
    if !config.enabled || reloading {
        return None;
    }
    Some(config.resolve(kind)).filter(|p| p.enabled())
}

fn active_path_mut(
    config: &mut AnimationConfig,
    kind: TransitionKind,
    reloading: bool,
) -> Option<&mut AnimationPath> {
    if !config.enabled || reloading {
        return None;
    }
    Some(config.resolve_mut(kind)).filter(|p| p.enabled())
}

impl AnimationEngine {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            reloading: false,
            running: false,
            start: None,
            elapsed: 1.0,
            timer: None,
            decision: Decision::Unknown,
            current: Slot::default(),
            pending: Slot::default(),
            default_callbacks: Callbacks::default(),
            participants: Participants::new(),
            scope: OutputScope::new(),
        }
    }

    // ---------- Pending transition ----------

    /// Select the path the next `begin` will play.
    pub fn set_type(&mut self, kind: TransitionKind) {
        self.pending.kind = kind;
    }

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.pending.callbacks = callbacks;
    }

    /// Hooks the pending slot falls back to after every `begin`.
    pub fn set_default_callbacks(&mut self, callbacks: Callbacks) {
        self.default_callbacks = callbacks;
    }

    pub fn pending_kind(&self) -> TransitionKind {
        self.pending.kind
    }

    pub fn pending_callbacks(&self) -> &Callbacks {
        &self.pending.callbacks
    }

    pub fn pending_callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.pending.callbacks
    }

    pub fn current_kind(&self) -> TransitionKind {
        self.current.kind
    }

    // ---------- Lifecycle ----------

    /// Start the pending transition, retiring any running one first.
    ///
    /// When the resolved path cannot play (disabled, empty, animations off,
    /// or a reload in progress) the step hook fires once with terminal values
    /// and the engine stays idle.
    pub fn begin<H: AnimationHost + ?Sized>(&mut self, host: &mut H) {
        self.stop(host);

        let fresh = Slot::with_callbacks(self.default_callbacks.clone());
        self.current = std::mem::replace(&mut self.pending, fresh);
        self.decision = Decision::Unknown;
        self.elapsed = 0.0;

        let kind = self.current.kind;
        let playable = match active_path_mut(&mut self.config, kind, self.reloading) {
            Some(path) if path.is_playable() => {
                path.reset();
                true
            }
            _ => false,
        };

        if !playable {
            debug!("'{}' transition applies instantly", kind.name());
            self.elapsed = 1.0;
            self.step(FrameValues::TERMINAL);
            return;
        }

        self.running = true;
        self.start = Some(host.now());
        debug!(
            "begin '{}' animation on {} output(s)",
            kind.name(),
            self.participants.len()
        );
        self.current.callbacks.fire_begin();
        self.schedule_frames(host);

        if let Some(stale) = self.timer.take() {
            host.remove_timer(stale);
        }
        match host.create_timer() {
            Ok(timer) => {
                host.arm_timer(timer, self.config.frequency());
                self.timer = Some(timer);
            }
            Err(err) => {
                error!("unable to create animation timer: {err}");
                self.finish_without_timer(host);
            }
        }
    }

    /// Stop the running animation. Safe to call while idle.
    pub fn end<H: AnimationHost + ?Sized>(&mut self, host: &mut H) {
        self.stop(host);
    }

    /// Render-backend notification that `output` is about to draw a frame.
    pub fn animate<H: AnimationHost + ?Sized>(&mut self, output: OutputId, host: &mut H) {
        if !self.running {
            trace!("ignoring frame for output {}: no animation running", output.0);
            return;
        }
        let ended = self.advance_time(host.now());
        trace!("animate output {} at {:.3}", output.0, self.elapsed);

        let values = self.values();
        {
            let _scope = self.scope.narrow(self.participants.iter());
            self.step(values);
        }

        if ended && self.participants.remove(output) {
            debug!("output {} finished animating", output.0);
        }
        if self.decision == Decision::No || self.participants.is_empty() {
            self.stop(host);
        }
    }

    /// Timer tick: request frames and re-arm.
    pub fn on_timer<H: AnimationHost + ?Sized>(&mut self, host: &mut H) {
        if !self.running {
            return;
        }
        if self.participants.is_empty() {
            debug!("no outputs left to animate; stopping");
            self.stop(host);
            return;
        }
        self.schedule_frames(host);
        if let Some(timer) = self.timer {
            host.arm_timer(timer, self.config.frequency());
        }
    }

    fn stop<H: AnimationHost + ?Sized>(&mut self, host: &mut H) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(timer) = self.timer.take() {
            host.remove_timer(timer);
        }
        debug!("'{}' animation stopped", self.current.kind.name());
        self.current.callbacks.fire_end();
    }

    /// Jump to the end of the path and complete in a single step.
    fn finish_without_timer<H: AnimationHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(path) = active_path_mut(&mut self.config, self.current.kind, self.reloading) {
            while path.advance() {}
        }
        self.elapsed = 1.0;
        self.step(FrameValues::TERMINAL);
        self.participants.reset();
        self.stop(host);
    }

    fn step(&self, values: FrameValues) {
        if !self.current.callbacks.fire_step(&values) {
            warn!(
                "'{}' transition has no step hook installed",
                self.current.kind.name()
            );
        }
    }

    fn schedule_frames<H: AnimationHost + ?Sized>(&self, host: &mut H) {
        for output in self.participants.iter() {
            host.schedule_frame(output);
        }
    }

    /// Recompute `elapsed` for the current phase, carrying whole phases over
    /// into the start time. Returns `true` once the path is exhausted.
    fn advance_time(&mut self, now: Instant) -> bool {
        let Some(mut start) = self.start else {
            self.elapsed = 1.0;
            return true;
        };
        let Some(path) = active_path_mut(&mut self.config, self.current.kind, self.reloading) else {
            self.elapsed = 1.0;
            return true;
        };
        loop {
            let Some(phase) = path.current() else {
                self.elapsed = 1.0;
                return true;
            };
            let since_ms = now.saturating_duration_since(start).as_millis() as f64;
            self.elapsed = since_ms / f64::from(phase.duration_ms());
            if self.elapsed <= 1.0 {
                return false;
            }
            let duration = phase.duration();
            if !path.advance() {
                self.elapsed = 1.0;
                return true;
            }
            start += duration;
            self.start = Some(start);
            debug!("advanced to phase {} of {}", path.cursor() + 1, path.len());
        }
    }

    // ---------- Queries ----------

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the most recently begun transition animates at all.
    pub fn is_enabled(&self) -> bool {
        active_path(&self.config, self.current.kind, self.reloading).is_some()
    }

    /// Whether `output` is still being driven by the current animation.
    pub fn is_animating(&self, output: OutputId) -> bool {
        self.decision != Decision::No && self.participants.contains(output)
    }

    /// Interpolation parameters for the current frame; terminal when idle.
    pub fn values(&self) -> FrameValues {
        if !self.running {
            return FrameValues::TERMINAL;
        }
        active_path(&self.config, self.current.kind, self.reloading)
            .and_then(AnimationPath::current)
            .map(|phase| phase.values(self.elapsed))
            .unwrap_or(FrameValues::TERMINAL)
    }

    /// Normalized progress through the current phase.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn set_animation_enabled_hint(&mut self, enable: bool) {
        self.decision = self.decision.ratchet(enable);
    }

    // ---------- Participants ----------

    pub fn add_output(&mut self, output: OutputId) {
        self.participants.add(output);
    }

    pub fn reset_outputs(&mut self) {
        self.participants.reset();
    }

    /// Replace the participants with every output the host has enabled.
    pub fn add_all_outputs<H: AnimationHost + ?Sized>(&mut self, host: &H) {
        self.participants.reset();
        for output in host.enabled_outputs() {
            self.participants.add(output);
        }
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    /// Shared handle the step hook can consult to see which outputs are in
    /// scope for the frame being stepped.
    pub fn output_scope(&self) -> OutputScope {
        self.scope.clone()
    }

    // ---------- Configuration ----------

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Swap configuration. A running animation is stopped first because its
    /// path belongs to the outgoing configuration.
    pub fn set_config<H: AnimationHost + ?Sized>(&mut self, config: AnimationConfig, host: &mut H) {
        self.stop(host);
        self.config = config;
    }

    pub fn style(&self) -> AnimationStyle {
        self.config.style
    }

    /// While set, every transition applies instantly.
    pub fn set_reloading(&mut self, reloading: bool) {
        self.reloading = reloading;
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;
    use crate::phase::AnimationCurve;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording(log: &Log) -> Callbacks {
        let (b, s, e) = (log.clone(), log.clone(), log.clone());
        Callbacks::new()
            .on_begin(move || b.borrow_mut().push("begin".into()))
            .on_step(move |v| s.borrow_mut().push(format!("step {:.2}", v.t)))
            .on_end(move || e.borrow_mut().push("end".into()))
    }

    fn linear_config(ms: u32) -> AnimationConfig {
        let mut config = AnimationConfig::default();
        config.set_path(
            TransitionKind::Default,
            AnimationPath::with_phases(vec![AnimationCurve::linear(ms).unwrap()]),
        );
        config
    }

    #[test]
    fn ratchet_transitions() {
        use Decision::*;
        assert_eq!(Unknown.ratchet(true), Yes);
        assert_eq!(Unknown.ratchet(false), No);
        assert_eq!(No.ratchet(true), Yes);
        assert_eq!(No.ratchet(false), No);
        assert_eq!(Yes.ratchet(false), Yes);
        assert_eq!(Yes.ratchet(true), Yes);
    }

    #[test]
    fn idle_engine_reports_terminal_values() {
        let engine = AnimationEngine::default();
        assert!(!engine.is_running());
        assert_eq!(engine.values(), FrameValues::TERMINAL);
        assert_eq!(engine.pending_kind(), TransitionKind::Default);
    }

    #[test]
    fn begin_requests_frames_and_arms_timer() {
        let log: Log = Rc::default();
        let mut host = ManualHost::with_outputs([OutputId(1), OutputId(2)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_all_outputs(&host);
        engine.set_callbacks(recording(&log));
        engine.begin(&mut host);

        assert!(engine.is_running());
        assert!(engine.is_enabled());
        assert_eq!(host.frame_requests(), &[OutputId(1), OutputId(2)]);
        assert_eq!(host.armed_timer().map(|(_, d)| d.as_millis()), Some(16));
        assert_eq!(*log.borrow(), vec!["begin"]);
    }

    #[test]
    fn pending_resets_to_defaults_after_begin() {
        let mut host = ManualHost::new();
        let mut engine = AnimationEngine::default();
        let defaults = Callbacks::new().on_step(|_| {});
        engine.set_default_callbacks(defaults);
        engine.set_type(TransitionKind::Jump);
        engine.set_callbacks(Callbacks::new().on_begin(|| {}).on_step(|_| {}));
        engine.begin(&mut host);

        assert_eq!(engine.current_kind(), TransitionKind::Jump);
        assert_eq!(engine.pending_kind(), TransitionKind::Default);
        assert!(engine.pending_callbacks().begin.is_none());
        assert!(engine.pending_callbacks().step.is_some());
    }

    #[test]
    fn animate_while_idle_is_ignored() {
        let log: Log = Rc::default();
        let mut host = ManualHost::new();
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.set_callbacks(recording(&log));
        engine.add_output(OutputId(1));
        engine.animate(OutputId(1), &mut host);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn decision_no_stops_on_next_frame() {
        let log: Log = Rc::default();
        let mut host = ManualHost::with_outputs([OutputId(1)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_all_outputs(&host);
        engine.set_callbacks(recording(&log));
        engine.begin(&mut host);
        engine.set_animation_enabled_hint(false);
        assert!(!engine.is_animating(OutputId(1)));

        host.advance_ms(10);
        engine.animate(OutputId(1), &mut host);
        assert!(!engine.is_running());
        assert_eq!(*log.borrow(), vec!["begin", "step 0.10", "end"]);
        assert_eq!(host.timer_count(), 0);
    }

    #[test]
    fn decision_resets_on_begin() {
        let mut host = ManualHost::new();
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.set_callbacks(Callbacks::new().on_step(|_| {}));
        engine.set_animation_enabled_hint(true);
        engine.begin(&mut host);
        assert_eq!(engine.decision(), Decision::Unknown);
    }

    #[test]
    fn timer_with_no_participants_stops() {
        let log: Log = Rc::default();
        let mut host = ManualHost::new();
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.set_callbacks(recording(&log));
        engine.begin(&mut host);
        assert!(engine.is_running());
        assert!(host.fire_timer(&mut engine));
        assert!(!engine.is_running());
        assert_eq!(*log.borrow(), vec!["begin", "end"]);
    }

    #[test]
    fn reloading_makes_transitions_instant() {
        let log: Log = Rc::default();
        let mut host = ManualHost::with_outputs([OutputId(1)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_all_outputs(&host);
        engine.set_reloading(true);
        engine.set_callbacks(recording(&log));
        engine.begin(&mut host);
        assert!(!engine.is_running());
        assert!(!engine.is_enabled());
        assert_eq!(*log.borrow(), vec!["step 1.00"]);
        assert!(host.frame_requests().is_empty());
    }

    #[test]
    fn set_config_stops_the_running_animation() {
        let log: Log = Rc::default();
        let mut host = ManualHost::with_outputs([OutputId(1)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_all_outputs(&host);
        engine.set_callbacks(recording(&log));
        engine.begin(&mut host);

        let mut replacement = AnimationConfig::default();
        replacement.style = AnimationStyle::Clip;
        engine.set_config(replacement, &mut host);
        assert!(!engine.is_running());
        assert_eq!(engine.style(), AnimationStyle::Clip);
        assert_eq!(*log.borrow(), vec!["begin", "end"]);
    }

    #[test]
    fn step_sees_participants_only_in_scope() {
        let mut host = ManualHost::with_outputs([OutputId(1), OutputId(2)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_output(OutputId(2));

        let scope = engine.output_scope();
        let seen: Rc<RefCell<Vec<(bool, bool)>>> = Rc::default();
        let s = seen.clone();
        let view = scope.clone();
        engine.set_callbacks(Callbacks::new().on_step(move |_| {
            s.borrow_mut()
                .push((view.allows(OutputId(1)), view.allows(OutputId(2))));
        }));
        engine.begin(&mut host);
        host.advance_ms(20);
        engine.animate(OutputId(2), &mut host);

        assert_eq!(*seen.borrow(), vec![(false, true)]);
        assert!(!scope.is_narrowed());
    }

    #[test]
    fn step_scope_spans_every_participant() {
        let mut host = ManualHost::with_outputs([OutputId(1), OutputId(2), OutputId(3)]);
        let mut engine = AnimationEngine::new(linear_config(100));
        engine.add_output(OutputId(1));
        engine.add_output(OutputId(2));

        let view = engine.output_scope();
        let seen: Rc<RefCell<Vec<Option<Vec<OutputId>>>>> = Rc::default();
        let s = seen.clone();
        engine.set_callbacks(Callbacks::new().on_step(move |_| s.borrow_mut().push(view.visible())));
        engine.begin(&mut host);
        host.advance_ms(20);
        engine.animate(OutputId(2), &mut host);

        assert_eq!(
            *seen.borrow(),
            vec![Some(vec![OutputId(1), OutputId(2)])]
        );
    }
}
