//! Begin/step/end hooks attached to a transition.
//!
//! Hooks are reference counted so the default triple can be cloned into the
//! pending slot on every `begin()`. Hooks run while the engine is mutably
//! borrowed by the host and must not call back into it.

use std::fmt;
use std::rc::Rc;

use crate::values::FrameValues;

pub type HookFn = dyn Fn();
pub type StepFn = dyn Fn(&FrameValues);

#[derive(Clone, Default)]
pub struct Callbacks {
    pub begin: Option<Rc<HookFn>>,
    pub step: Option<Rc<StepFn>>,
    pub end: Option<Rc<HookFn>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_begin(mut self, f: impl Fn() + 'static) -> Self {
        self.begin = Some(Rc::new(f));
        self
    }

    pub fn on_step(mut self, f: impl Fn(&FrameValues) + 'static) -> Self {
        self.step = Some(Rc::new(f));
        self
    }

    pub fn on_end(mut self, f: impl Fn() + 'static) -> Self {
        self.end = Some(Rc::new(f));
        self
    }

    pub(crate) fn fire_begin(&self) {
        if let Some(f) = &self.begin {
            f();
        }
    }

    /// Returns `false` when no step hook is installed.
    pub(crate) fn fire_step(&self, values: &FrameValues) -> bool {
        match &self.step {
            Some(f) => {
                f(values);
                true
            }
            None => false,
        }
    }

    pub(crate) fn fire_end(&self) {
        if let Some(f) = &self.end {
            f();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin.is_none() && self.step.is_none() && self.end.is_none()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("begin", &self.begin.is_some())
            .field("step", &self.step.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}
