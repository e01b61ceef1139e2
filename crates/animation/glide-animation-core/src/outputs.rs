#![allow(dead_code)]
//! Output identifiers, the participant set, and output-enumeration scoping.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Opaque handle for a display output owned by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId(pub u32);

/// Outputs still participating in the current animation, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Participants {
    set: IndexSet<OutputId>,
}

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent; returns `true` if `id` was newly added.
    #[inline]
    pub fn add(&mut self, id: OutputId) -> bool {
        self.set.insert(id)
    }

    /// Returns `true` if `id` was present.
    #[inline]
    pub fn remove(&mut self, id: OutputId) -> bool {
        self.set.shift_remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: OutputId) -> bool {
        self.set.contains(&id)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.set.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.set.iter().copied()
    }
}

impl FromIterator<OutputId> for Participants {
    fn from_iter<I: IntoIterator<Item = OutputId>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

/// Shared view of which outputs "exist" from the step hook's point of view.
///
/// While the engine runs the step hook it narrows the scope to the current
/// participant set, so layout code enumerating outputs inside the hook never
/// touches outputs outside the animation. `None` means unrestricted. Clones
/// share state.
#[derive(Clone, Debug, Default)]
pub struct OutputScope {
    inner: Rc<RefCell<Option<IndexSet<OutputId>>>>,
}

impl OutputScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is visible in the current scope.
    pub fn allows(&self, id: OutputId) -> bool {
        match &*self.inner.borrow() {
            Some(set) => set.contains(&id),
            None => true,
        }
    }

    pub fn is_narrowed(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Outputs visible in the current scope, or `None` when unrestricted.
    pub fn visible(&self) -> Option<Vec<OutputId>> {
        self.inner
            .borrow()
            .as_ref()
            .map(|set| set.iter().copied().collect())
    }

    /// Restrict the scope until the returned guard drops.
    #[must_use = "the scope is restored as soon as the guard drops"]
    pub fn narrow(&self, outputs: impl IntoIterator<Item = OutputId>) -> ScopeGuard {
        let next: IndexSet<OutputId> = outputs.into_iter().collect();
        let previous = self.inner.replace(Some(next));
        ScopeGuard {
            scope: self.clone(),
            previous: Some(previous),
        }
    }
}

/// Restores the previous [`OutputScope`] on drop.
#[derive(Debug)]
pub struct ScopeGuard {
    scope: OutputScope,
    previous: Option<Option<IndexSet<OutputId>>>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.scope.inner.replace(previous);
        }
    }
}
