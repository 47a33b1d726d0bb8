//! Rendering-side grouping of same-named lines.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::identifiers::LineIdentifier;

/// Shared handle to a line group.
pub type SharedLineGroup = Arc<Mutex<LineGroup>>;

/// Lock a shared line group, ignoring poisoning.
pub(crate) fn locked(group: &SharedLineGroup) -> MutexGuard<'_, LineGroup> {
    group.lock().unwrap_or_else(PoisonError::into_inner)
}

/// All lines drawn under one name share a group.
///
/// The group carries the stroke-color deviation applied by the layout
/// distortion; routing passes the value through without interpreting it.
#[derive(Debug, Default)]
pub struct LineGroup {
    stroke_color: f64,
    lines: HashSet<LineIdentifier>,
}

impl LineGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedLineGroup {
        Arc::new(Mutex::new(self))
    }

    pub fn add_line(&mut self, name: LineIdentifier) {
        self.lines.insert(name);
    }

    pub fn remove_line(&mut self, name: &LineIdentifier) {
        self.lines.remove(name);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn stroke_color(&self) -> f64 {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, deviation: f64) {
        self.stroke_color = deviation;
    }
}
