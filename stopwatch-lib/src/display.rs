//! Display sinks the stopwatch renders into.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// An externally owned text output, e.g. a label in a UI.
///
/// The stopwatch only ever writes to a sink; creating, placing and tearing
/// it down is the host's job.
pub trait DisplaySink {
    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);

    /// Whether the sink can still be written to.
    ///
    /// Returning `false` makes the stopwatch skip writes instead of touching
    /// a sink the host has already torn down.
    fn is_attached(&self) -> bool {
        true
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn set_text(&mut self, text: &str) {
        (**self).set_text(text)
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
}

/// A text cell shared between the host (reader) and the stopwatch (writer).
#[derive(Debug, Clone, Default)]
pub struct SharedText {
    text: Arc<Mutex<String>>,
    detached: Arc<AtomicBool>,
}

impl SharedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    pub fn text(&self) -> String {
        match self.text.lock() {
            Ok(text) => text.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mark the cell as torn down. Later writes are ignored.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

impl DisplaySink for SharedText {
    fn set_text(&mut self, text: &str) {
        if !self.is_attached() {
            return;
        }
        let mut guard = match self.text.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clear();
        guard.push_str(text);
    }

    fn is_attached(&self) -> bool {
        !self.detached.load(Ordering::SeqCst)
    }
}
