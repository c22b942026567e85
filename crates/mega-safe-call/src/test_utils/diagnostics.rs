use crate::{Diagnostics, SafeCallEvent};

/// A diagnostics sink that records every delivered event.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    events: Vec<SafeCallEvent>,
}

impl RecordingDiagnostics {
    /// Returns the events delivered so far.
    pub fn events(&self) -> &[SafeCallEvent] {
        &self.events
    }

    /// Takes the events delivered so far, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<SafeCallEvent> {
        core::mem::take(&mut self.events)
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&mut self, event: SafeCallEvent) {
        self.events.push(event);
    }
}
