//! Stage state machine for one generation stream.

use crate::models::progress::{ProgressEvent, Stage};

/// Result of applying an event to [`ProgressState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Non-terminal event recorded.
    Progressed,
    /// First terminal event recorded; the stream is finished.
    Finished,
    /// Arrived after a terminal event and was dropped.
    Ignored,
}

/// Latest observable state of a generation stream.
///
/// Progress values are recorded as received, even when they go backwards.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    latest: Option<ProgressEvent>,
    finished: bool,
    received: usize,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &ProgressEvent) -> Transition {
        if self.finished {
            return Transition::Ignored;
        }
        self.received += 1;
        self.latest = Some(event.clone());
        if event.stage.is_terminal() {
            self.finished = true;
            Transition::Finished
        } else {
            Transition::Progressed
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        self.latest.as_ref().map(|e| e.stage)
    }

    pub fn progress(&self) -> f64 {
        self.latest.as_ref().map(|e| e.progress).unwrap_or(0.0)
    }

    pub fn message(&self) -> Option<&str> {
        self.latest.as_ref().map(|e| e.message.as_str())
    }

    pub fn latest(&self) -> Option<&ProgressEvent> {
        self.latest.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Events accepted so far (ignored ones excluded).
    pub fn received(&self) -> usize {
        self.received
    }
}
