//! Monitor state machine.

/// Lifecycle of a `monitor` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorState {
    #[default]
    Init,
    PreparingCompanionMod,
    Spawning,
    Running,
    /// Stopped on request.
    Stopped,
    /// A child died or a handler failed.
    Failed,
}

/// State machine for tracking monitor progress.
#[derive(Debug, Clone, Default)]
pub struct MonitorStateMachine {
    state: MonitorState,
    compilations: usize,
    failures: usize,
    sync_events: usize,
}

impl MonitorStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn transition(&mut self, new_state: MonitorState) {
        tracing::debug!(from = ?self.state, to = ?new_state, "State transition");
        self.state = new_state;
    }

    pub fn record_compilation(&mut self) {
        self.compilations = self.compilations.saturating_add(1);
    }

    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    pub fn record_sync(&mut self) {
        self.sync_events = self.sync_events.saturating_add(1);
    }

    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            compilations: self.compilations,
            failures: self.failures,
            sync_events: self.sync_events,
        }
    }
}

/// Counters for one monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    pub compilations: usize,
    pub failures: usize,
    pub sync_events: usize,
}
