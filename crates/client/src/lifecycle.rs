use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use input::InputKind;
use serde::Serialize;

/// Where the orchestrator is in its request lifecycle.
///
/// `Idle` only exists before the first submission. After that the state
/// moves between `InFlight` and one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::InFlight => "in_flight",
            RequestState::Succeeded => "succeeded",
            RequestState::Failed => "failed",
        }
    }

    pub fn is_in_flight(self) -> bool {
        self == RequestState::InFlight
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a submission ended, as reported to [`LoadingObserver::loading_finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// The submission future was dropped before the service answered.
    Cancelled,
}

/// Receives the loading-indicator signals of each submission.
///
/// `loading_started` fires synchronously inside `submit`, before the request
/// is sent. `loading_finished` fires exactly once per started submission,
/// after the response has been fully processed, even when the submission
/// future is dropped midway.
pub trait LoadingObserver: Send + Sync {
    fn loading_started(&self, kind: InputKind);
    fn loading_finished(&self, kind: InputKind, outcome: Outcome, elapsed: Duration);
}

/// Observer that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LoadingObserver for NoopObserver {
    fn loading_started(&self, _kind: InputKind) {}
    fn loading_finished(&self, _kind: InputKind, _outcome: Outcome, _elapsed: Duration) {}
}

/// Shared lifecycle state with the single-flight check.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    state: Mutex<RequestState>,
}

impl Lifecycle {
    pub(crate) fn current(&self) -> RequestState {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set(&self, next: RequestState) {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
    }

    /// Moves to `InFlight` and signals loading start, or returns `None`
    /// without touching anything when a request is already running.
    pub(crate) fn begin<'a>(
        &'a self,
        kind: InputKind,
        observer: &'a Arc<dyn LoadingObserver>,
    ) -> Option<InFlight<'a>> {
        {
            let mut guard = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if guard.is_in_flight() {
                return None;
            }
            *guard = RequestState::InFlight;
        }
        observer.loading_started(kind);
        Some(InFlight {
            lifecycle: self,
            observer,
            kind,
            start: Instant::now(),
            outcome: None,
        })
    }
}

/// Guard for one running submission. Settles the state and ends the loading
/// signal when dropped.
pub(crate) struct InFlight<'a> {
    lifecycle: &'a Lifecycle,
    observer: &'a Arc<dyn LoadingObserver>,
    kind: InputKind,
    start: Instant,
    outcome: Option<Outcome>,
}

impl InFlight<'_> {
    pub(crate) fn succeed(mut self) {
        self.outcome = Some(Outcome::Succeeded);
    }

    pub(crate) fn fail(mut self) {
        self.outcome = Some(Outcome::Failed);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.unwrap_or(Outcome::Cancelled);
        self.lifecycle.set(match outcome {
            Outcome::Succeeded => RequestState::Succeeded,
            Outcome::Failed | Outcome::Cancelled => RequestState::Failed,
        });
        self.observer
            .loading_finished(self.kind, outcome, self.start.elapsed());
    }
}
