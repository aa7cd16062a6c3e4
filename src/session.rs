//! Session state for a running front-end.
//!
//! State flows one way: the view dispatches [`Event`]s, [`Session::apply`]
//! is the single place state changes, and the view re-reads the fields it
//! renders. Async call results enter as events too, so there is no second
//! code path mutating status behind the reducer's back.

use std::fmt;

use tracing::warn;

use crate::client::WarmupReport;
use crate::types::Annotations;
use crate::{NerviewError, telemetry};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing has been asked of the endpoint yet.
    #[default]
    Idle,
    /// A warm-up call is in flight.
    WarmingUp,
    /// The model answered; inference calls can be expected to be fast.
    Ready,
    /// The warm-up call failed. Distinct from [`Status::Ready`]: a failed
    /// warm-up never shows as ready.
    WarmupFailed(String),
    /// An inference call is in flight.
    Predicting,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::WarmingUp => {
                write!(f, "loading model into memory, this can take around 30 seconds")
            }
            Status::Ready => write!(f, "model is ready"),
            Status::WarmupFailed(reason) => write!(f, "model warm-up failed: {reason}"),
            Status::Predicting => write!(f, "model is performing inference"),
        }
    }
}

/// Everything that can happen to a session.
#[derive(Debug)]
pub enum Event {
    /// A warm-up call was started.
    WarmupStarted,
    /// The warm-up call finished, one way or the other.
    WarmupFinished(Result<WarmupReport, NerviewError>),
    /// An inference call was started.
    PredictStarted,
    /// The inference call finished, one way or the other.
    PredictFinished(Result<Annotations, NerviewError>),
}

/// Side effect the view must carry out after applying an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a user-facing alert.
    Alert(String),
}

/// Session state: status line, busy flag, and the last annotations.
#[derive(Debug, Default)]
pub struct Session {
    status: Status,
    busy: bool,
    output: Option<Annotations>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether a call is in flight. Views disable their submit controls
    /// while this is set.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// The most recent successful annotations, if any.
    pub fn output(&self) -> Option<&Annotations> {
        self.output.as_ref()
    }

    /// Apply one event. This is the only place session state changes.
    ///
    /// Start events arriving while a call is already in flight are
    /// dropped; the busy flag is the same gate a disabled submit button
    /// provides. A failed prediction keeps the previous annotations and
    /// produces exactly one [`Effect::Alert`].
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::WarmupStarted | Event::PredictStarted if self.busy => {
                warn!("a call is already in flight, ignoring start event");
                None
            }
            Event::WarmupStarted => {
                self.busy = true;
                self.status = Status::WarmingUp;
                None
            }
            Event::PredictStarted => {
                self.busy = true;
                self.status = Status::Predicting;
                None
            }
            Event::WarmupFinished(Ok(_)) => {
                self.busy = false;
                self.status = Status::Ready;
                None
            }
            Event::WarmupFinished(Err(e)) => {
                self.busy = false;
                self.status = Status::WarmupFailed(e.to_string());
                None
            }
            Event::PredictFinished(Ok(annotations)) => {
                self.busy = false;
                self.status = Status::Ready;
                self.output = Some(annotations);
                None
            }
            Event::PredictFinished(Err(e)) => {
                // Previous output stays on screen; only the alert reports
                // the failure.
                self.busy = false;
                self.status = Status::Ready;
                metrics::counter!(telemetry::ALERTS_TOTAL).increment(1);
                Some(Effect::Alert(format!(
                    "prediction failed: {e}. please try again"
                )))
            }
        }
    }
}
