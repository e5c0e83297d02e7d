//! Submission session: the state a diagnosis form goes through.
//!
//! ```text
//!            Submitted               Resolved(result)
//!   Idle ───────────────▶ Pending ─────────────────▶ Success(result)
//!   Success ─┘              │  │      Errored
//!   Failed ──┘              │  └─────────────────▶ Failed(message)
//!                           │ Cancelled
//!                           └─────────────────▶ Idle
//! ```
//!
//! Only one submission may be pending at a time. What happens to a second
//! submission while one is in flight is decided by [`OverlapPolicy`]. The
//! session keeps only the outcome of the latest submission; every new
//! submission replaces the previous result or error wholesale.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::{
    DiagnosisError, DiagnosisRequest, DiagnosisResult, Result, GENERIC_FAILURE_MESSAGE,
};
use crate::obs;
use crate::resolver::DiagnosisResolver;

/// Observable state of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Pending,
    Success(DiagnosisResult),
    /// Carries the user-facing failure message.
    Failed(String),
}

/// Inputs to [`SessionState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Submitted,
    Resolved(DiagnosisResult),
    Errored,
    Cancelled,
}

impl SessionState {
    /// Single transition function of the session state machine.
    ///
    /// - `Submitted` is refused while `Pending`.
    /// - `Resolved` and `Errored` are only accepted while `Pending`.
    /// - `Cancelled` moves `Pending` back to `Idle` and leaves other states alone.
    pub fn apply(self, event: SessionEvent) -> Result<SessionState> {
        match (self, event) {
            (SessionState::Pending, SessionEvent::Submitted) => {
                Err(DiagnosisError::SubmissionInFlight)
            }
            (_, SessionEvent::Submitted) => Ok(SessionState::Pending),
            (SessionState::Pending, SessionEvent::Resolved(result)) => {
                Ok(SessionState::Success(result))
            }
            (SessionState::Pending, SessionEvent::Errored) => {
                Ok(SessionState::Failed(GENERIC_FAILURE_MESSAGE.to_string()))
            }
            (_, SessionEvent::Resolved(_)) | (_, SessionEvent::Errored) => {
                Err(DiagnosisError::Superseded)
            }
            (SessionState::Pending, SessionEvent::Cancelled) => Ok(SessionState::Idle),
            (state, SessionEvent::Cancelled) => Ok(state),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    pub fn result(&self) -> Option<&DiagnosisResult> {
        match self {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What to do with a submission that arrives while another is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Refuse the new submission with [`DiagnosisError::SubmissionInFlight`].
    #[default]
    Reject,
    /// Cancel the pending submission; its late outcome is discarded with
    /// [`DiagnosisError::Superseded`].
    Supersede,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    /// Incremented on every accepted submission.
    generation: u64,
}

/// Drives submissions through a resolver and holds the latest outcome.
pub struct DiagnosisSession {
    resolver: Arc<dyn DiagnosisResolver>,
    policy: OverlapPolicy,
    inner: Mutex<SessionInner>,
}

impl DiagnosisSession {
    pub fn new(resolver: Arc<dyn DiagnosisResolver>) -> Self {
        Self::with_policy(resolver, OverlapPolicy::default())
    }

    pub fn with_policy(resolver: Arc<dyn DiagnosisResolver>, policy: OverlapPolicy) -> Self {
        Self {
            resolver,
            policy,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                generation: 0,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_pending()
    }

    /// Submit a request and wait for its outcome.
    ///
    /// Returns the state the session settled in (`Success` or `Failed`).
    /// Resolver failures are not returned as errors: they land in
    /// `Failed(GENERIC_FAILURE_MESSAGE)` and the cause is logged. `Err` is
    /// reserved for the overlap guard (`SubmissionInFlight`, `Superseded`).
    ///
    /// Dropping the returned future before it completes cancels the
    /// submission: the session goes back to `Idle`.
    pub async fn submit(&self, request: DiagnosisRequest) -> Result<SessionState> {
        let generation = self.begin()?;
        let mut pending = PendingGuard::new(self, generation);

        let submission_id = Uuid::new_v4().to_string();
        let strategy = self.resolver.name();
        obs::emit_submitted(&submission_id, strategy, request.symptoms.len());

        let started = Instant::now();
        let outcome = self
            .resolver
            .resolve(&request)
            .instrument(obs::submission_span(&submission_id, strategy))
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        // Disarm before locking: the guard's drop takes the same lock.
        pending.disarm();
        let mut inner = self.lock();
        if inner.generation != generation {
            obs::emit_rejected("superseded");
            return Err(DiagnosisError::Superseded);
        }

        let event = match outcome {
            Ok(result) => {
                obs::emit_resolved(
                    &submission_id,
                    &result.issue_title,
                    result.severity_score,
                    duration_ms,
                );
                SessionEvent::Resolved(result)
            }
            Err(err) => {
                obs::emit_failed(&submission_id, &err, duration_ms);
                SessionEvent::Errored
            }
        };

        inner.state = inner.state.clone().apply(event)?;
        Ok(inner.state.clone())
    }

    /// Move into `Pending`, applying the overlap policy. Returns the new generation.
    fn begin(&self) -> Result<u64> {
        let mut inner = self.lock();

        if inner.state.is_pending() && self.policy == OverlapPolicy::Supersede {
            obs::emit_rejected("cancelled by newer submission");
            inner.state = inner.state.clone().apply(SessionEvent::Cancelled)?;
        }

        inner.state = match inner.state.clone().apply(SessionEvent::Submitted) {
            Ok(state) => state,
            Err(err) => {
                obs::emit_rejected("submission already in flight");
                return Err(err);
            }
        };
        inner.generation += 1;
        Ok(inner.generation)
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cancels a submission whose future is dropped while still `Pending`.
struct PendingGuard<'a> {
    session: &'a DiagnosisSession,
    generation: u64,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(session: &'a DiagnosisSession, generation: u64) -> Self {
        Self {
            session,
            generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.session.lock();
        // A newer submission owns the state now.
        if inner.generation != self.generation || !inner.state.is_pending() {
            return;
        }
        obs::emit_rejected("submission dropped before completion");
        if let Ok(state) = inner.state.clone().apply(SessionEvent::Cancelled) {
            inner.state = state;
        }
    }
}
