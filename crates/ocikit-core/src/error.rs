// ── Waiter and composite-operation errors ──
//
// A composite operation fails in one of two ways: the mutation itself was
// rejected (nothing changed), or the mutation went through and confirming the
// target state did not. The second case hands back the mutation's response so
// callers still learn the ids it produced.

use std::time::Duration;

use thiserror::Error;

/// Why a poll-until-state wait ended without reaching a target state.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {}s waiting for {resource} (last state: {})",
        .elapsed.as_secs(), .last_state.as_deref().unwrap_or("none"))]
    TimedOut {
        resource: String,
        elapsed: Duration,
        last_state: Option<String>,
    },

    /// The resource settled in a state it will never leave.
    #[error("{resource} reached terminal state {state}")]
    TerminalState { resource: String, state: String },

    #[error("failed to poll {resource}: {source}")]
    Poll {
        resource: String,
        #[source]
        source: ocikit_api::Error,
    },

    /// The resource disappeared while a state was expected.
    #[error("{resource} no longer exists")]
    Gone { resource: String },

    #[error("{operation}: no work request id to wait on")]
    MissingWorkRequestId { operation: &'static str },

    #[error("no target states given for {resource}")]
    NoTargetStates { resource: String },
}

impl WaitError {
    /// Last observed state, where one is known.
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::TimedOut { last_state, .. } => last_state.as_deref(),
            Self::TerminalState { state, .. } => Some(state),
            _ => None,
        }
    }
}

/// Failure of a mutate-then-wait operation.
///
/// `T` is the response of the mutation that was submitted.
#[derive(Debug, Error)]
pub enum CompositeError<T> {
    /// The mutation itself failed; nothing was changed.
    #[error(transparent)]
    Operation(#[from] ocikit_api::Error),

    /// The mutation was accepted, but waiting for the target state failed.
    #[error("operation accepted but not confirmed: {source}")]
    Wait {
        partial: T,
        #[source]
        source: WaitError,
    },
}

impl<T> CompositeError<T> {
    /// The mutation's response, when the mutation went through.
    pub fn partial(&self) -> Option<&T> {
        match self {
            Self::Operation(_) => None,
            Self::Wait { partial, .. } => Some(partial),
        }
    }

    pub fn into_partial(self) -> Option<T> {
        match self {
            Self::Operation(_) => None,
            Self::Wait { partial, .. } => Some(partial),
        }
    }
}
