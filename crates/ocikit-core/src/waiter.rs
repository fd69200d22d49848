//! Poll-until-state waiter.
//!
//! After a mutation is accepted, the resource (or its work request) is fetched
//! repeatedly until its state is one of the targets. Sleeps start at
//! `initial_interval` and double up to `max_interval`; the whole wait is
//! bounded by `max_wait`.

use std::future::Future;
use std::time::Duration;

use ocikit_api::ApiResponse;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::error::WaitError;

// ── Capability ───────────────────────────────────────────────────────

/// A resource with an observable lifecycle or status.
pub trait Waitable {
    /// Current state in wire form (e.g. `IN_PROGRESS`).
    fn state(&self) -> &str;

    /// States the resource never leaves once reached.
    fn terminal_states(&self) -> &'static [&'static str] {
        &[]
    }
}

impl<T: Waitable> Waitable for ApiResponse<T> {
    fn state(&self) -> &str {
        self.data.state()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        self.data.terminal_states()
    }
}

// ── Configuration ────────────────────────────────────────────────────

/// Timing of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterConfig {
    /// First sleep between polls.
    pub initial_interval: Duration,
    /// Upper bound for the doubling sleep.
    pub max_interval: Duration,
    /// Total time budget. Zero polls exactly once.
    pub max_wait: Duration,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            max_wait: Duration::from_secs(1200),
        }
    }
}

impl WaiterConfig {
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    pub fn with_initial_interval(mut self, initial_interval: Duration) -> Self {
        self.initial_interval = initial_interval;
        self
    }
}

// ── Waiter ───────────────────────────────────────────────────────────

/// How a successful wait ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome<T> {
    /// The last fetched representation, whose state is a target.
    Reached(T),
    /// The resource is gone and the wait was told to accept that.
    NotFound,
}

impl<T> WaitOutcome<T> {
    pub fn reached(self) -> Option<T> {
        match self {
            Self::Reached(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// The reached value; `NotFound` becomes [`WaitError::Gone`].
    pub fn into_reached(self, resource: &str) -> Result<T, WaitError> {
        match self {
            Self::Reached(value) => Ok(value),
            Self::NotFound => Err(WaitError::Gone {
                resource: resource.to_owned(),
            }),
        }
    }
}

/// Target states plus timing for one wait.
#[derive(Debug, Clone)]
pub struct Waiter {
    config: WaiterConfig,
    targets: Vec<String>,
    succeed_on_not_found: bool,
}

impl Waiter {
    pub fn new<S: AsRef<str>>(config: WaiterConfig, targets: &[S]) -> Self {
        Self {
            config,
            targets: targets.iter().map(|s| s.as_ref().to_owned()).collect(),
            succeed_on_not_found: false,
        }
    }

    /// Treat a 404 from the fetch as success. Only meaningful for deletes.
    pub fn succeed_on_not_found(mut self, enabled: bool) -> Self {
        self.succeed_on_not_found = enabled;
        self
    }

    pub fn config(&self) -> &WaiterConfig {
        &self.config
    }

    fn is_target(&self, state: &str) -> bool {
        self.targets.iter().any(|t| t.eq_ignore_ascii_case(state))
    }

    /// Poll `fetch` until the returned state is a target.
    pub async fn wait<T, F, Fut>(
        &self,
        resource: &str,
        mut fetch: F,
    ) -> Result<WaitOutcome<T>, WaitError>
    where
        T: Waitable,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ocikit_api::Error>>,
    {
        if self.targets.is_empty() {
            return Err(WaitError::NoTargetStates {
                resource: resource.to_owned(),
            });
        }

        let started = Instant::now();
        let mut interval = self.config.initial_interval.min(self.config.max_interval);
        let mut last_state: Option<String> = None;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match fetch().await {
                Ok(current) => {
                    let state = current.state();
                    debug!(resource, attempt, state, "polled");
                    if self.is_target(state) {
                        return Ok(WaitOutcome::Reached(current));
                    }
                    if current
                        .terminal_states()
                        .iter()
                        .any(|t| t.eq_ignore_ascii_case(state))
                    {
                        return Err(WaitError::TerminalState {
                            resource: resource.to_owned(),
                            state: state.to_owned(),
                        });
                    }
                    last_state = Some(state.to_owned());
                }
                Err(e) if self.succeed_on_not_found && e.is_not_found() => {
                    debug!(resource, attempt, "polled: not found");
                    return Ok(WaitOutcome::NotFound);
                }
                Err(source) => {
                    return Err(WaitError::Poll {
                        resource: resource.to_owned(),
                        source,
                    });
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= self.config.max_wait {
                return Err(WaitError::TimedOut {
                    resource: resource.to_owned(),
                    elapsed,
                    last_state,
                });
            }
            sleep(interval.min(self.config.max_wait - elapsed)).await;
            interval = interval.saturating_mul(2).min(self.config.max_interval);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Probe(&'static str);

    impl Waitable for Probe {
        fn state(&self) -> &str {
            self.0
        }

        fn terminal_states(&self) -> &'static [&'static str] {
            &["FAILED"]
        }
    }

    fn not_found() -> ocikit_api::Error {
        ocikit_api::Error::Service {
            status: 404,
            code: Some("NotAuthorizedOrNotFound".into()),
            message: "gone".into(),
            opc_request_id: None,
            retry_after: None,
        }
    }

    /// Returns each state in turn, then repeats the last one.
    fn sequence(
        states: &'static [&'static str],
        calls: Arc<AtomicU32>,
    ) -> impl FnMut() -> std::future::Ready<Result<Probe, ocikit_api::Error>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as usize;
            let state = states[n.min(states.len() - 1)];
            std::future::ready(Ok(Probe(state)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_matching_state() {
        let calls = Arc::new(AtomicU32::new(0));
        let waiter = Waiter::new(WaiterConfig::default(), &["active"]);

        let outcome = waiter
            .wait("stack", sequence(&["CREATING", "CREATING", "ACTIVE", "DELETED"], calls.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Reached(Probe("ACTIVE")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_double_up_to_the_cap() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = WaiterConfig::default().with_max_interval(Duration::from_secs(4));
        let waiter = Waiter::new(config, &["ACTIVE"]);
        let started = Instant::now();

        waiter
            .wait(
                "stack",
                sequence(&["A", "A", "A", "A", "A", "ACTIVE"], calls.clone()),
            )
            .await
            .unwrap();

        // 1 + 2 + 4 + 4 + 4
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn never_matching_times_out() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = WaiterConfig::default().with_max_wait(Duration::from_secs(60));
        let waiter = Waiter::new(config, &["SUCCEEDED"]);

        let err = waiter
            .wait("work request wr-1", sequence(&["IN_PROGRESS"], calls.clone()))
            .await
            .unwrap_err();

        match err {
            WaitError::TimedOut {
                elapsed,
                last_state,
                ..
            } => {
                assert_eq!(elapsed, Duration::from_secs(60));
                assert_eq!(last_state.as_deref(), Some("IN_PROGRESS"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_max_wait_polls_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = WaiterConfig::default().with_max_wait(Duration::ZERO);
        let waiter = Waiter::new(config, &["ACTIVE"]);

        let err = waiter
            .wait("stack", sequence(&["CREATING"], calls.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, WaitError::TimedOut { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_state_outside_targets_fails() {
        let calls = Arc::new(AtomicU32::new(0));
        let waiter = Waiter::new(WaiterConfig::default(), &["SUCCEEDED"]);

        let err = waiter
            .wait("job", sequence(&["IN_PROGRESS", "FAILED"], calls.clone()))
            .await
            .unwrap_err();

        assert_eq!(err.state(), Some("FAILED"));
        assert!(matches!(err, WaitError::TerminalState { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_state_in_targets_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let waiter = Waiter::new(WaiterConfig::default(), &["SUCCEEDED", "FAILED"]);

        let outcome = waiter
            .wait("job", sequence(&["FAILED"], calls))
            .await
            .unwrap();
        assert_eq!(outcome.reached(), Some(Probe("FAILED")));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_needs_the_flag() {
        let waiter = Waiter::new(WaiterConfig::default(), &["DELETED"]);
        let err = waiter
            .wait("stack", || async { Err::<Probe, _>(not_found()) })
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::Poll { .. }));

        let outcome = waiter
            .succeed_on_not_found(true)
            .wait("stack", || async { Err::<Probe, _>(not_found()) })
            .await
            .unwrap();
        assert_eq!(outcome, WaitOutcome::NotFound);
    }

    #[tokio::test]
    async fn empty_targets_rejected() {
        let waiter = Waiter::new::<&str>(WaiterConfig::default(), &[]);
        let err = waiter
            .wait("stack", || async { Ok(Probe("ACTIVE")) })
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::NoTargetStates { .. }));
    }
}
