//! At-most-one refresh coordination.
//!
//! Any number of callers can hit an expired access token at the same
//! time; exactly one of them performs the renewal while the rest wait
//! for its outcome. Waiters are released in registration order when the
//! operation settles, and only after the last one is released does the
//! coordinator accept a new operation.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use crate::tokens::TokenPair;

/// Outcome of a settled refresh, shared by every waiter.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The upstream issued a renewed token pair.
    Renewed(TokenPair),
    /// The refresh could not be completed; the session is over.
    Failed,
}

impl RefreshOutcome {
    /// Whether the refresh produced a renewed pair.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Renewed(_))
    }
}

/// Continuation registered while a refresh is in flight.
///
/// Runs synchronously during settlement, while the state lock is held;
/// it must not call back into the coordinator.
type Waiter = Box<dyn FnOnce(RefreshOutcome) + Send>;

enum RefreshState {
    Idle,
    InFlight { waiters: Vec<Waiter> },
}

/// Serializes token renewal for one session.
///
/// The state lock is a plain mutex: every critical section is a few
/// pointer moves and never awaits, so callers on any runtime thread can
/// take it without blocking the executor.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Run `attempt` unless a refresh is already in flight, in which
    /// case the call joins it and returns its outcome instead.
    ///
    /// `attempt` resolving to `Some(pair)` settles as
    /// [`RefreshOutcome::Renewed`]; `None` settles as
    /// [`RefreshOutcome::Failed`]. Either way every waiter registered
    /// during the flight observes the same outcome.
    pub async fn refresh<F, Fut>(&self, attempt: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<TokenPair>>,
    {
        let joined = {
            let mut state = self.lock_state();
            match &mut *state {
                RefreshState::InFlight { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(Box::new(move |outcome| {
                        let _ = tx.send(outcome);
                    }));
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::InFlight {
                        waiters: Vec::new(),
                    };
                    None
                }
            }
        };

        if let Some(rx) = joined {
            debug!("joining in-flight token refresh");
            return match rx.await {
                Ok(outcome) => outcome,
                // The sender only disappears unfired if the running
                // attempt was cancelled; that refresh did not happen.
                Err(_) => RefreshOutcome::Failed,
            };
        }

        let guard = SettleOnDrop {
            coordinator: self,
            armed: true,
        };

        let outcome = match attempt().await {
            Some(pair) => RefreshOutcome::Renewed(pair),
            None => RefreshOutcome::Failed,
        };

        guard.finish(outcome.clone());
        outcome
    }

    /// Wait for any in-flight refresh to settle.
    ///
    /// Returns immediately when the coordinator is idle. A caller
    /// released by a settling refresh sees the coordinator idle again
    /// (or already busy with a genuinely new operation).
    pub async fn wait_for_refresh(&self) {
        let rx = {
            let mut state = self.lock_state();
            match &mut *state {
                RefreshState::Idle => None,
                RefreshState::InFlight { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(Box::new(move |_outcome| {
                        let _ = tx.send(());
                    }));
                    Some(rx)
                }
            }
        };

        if let Some(rx) = rx {
            let _ = rx.await;
        }
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        matches!(&*self.lock_state(), RefreshState::InFlight { .. })
    }

    /// Release all waiters in registration order, then return to idle.
    ///
    /// Both steps happen under one hold of the state lock, so nothing
    /// can slip in between the last waiter and the idle transition.
    fn settle(&self, outcome: RefreshOutcome) {
        let mut state = self.lock_state();
        let waiters = match &mut *state {
            RefreshState::InFlight { waiters } => std::mem::take(waiters),
            // Only the running attempt settles, so this arm is unreachable;
            // tolerate it rather than panic while holding the lock.
            RefreshState::Idle => Vec::new(),
        };
        for waiter in waiters {
            waiter(outcome.clone());
        }
        *state = RefreshState::Idle;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        // A poisoned lock means a waiter panicked; the state itself is
        // still coherent, so keep going with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

/// Settles the coordinator as failed if the running attempt is dropped
/// before it completes, so waiters never hang on a cancelled request.
struct SettleOnDrop<'a> {
    coordinator: &'a RefreshCoordinator,
    armed: bool,
}

impl SettleOnDrop<'_> {
    fn finish(mut self, outcome: RefreshOutcome) {
        self.armed = false;
        self.coordinator.settle(outcome);
    }
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.settle(RefreshOutcome::Failed);
        }
    }
}
