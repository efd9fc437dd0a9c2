//! Deadlines for storage calls.
//!
//! Every repository call runs under a [`QueryContext`]. The effective
//! deadline is the earlier of the caller's deadline (if any) and
//! `now + query_timeout` of the repository, so no query can hang forever.

use std::{future::Future, time::Duration};

use tokio::time::Instant;

use crate::{EngineError, ResultEngine};

/// Default bound applied to each query when the caller gives none.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Caller side execution context of a storage call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryContext {
    deadline: Option<Instant>,
}

impl QueryContext {
    /// No caller deadline: only the repository bound applies.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn effective_deadline(&self, bound: Duration) -> Instant {
        let bounded = Instant::now() + bound;
        match self.deadline {
            Some(deadline) if deadline < bounded => deadline,
            _ => bounded,
        }
    }

    /// Run `query` until the effective deadline, failing with
    /// [`EngineError::Timeout`] when it is exceeded.
    ///
    /// A deadline that already passed fails without polling `query`.
    pub(crate) async fn run<T, F>(&self, bound: Duration, label: &str, query: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        let deadline = self.effective_deadline(bound);
        if deadline <= Instant::now() {
            return Err(EngineError::Timeout(format!("{label}: deadline exceeded")));
        }

        match tokio::time::timeout_at(deadline, query).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{label}: query timed out");
                Err(EngineError::Timeout(format!("{label}: query timed out")))
            }
        }
    }
}
