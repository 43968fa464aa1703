//! Scripted request executors for pacer and runner tests.
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::{RequestExecutor, RequestFailure};

/// Always answers with the same status code.
pub(crate) struct StaticExecutor {
    status: u16,
    calls: AtomicU64,
}

impl StaticExecutor {
    pub(crate) const fn new(status: u16) -> Self {
        Self {
            status,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for StaticExecutor {
    async fn execute(&self) -> Result<u16, RequestFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.status)
    }
}

/// Fails every `every`-th call (1-based) as if the connection was refused.
pub(crate) struct FailEveryExecutor {
    every: u64,
    calls: AtomicU64,
}

impl FailEveryExecutor {
    pub(crate) const fn new(every: u64) -> Self {
        Self {
            every,
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RequestExecutor for FailEveryExecutor {
    async fn execute(&self) -> Result<u16, RequestFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        if call.checked_rem(self.every) == Some(0) {
            return Err(RequestFailure::new("connection refused"));
        }
        Ok(200)
    }
}

/// Never completes; models a hung outbound call.
pub(crate) struct HangingExecutor {
    calls: AtomicU64,
}

impl HangingExecutor {
    pub(crate) const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for HangingExecutor {
    async fn execute(&self) -> Result<u16, RequestFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Err(RequestFailure::new("unreachable"))
    }
}

/// Holds the `straggle_call`-th call (1-based) until [`release`] and answers
/// 200 otherwise, so one straggler can outlive later groups.
///
/// [`release`]: StragglerExecutor::release
pub(crate) struct StragglerExecutor {
    release: tokio::sync::Notify,
    straggle_call: u64,
    calls: AtomicU64,
}

impl StragglerExecutor {
    pub(crate) fn new(straggle_call: u64) -> Self {
        Self {
            release: tokio::sync::Notify::new(),
            straggle_call,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl RequestExecutor for StragglerExecutor {
    async fn execute(&self) -> Result<u16, RequestFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        if call == self.straggle_call {
            self.release.notified().await;
        }
        Ok(200)
    }
}
