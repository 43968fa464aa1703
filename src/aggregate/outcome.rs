/// Result of one request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// A response was received; any status code counts, including 4xx/5xx.
    Status(u16),
    /// No response: connect, DNS, protocol or timeout failure.
    Failed,
}

/// One completed request attempt tagged with the group that dispatched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    group: u64,
    status: OutcomeStatus,
}

impl Outcome {
    #[must_use]
    pub const fn new(group: u64, status: OutcomeStatus) -> Self {
        Self { group, status }
    }

    #[must_use]
    pub const fn status_code(group: u64, code: u16) -> Self {
        Self::new(group, OutcomeStatus::Status(code))
    }

    #[must_use]
    pub const fn failed(group: u64) -> Self {
        Self::new(group, OutcomeStatus::Failed)
    }

    #[must_use]
    pub const fn group(&self) -> u64 {
        self.group
    }

    #[must_use]
    pub const fn status(&self) -> OutcomeStatus {
        self.status
    }
}
