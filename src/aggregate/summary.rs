use std::fmt;

use serde::Serialize;

/// Share of one status code within a completed group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusShare {
    pub code: u16,
    pub count: u64,
    pub percent: u64,
}

/// Summary emitted exactly once for each group that received all its outcomes.
///
/// Statuses are sorted by code. Displays as
/// `<group>: Reqs: <total> Errs: <n> (<pct>%) <code>: <count> (<pct>%) ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub group: u64,
    pub total: u64,
    pub errors: u64,
    pub error_percent: u64,
    pub statuses: Vec<StatusShare>,
}

impl fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Reqs: {} Errs: {} ({}%)",
            self.group, self.total, self.errors, self.error_percent
        )?;
        for share in &self.statuses {
            write!(f, " {}: {} ({}%)", share.code, share.count, share.percent)?;
        }
        Ok(())
    }
}

/// `100 * count / total`, rounded half up to the nearest whole percent.
pub(super) fn percent_of(count: u64, total: u64) -> u64 {
    count
        .saturating_mul(100)
        .saturating_add(total / 2)
        .checked_div(total)
        .unwrap_or(0)
}
