use std::collections::BTreeMap;

use super::outcome::OutcomeStatus;
use super::summary::{GroupSummary, StatusShare, percent_of};

/// Running tally for one group.
///
/// `received == error_count + status_counts.values().sum()` holds after every
/// call to [`GroupRecord::record`].
#[derive(Debug, Default)]
pub(super) struct GroupRecord {
    received: u64,
    status_counts: BTreeMap<u16, u64>,
    error_count: u64,
}

impl GroupRecord {
    pub(super) fn record(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Status(code) => {
                let count = self.status_counts.entry(code).or_insert(0);
                *count = count.saturating_add(1);
            }
            OutcomeStatus::Failed => {
                self.error_count = self.error_count.saturating_add(1);
            }
        }
        self.received = self.received.saturating_add(1);
    }

    pub(super) const fn received(&self) -> u64 {
        self.received
    }

    /// Consumes the record. Percentages are relative to `total`, the
    /// configured requests per group.
    pub(super) fn into_summary(self, group: u64, total: u64) -> GroupSummary {
        let statuses = self
            .status_counts
            .into_iter()
            .map(|(code, count)| StatusShare {
                code,
                count,
                percent: percent_of(count, total),
            })
            .collect();
        GroupSummary {
            group,
            total,
            errors: self.error_count,
            error_percent: percent_of(self.error_count, total),
            statuses,
        }
    }
}
