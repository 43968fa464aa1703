use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::sinks::SummaryWriter;

use super::outcome::Outcome;
use super::record::GroupRecord;

/// Totals reported when the aggregation task ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub outcomes_applied: u64,
    pub groups_summarized: u64,
    /// Groups that never reached the expected count, ascending. They are
    /// discarded without a summary.
    pub incomplete_groups: Vec<u64>,
}

pub(crate) struct Aggregator {
    rps: u64,
    groups: HashMap<u64, GroupRecord>,
    writer: Box<dyn SummaryWriter>,
    outcomes_applied: u64,
    groups_summarized: u64,
}

impl Aggregator {
    pub(crate) fn new(rps: u64, writer: Box<dyn SummaryWriter>) -> Self {
        Self {
            rps,
            groups: HashMap::new(),
            writer,
            outcomes_applied: 0,
            groups_summarized: 0,
        }
    }

    /// Applies one outcome. When its group reaches `rps` outcomes the summary
    /// is written and the group is dropped from the table. Returns whether the
    /// group completed.
    pub(crate) fn apply(&mut self, outcome: Outcome) -> bool {
        let group = outcome.group();
        let record = self.groups.entry(group).or_default();
        record.record(outcome.status());
        let received = record.received();
        self.outcomes_applied = self.outcomes_applied.saturating_add(1);

        if received < self.rps {
            trace!(
                "Count not met, waiting for more (group: {}, count: {}, rps: {})",
                group, received, self.rps
            );
            return false;
        }

        let Some(finished) = self.groups.remove(&group) else {
            return false;
        };
        let summary = finished.into_summary(group, self.rps);
        if let Err(err) = self.writer.write_summary(&summary) {
            error!("Failed to write summary for group {}: {}", group, err);
        }
        self.groups_summarized = self.groups_summarized.saturating_add(1);
        true
    }

    #[cfg(test)]
    pub(crate) fn pending_groups(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn finish(self) -> AggregateReport {
        let mut incomplete_groups: Vec<u64> = self.groups.keys().copied().collect();
        incomplete_groups.sort_unstable();
        for group in &incomplete_groups {
            if let Some(record) = self.groups.get(group) {
                debug!(
                    "Discarding incomplete group {} ({} of {} outcomes)",
                    group,
                    record.received(),
                    self.rps
                );
            }
        }
        AggregateReport {
            outcomes_applied: self.outcomes_applied,
            groups_summarized: self.groups_summarized,
            incomplete_groups,
        }
    }

    /// Consumes outcomes until every sender is dropped.
    pub(crate) async fn run(
        mut self,
        mut outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    ) -> AggregateReport {
        while let Some(outcome) = outcome_rx.recv().await {
            self.apply(outcome);
        }
        self.finish()
    }
}

/// Spawns the aggregation task. It ends, returning its report, once every
/// outcome sender has been dropped.
#[must_use]
pub fn spawn_aggregator(
    rps: u64,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    writer: Box<dyn SummaryWriter>,
) -> JoinHandle<AggregateReport> {
    tokio::spawn(Aggregator::new(rps, writer).run(outcome_rx))
}
