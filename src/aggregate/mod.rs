//! Per-group result aggregation.
//!
//! Request tasks hand their [`Outcome`]s to a single aggregation task over an
//! unbounded channel. That task is the only owner of the group table, so
//! applying an outcome, detecting completion, emitting the summary and
//! discarding the group all happen in one serial step.
mod aggregator;
mod outcome;
mod record;
mod summary;


pub use aggregator::{AggregateReport, spawn_aggregator};
pub use outcome::{Outcome, OutcomeStatus};
pub use summary::{GroupSummary, StatusShare};

#[cfg(test)]
use aggregator::Aggregator;
