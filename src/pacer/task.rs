use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::aggregate::{Outcome, OutcomeStatus};
use crate::http::RequestExecutor;

use super::gate::GateWaiter;

/// One request attempt of one group.
pub(super) struct RequestTask {
    pub(super) group: u64,
    pub(super) executor: Arc<dyn RequestExecutor>,
    pub(super) outcome_tx: mpsc::UnboundedSender<Outcome>,
    pub(super) gate: Option<GateWaiter>,
}

impl RequestTask {
    pub(super) async fn run(self) {
        if let Some(gate) = self.gate
            && !gate.wait().await
        {
            trace!("Burst gate for group {} dropped before opening", self.group);
            return;
        }

        let status = match self.executor.execute().await {
            Ok(code) => OutcomeStatus::Status(code),
            Err(failure) => {
                debug!("Error in response (group {}): {}", self.group, failure);
                OutcomeStatus::Failed
            }
        };

        if self.outcome_tx.send(Outcome::new(self.group, status)).is_err() {
            trace!("Aggregator gone, dropping outcome for group {}", self.group);
        }
    }
}
