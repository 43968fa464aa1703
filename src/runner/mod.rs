//! Wires the dispatcher, the aggregator and the control plane into one run.
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::aggregate::spawn_aggregator;
use crate::domain::{RunConfig, RunEnd, RunReport};
use crate::error::AppResult;
use crate::http::RequestExecutor;
use crate::pacer::Dispatcher;
use crate::shutdown::RunControl;
use crate::sinks::SummaryWriter;


/// Owns the control handle for one run.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    control: RunControl,
}

impl Runner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that stops or aborts this runner from elsewhere.
    #[must_use]
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    /// Stops dispatching new groups. In-flight requests finish and their
    /// summaries are still written.
    #[must_use]
    pub fn stop(&self) -> bool {
        let changed = self.control.stop();
        if changed {
            info!("Stopping: waiting for in-flight requests");
        }
        changed
    }

    /// Ends the run immediately. In-flight requests and pending groups are
    /// dropped.
    #[must_use]
    pub fn abort(&self) -> bool {
        let changed = self.control.abort();
        if changed {
            info!("Aborting everything!");
        }
        changed
    }

    /// Runs until the configured duration elapses, [`stop`](Self::stop) or
    /// [`abort`](Self::abort) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation task panicked.
    pub async fn start(
        &self,
        config: &RunConfig,
        executor: Arc<dyn RequestExecutor>,
        writer: Box<dyn SummaryWriter>,
    ) -> AppResult<RunReport> {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let aggregator = spawn_aggregator(config.rps.get(), outcome_rx, writer);
        let dispatcher = Dispatcher::new(config, executor, outcome_tx);

        let dispatch = dispatcher.run(self.control.subscribe()).await;
        let aggregate = if dispatch.end == RunEnd::Aborted {
            aggregator.abort();
            None
        } else {
            debug!("Waiting for the aggregator to flush");
            Some(aggregator.await?)
        };

        Ok(RunReport {
            end: dispatch.end,
            groups_dispatched: dispatch.groups,
            requests_dispatched: dispatch.requests,
            aggregate,
        })
    }
}
