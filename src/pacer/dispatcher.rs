use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error};

use crate::aggregate::Outcome;
use crate::domain::{RunConfig, RunEnd};
use crate::http::RequestExecutor;
use crate::shutdown::{ControlReceiver, ControlSignal};

use super::gate::BurstGate;
use super::task::RequestTask;

/// Spacing between groups. The first group fires one period after start.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub end: RunEnd,
    pub groups: u64,
    pub requests: u64,
}

/// Releases `rps` request tasks per tick and tracks them until they finish.
pub struct Dispatcher {
    rps: u64,
    duration_limit: Option<u64>,
    burst: bool,
    executor: Arc<dyn RequestExecutor>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        config: &RunConfig,
        executor: Arc<dyn RequestExecutor>,
        outcome_tx: mpsc::UnboundedSender<Outcome>,
    ) -> Self {
        Self {
            rps: config.rps.get(),
            duration_limit: config.duration_limit(),
            burst: config.burst,
            executor,
            outcome_tx,
        }
    }

    /// Ticks until the duration is reached, a stop is requested, or the run
    /// is aborted.
    ///
    /// Completion and stop drain every in-flight request before returning.
    /// Abort returns at once and cancels in-flight requests. The outcome
    /// sender is dropped on return, which lets the aggregator finish.
    pub async fn run(self, mut control_rx: ControlReceiver) -> DispatchReport {
        let start = Instant::now()
            .checked_add(TICK_PERIOD)
            .unwrap_or_else(Instant::now);
        let mut ticker = interval_at(start, TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut control_open = true;
        let mut groups: u64 = 0;
        let mut requests: u64 = 0;

        debug!(
            "Runner loop starting (rps: {}, duration: {:?}, burst: {})",
            self.rps, self.duration_limit, self.burst
        );
        let end = loop {
            let signal = *control_rx.borrow_and_update();
            match signal {
                ControlSignal::Abort => break RunEnd::Aborted,
                ControlSignal::Stop => break RunEnd::Stopped,
                ControlSignal::Running => {}
            }

            tokio::select! {
                biased;
                changed = control_rx.changed(), if control_open => {
                    control_open = changed.is_ok();
                }
                _ = ticker.tick() => {
                    groups = groups.saturating_add(1);
                    let spawned = self.dispatch_group(groups, &mut in_flight);
                    requests = requests.saturating_add(spawned);
                    if self.duration_limit.is_some_and(|limit| groups >= limit) {
                        break RunEnd::Completed;
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join_result(joined);
                }
            }
        };

        let end = match end {
            RunEnd::Aborted => {
                debug!(
                    "Runner is aborting! ({} requests in flight)",
                    in_flight.len()
                );
                in_flight.abort_all();
                RunEnd::Aborted
            }
            RunEnd::Completed | RunEnd::Stopped => {
                debug!(
                    "Runner is stopping... ({} requests in flight)",
                    in_flight.len()
                );
                if drain_in_flight(&mut in_flight, &mut control_rx, control_open).await {
                    RunEnd::Aborted
                } else {
                    end
                }
            }
        };

        DispatchReport {
            end,
            groups,
            requests,
        }
    }

    fn dispatch_group(&self, group: u64, in_flight: &mut JoinSet<()>) -> u64 {
        debug!("Starting requests for group {}", group);
        let gate = self.burst.then(BurstGate::new);
        let spawned = self.spawn_group(group, gate.as_ref(), in_flight);
        if let Some(gate) = gate {
            gate.open();
        }
        spawned
    }

    /// Spawns the group's tasks. With a gate, none of them starts its
    /// request until the caller opens it.
    pub(super) fn spawn_group(
        &self,
        group: u64,
        gate: Option<&BurstGate>,
        in_flight: &mut JoinSet<()>,
    ) -> u64 {
        for _ in 0..self.rps {
            let task = RequestTask {
                group,
                executor: Arc::clone(&self.executor),
                outcome_tx: self.outcome_tx.clone(),
                gate: gate.map(BurstGate::waiter),
            };
            in_flight.spawn(task.run());
        }
        self.rps
    }
}

/// Waits for every in-flight task. Returns `true` if an abort cut the wait
/// short.
async fn drain_in_flight(
    in_flight: &mut JoinSet<()>,
    control_rx: &mut ControlReceiver,
    mut control_open: bool,
) -> bool {
    loop {
        let signal = *control_rx.borrow_and_update();
        if signal == ControlSignal::Abort {
            debug!(
                "Runner is aborting! ({} requests still in flight)",
                in_flight.len()
            );
            in_flight.abort_all();
            return true;
        }

        tokio::select! {
            biased;
            changed = control_rx.changed(), if control_open => {
                control_open = changed.is_ok();
            }
            joined = in_flight.join_next() => match joined {
                Some(joined) => log_join_result(joined),
                None => return false,
            },
        }
    }
}

fn log_join_result(joined: Result<(), JoinError>) {
    if let Err(err) = joined
        && err.is_panic()
    {
        error!("Request task panicked: {}", err);
    }
}
