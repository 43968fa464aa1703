use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle signal observed by the dispatcher's tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Running,
    /// Cooperative: stop ticking, drain in-flight requests.
    Stop,
    /// Hard: return without waiting for in-flight requests.
    Abort,
}

impl ControlSignal {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, ControlSignal::Running)
    }
}

pub type ControlReceiver = watch::Receiver<ControlSignal>;

/// Cloneable handle used to stop or abort a run from any task or thread.
///
/// Transitions only move forward: `Running -> Stop -> Abort` or
/// `Running -> Abort`. Repeated or backwards requests are ignored.
#[derive(Debug, Clone)]
pub struct RunControl {
    tx: Arc<watch::Sender<ControlSignal>>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ControlSignal::Running);
        Self { tx: Arc::new(tx) }
    }

    /// Requests a cooperative stop. Returns `true` if this call changed state.
    #[must_use]
    pub fn stop(&self) -> bool {
        self.tx.send_if_modified(|signal| match signal {
            ControlSignal::Running => {
                *signal = ControlSignal::Stop;
                true
            }
            ControlSignal::Stop | ControlSignal::Abort => false,
        })
    }

    /// Requests a hard abort. Returns `true` if this call changed state.
    #[must_use]
    pub fn abort(&self) -> bool {
        self.tx.send_if_modified(|signal| match signal {
            ControlSignal::Running | ControlSignal::Stop => {
                *signal = ControlSignal::Abort;
                true
            }
            ControlSignal::Abort => false,
        })
    }

    #[must_use]
    pub fn signal(&self) -> ControlSignal {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ControlReceiver {
        self.tx.subscribe()
    }
}
