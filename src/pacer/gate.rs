use tokio::sync::watch;

/// Single-use release point for the request tasks of one group.
///
/// Tasks hold a [`GateWaiter`] and block until [`BurstGate::open`] is called.
/// Opening consumes the gate, so no group can reuse it.
#[derive(Debug)]
pub(crate) struct BurstGate {
    tx: watch::Sender<bool>,
}

#[derive(Debug)]
pub(crate) struct GateWaiter {
    rx: watch::Receiver<bool>,
}

impl BurstGate {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub(crate) fn waiter(&self) -> GateWaiter {
        GateWaiter {
            rx: self.tx.subscribe(),
        }
    }

    pub(crate) fn open(self) {
        self.tx.send_replace(true);
    }
}

impl GateWaiter {
    /// Resolves once the gate opens. Returns `false` if the gate was dropped
    /// without opening.
    pub(crate) async fn wait(mut self) -> bool {
        self.rx.wait_for(|open| *open).await.is_ok()
    }
}
