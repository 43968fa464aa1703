use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::shutdown::{ControlSignal, RunControl};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Maps process signals onto the run control.
///
/// The first Ctrl+C requests a cooperative stop; a second Ctrl+C or a
/// SIGTERM aborts. The task exits once the run is aborted.
#[must_use]
pub fn setup_signal_shutdown_handler(control: &RunControl) -> JoinHandle<()> {
    let control = control.clone();
    tokio::spawn(async move {
        let mut control_rx = control.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        loop {
            #[cfg(unix)]
            let terminated = async {
                if let Some(signal) = term_signal.as_mut() {
                    signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            };
            #[cfg(not(unix))]
            let terminated = std::future::pending::<()>();

            tokio::select! {
                _ = control_rx.wait_for(|signal| *signal == ControlSignal::Abort) => break,
                interrupted = tokio::signal::ctrl_c() => {
                    if let Err(err) = interrupted {
                        warn!("Failed to listen for Ctrl+C: {}", err);
                        break;
                    }
                    if control.stop() {
                        info!("Stopping: waiting for in-flight requests (Ctrl+C again to abort)");
                    } else if control.abort() {
                        info!("Aborting everything!");
                    }
                }
                () = terminated => {
                    if control.abort() {
                        info!("Aborting everything!");
                    }
                }
            }
        }
    })
}
