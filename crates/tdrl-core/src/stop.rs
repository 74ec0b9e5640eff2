//! Cooperative cancellation of training runs

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

/// Handle used to ask a training run to stop at the next episode boundary.
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct StopSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    /// Create a signal that has not been triggered
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Ask every holder of this signal to stop
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }

    /// Check whether a stop has been requested
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until a stop is requested
    pub async fn stopped(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = receiver.wait_for(|stopped| *stopped).await;
    }

    /// Trigger this signal when the process receives an interrupt (Ctrl-C)
    #[must_use]
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("interrupt received, stopping after the current episode");
                    signal.stop();
                }
                Err(error) => warn!(%error, "unable to listen for interrupts"),
            }
        })
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
