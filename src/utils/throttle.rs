//! Fixed-delay pacing between ComicVine requests.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;

use crate::sources::MetadataError;

/// Pauses between consecutive requests to stay under the API's rate limit
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Block for `delay`. Returns [`MetadataError::Interrupted`] if the wait is cut short.
    async fn pause(&self, delay: Duration) -> Result<(), MetadataError>;
}

/// A one-shot interrupt flag shared between the throttle and its caller.
///
/// Once fired it stays fired, so an interrupt that arrives while a request is
/// in flight is still seen by the next pause.
#[derive(Debug, Clone)]
pub struct Interrupt {
    fired: watch::Receiver<bool>,
}

impl Interrupt {
    /// Listen for Ctrl-C for the rest of the process.
    ///
    /// Installing the listener replaces the default SIGINT behaviour, so the
    /// caller must watch [`Interrupt::fired`] to stop work that is not pausing.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn ctrl_c() -> Self {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::debug!("Received interrupt signal");
                    let _ = tx.send(true);
                }
                Err(e) => tracing::warn!("Failed to listen for interrupt signal: {}", e),
            }
        });
        Self { fired: rx }
    }

    /// An interrupt fired by sending `true` on the returned sender
    pub fn manual() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { fired: rx })
    }

    pub fn is_fired(&self) -> bool {
        *self.fired.borrow()
    }

    /// Resolves once the interrupt fires. Never resolves if it no longer can.
    pub async fn fired(&self) {
        let mut fired = self.fired.clone();
        let closed = fired.wait_for(|value| *value).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleeps on the tokio timer; a fired [`Interrupt`] cuts the sleep short
#[derive(Debug, Clone)]
pub struct SignalThrottle {
    interrupt: Interrupt,
}

impl SignalThrottle {
    /// Throttle interrupted by Ctrl-C. See [`Interrupt::ctrl_c`].
    pub fn new() -> Self {
        Self::with_interrupt(Interrupt::ctrl_c())
    }

    pub fn with_interrupt(interrupt: Interrupt) -> Self {
        Self { interrupt }
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    fn interrupted() -> MetadataError {
        tracing::error!("ComicVine rate-limit wait interrupted");
        MetadataError::Interrupted("received interrupt signal".to_string())
    }
}

impl Default for SignalThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Throttle for SignalThrottle {
    async fn pause(&self, delay: Duration) -> Result<(), MetadataError> {
        if self.interrupt.is_fired() {
            return Err(Self::interrupted());
        }

        tracing::trace!("Sleeping for {}s", delay.as_secs());

        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = self.interrupt.fired() => Err(Self::interrupted()),
        }
    }
}
