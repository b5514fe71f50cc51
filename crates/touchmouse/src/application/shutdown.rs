//! One-shot shutdown signal for the dispatcher.
//!
//! Built on a `tokio::sync::watch` channel holding a single `bool`.  The
//! trigger flips it to `true`; listeners wake up.  Dropping the trigger
//! counts as a shutdown request too, so a dispatcher can never outlive the
//! code that owns its trigger.

use tokio::sync::watch;

/// Creates a connected trigger/listener pair.
pub fn channel() -> (ShutdownTrigger, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownListener { rx })
}

/// Sending half.  Not `Clone`: there is exactly one owner of the decision.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Requests shutdown.  Calling it more than once is harmless.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half.  Clone it to hand the same signal to several tasks.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been requested or the trigger dropped.
    pub async fn wait(&mut self) {
        // `wait_for` errors only when the trigger is gone, which is also a stop.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }

    /// Non-blocking check.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_resolves_after_trigger() {
        // Arrange
        let (trigger, mut listener) = channel();
        assert!(!listener.is_triggered());

        // Act
        trigger.trigger();

        // Assert
        tokio::time::timeout(Duration::from_secs(1), listener.wait())
            .await
            .expect("listener must wake after trigger");
        assert!(listener.is_triggered());
    }

    #[tokio::test]
    async fn test_dropping_trigger_counts_as_shutdown() {
        let (trigger, mut listener) = channel();

        drop(trigger);

        tokio::time::timeout(Duration::from_secs(1), listener.wait())
            .await
            .expect("listener must wake when the trigger is dropped");
        assert!(listener.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_stays_pending_without_trigger() {
        let (_trigger, mut listener) = channel();

        let result = tokio::time::timeout(Duration::from_millis(50), listener.wait()).await;

        assert!(result.is_err(), "must not resolve before shutdown is requested");
    }

    #[tokio::test]
    async fn test_cloned_listeners_all_wake() {
        let (trigger, mut a) = channel();
        let mut b = a.clone();

        trigger.trigger();

        a.wait().await;
        b.wait().await;
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let (trigger, listener) = channel();
        trigger.trigger();
        trigger.trigger();
        assert!(listener.is_triggered());
    }
}
