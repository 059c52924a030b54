//! Change notification for long-poll waiters.

use std::time::Duration;
use tokio::sync::Notify;

/// Wakes long-poll waiters when the mail store changes.
///
/// The mail delivery path calls [`ChangeSignal::notify`] after recording
/// a change; every parked Ping re-checks its watched folders and either
/// responds or parks again. The signal carries no payload, so a wakeup
/// is only a hint and waiters must confirm against the store.
#[derive(Debug, Default)]
pub struct ChangeSignal {
    notify: Notify,
}

impl ChangeSignal {
    /// Creates a signal with no waiters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes all currently parked waiters.
    pub fn notify(&self) {
        self.notify.notify_waiters();
    }

    /// Parks until the next notification or until `timeout` elapses.
    ///
    /// Returns true if woken by a notification, false on timeout.
    /// Cancellation-safe: dropping the future leaves no residue.
    pub async fn wait(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_quietly() {
        let signal = ChangeSignal::new();
        assert!(!signal.wait(Duration::from_secs(5)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn notification_wakes_waiter() {
        let signal = Arc::new(ChangeSignal::new());
        let waiter = Arc::clone(&signal);
        let handle = tokio::spawn(async move { waiter.wait(Duration::from_secs(60)).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.notify();
        assert!(handle.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn notify_without_waiters_is_not_stored() {
        let signal = ChangeSignal::new();
        signal.notify();
        // A later wait must not consume the earlier notification.
        assert!(!signal.wait(Duration::from_secs(1)).await);
    }
}
