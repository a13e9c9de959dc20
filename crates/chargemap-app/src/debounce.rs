//! Search-input debouncing.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Pending {
    value: String,
    deadline: Instant,
}

/// Holds the latest submitted value until the input has been quiet for the
/// configured window. Intended for a `tokio::select!` event loop: call
/// [`Debouncer::submit`] on every keystroke and await
/// [`Debouncer::settled`] as one select branch — the branch only completes
/// once typing pauses.
#[derive(Debug)]
pub struct Debouncer {
    quiescence: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            pending: None,
        }
    }

    /// Records a new input value, restarting the quiescence window.
    pub fn submit(&mut self, value: impl Into<String>) {
        self.pending = Some(Pending {
            value: value.into(),
            deadline: Instant::now() + self.quiescence,
        });
    }

    /// Resolves with the latest value once the window elapses. Pends forever
    /// while nothing is queued, so it is safe as an always-polled select
    /// branch. Cancellation-safe: dropping the future keeps the pending
    /// value queued.
    pub async fn settled(&mut self) -> String {
        let deadline = match &self.pending {
            Some(p) => p.deadline,
            None => std::future::pending().await,
        };
        tokio::time::sleep_until(deadline).await;
        self.pending.take().map(|p| p.value).unwrap_or_default()
    }
}
