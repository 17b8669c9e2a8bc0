//! Reconnect timer.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{FeedEvent, FeedSender};

/// Delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// A single pending reconnect.
///
/// Arming always cancels the previous pending timer first, so however many
/// closes arrive in a row, at most one [`FeedEvent::ReconnectDue`] is
/// honored per delay. Each arm carries a generation; a due event from a
/// timer that was cancelled after it had already fired is stale and
/// [`ReconnectTimer::take_due`] rejects it.
#[derive(Debug)]
pub struct ReconnectTimer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl ReconnectTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending timer, then schedule `ReconnectDue` after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, events: FeedSender) {
        if self.cancel() {
            debug!("replaced pending reconnect timer");
        }
        let delay = self.delay;
        let generation = self.generation;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(FeedEvent::ReconnectDue(generation));
        }));
    }

    /// Cancel the pending timer. Returns true if one was still running.
    ///
    /// Any due event already queued by the cancelled timer becomes stale.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.pending.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    /// Accept the due event of `generation` if it belongs to the live timer.
    ///
    /// Returns false for stale events, leaving any newer timer armed.
    pub fn take_due(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ReconnectTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
