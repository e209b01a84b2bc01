//! Periodic refresh signal
//!
//! The ticker runs on its own cancellation token, so stopping it never
//! touches the paging stream and restarting the stream never stops it.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Signals pushed to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Reload the visible page set around the current position.
    RefreshData,
}

pub struct RealtimeHandle {
    pub cancellation_token: CancellationToken,
    pub join_handle: JoinHandle<()>,
}

impl RealtimeHandle {
    pub async fn stop(self) {
        self.cancellation_token.cancel();
        let _ = self.join_handle.await;
    }
}

/// Emit [`Effect::RefreshData`] immediately and then once per `period`
/// until cancelled.
pub fn spawn_ticker(period: Duration, effects: broadcast::Sender<Effect>) -> RealtimeHandle {
    let cancellation_token = CancellationToken::new();
    let token = cancellation_token.clone();

    let join_handle = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    // No subscribers is fine; the tick is simply lost.
                    let _ = effects.send(Effect::RefreshData);
                }
            }
        }
        tracing::debug!("Realtime ticker stopped");
    });

    RealtimeHandle {
        cancellation_token,
        join_handle,
    }
}
