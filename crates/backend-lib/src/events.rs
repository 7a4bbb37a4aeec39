// ============================
// crates/backend-lib/src/events.rs
// ============================
//! Fire-and-forget event notifications.
//!
//! Handlers publish one human-readable line per notable action. Delivery is
//! best effort: publishing never fails and never blocks the request.
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Catalog records created
pub const CATALOG: &str = "catalog";
/// Account registrations
pub const ACCOUNTS: &str = "accounts";
/// Storage faults and refused privileged calls
pub const AUDIT: &str = "audit";

/// A published line and the channel it went to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub channel: String,
    pub message: String,
}

/// Sink for outbound notifications
pub trait EventPublisher: Send + Sync {
    /// Publish `message` on `channel`; the outcome is not reported.
    fn publish(&self, channel: &str, message: String);
}

/// Writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

impl EventPublisher for LogPublisher {
    fn publish(&self, channel: &str, message: String) {
        tracing::info!(target: "hwcatalog::events", channel, "{message}");
    }
}

/// In-process fan-out over a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<Event>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Drain every event into the log until the publisher is dropped.
    pub fn spawn_log_drain(&self) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => LogPublisher.publish(&event.channel, event.message),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event log drain lagged");
                    },
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, channel: &str, message: String) {
        // No subscribers is not an error.
        let _ = self.tx.send(Event {
            channel: channel.to_string(),
            message,
        });
    }
}
