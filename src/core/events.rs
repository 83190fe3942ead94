//! Broadcast notification surface
//!
//! The NotificationBus decouples the orchestrator from whoever presents
//! notifications. It uses `tokio::sync::broadcast`, so any number of consumers
//! (a UI bridge, a test, a log forwarder) can subscribe.
//!
//! ```text
//! UploadOrchestrator ──▶ NotificationBus::notify() ──▶ broadcast channel ──▶ subscribers
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = NotificationBus::new(64);
//! let mut rx = bus.subscribe();
//!
//! let orchestrator = UploadOrchestrator::new(config, Arc::new(bus.clone()), planner);
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{}: {}", envelope.notification.title, envelope.notification.description);
//! }
//! ```

use crate::core::notification::{Notification, Notifier};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Envelope wrapping a notification with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Unique notification ID
    pub id: Uuid,
    /// When the notification was raised
    pub timestamp: DateTime<Utc>,
    pub notification: Notification,
}

impl NotificationEnvelope {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notification,
        }
    }
}

/// Broadcast-based notifier
///
/// Cheap to clone (the sender is reference counted internally).
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<NotificationEnvelope>,
}

impl NotificationBus {
    /// Create a bus buffering up to `capacity` notifications per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification, returning how many receivers will see it
    ///
    /// Never fails: with no subscribers the notification is dropped.
    pub fn publish(&self, notification: Notification) -> usize {
        let envelope = NotificationEnvelope::new(notification);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to future notifications
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.sender.subscribe()
    }

    /// Subscribe as a stream; lagged notifications are skipped
    pub fn stream(&self) -> impl Stream<Item = NotificationEnvelope> + use<> {
        BroadcastStream::new(self.sender.subscribe()).filter_map(|item| match item {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                tracing::warn!(error = %err, "Notification subscriber lagged");
                None
            }
        })
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl Notifier for NotificationBus {
    async fn notify(&self, notification: Notification) -> Result<()> {
        let receivers = self.publish(notification);
        tracing::debug!(receivers, "Notification published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();

        let receivers = bus.publish(Notification::info("Success", "done"));
        assert_eq!(receivers, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.notification.title, "Success");
        assert!(!received.id.is_nil());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_share_envelope() {
        let bus = NotificationBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.notify(Notification::destructive("Error", "boom"))
            .await
            .unwrap();

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[tokio::test]
    async fn test_stream_yields_notifications() {
        let bus = NotificationBus::default();
        let stream = bus.stream();
        tokio::pin!(stream);

        bus.publish(Notification::info("a", "first"));
        bus.publish(Notification::info("b", "second"));

        let first = stream.next().await.unwrap();
        let second = stream.next().await.unwrap();
        assert_eq!(first.notification.description, "first");
        assert_eq!(second.notification.description, "second");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = NotificationBus::new(4);
        assert_eq!(bus.publish(Notification::info("x", "y")), 0);
    }
}
