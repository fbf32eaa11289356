//! Channel-backed delivery for a transport task.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::DeliveryChannel;
use crate::core::SearchEvent;

/// Receiving half handed to the transport that owns the subscriber socket.
pub type SessionReceiver = mpsc::UnboundedReceiver<SearchEvent>;

/// A delivery channel that forwards events to a transport task.
///
/// Once the receiver is dropped (the subscriber disconnected) further events
/// are discarded; in-flight work is not interrupted.
#[derive(Debug, Clone)]
pub struct SessionChannel {
    session_id: String,
    sender: mpsc::UnboundedSender<SearchEvent>,
}

impl SessionChannel {
    /// Creates a channel and the receiver a transport task should drain.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> (Self, SessionReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            session_id: session_id.into(),
            sender,
        };
        (channel, receiver)
    }

    /// The transport-level session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn forward(&self, event: SearchEvent) {
        if let Err(err) = self.sender.send(event) {
            debug!(
                session_id = %self.session_id,
                event = err.0.name(),
                "Subscriber disconnected, dropping event"
            );
        }
    }
}

#[async_trait]
impl DeliveryChannel for SessionChannel {
    async fn emit(&self, event: SearchEvent) {
        self.forward(event);
    }

    fn try_emit(&self, event: SearchEvent) {
        self.forward(event);
    }

    fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (channel, mut receiver) = SessionChannel::new("socket-1");
        channel.emit(SearchEvent::error("first")).await;
        channel.try_emit(SearchEvent::complete("second"));

        assert_eq!(receiver.recv().await, Some(SearchEvent::error("first")));
        assert_eq!(receiver.recv().await, Some(SearchEvent::complete("second")));
        assert_eq!(channel.session_id(), "socket-1");
    }

    #[tokio::test]
    async fn test_disconnected_subscriber_drops_events() {
        let (channel, receiver) = SessionChannel::new("socket-2");
        assert!(channel.is_connected());

        drop(receiver);
        assert!(!channel.is_connected());

        // Must not panic or block.
        channel.emit(SearchEvent::complete("late")).await;
    }
}
