//! In-process event bus backed by a tokio broadcast channel.
//!
//! Every store mutation is published once; each subscriber attaches an
//! [`EventFilter`] when subscribing and only ever sees the matching slice.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::event::ChangeEvent;
use pixelhub_domain::path::Namespace;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to every event on this bus.
    ///
    /// Returns a subscription that will get all events published *after*
    /// it is created.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.subscribe_filtered(EventFilter::All)
    }

    /// Subscribe to the events matching `filter`.
    #[must_use]
    pub fn subscribe_filtered(&self, filter: EventFilter) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(
        &self,
        event: ChangeEvent,
    ) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        // send fails only when there are zero receivers
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

/// Predicate attached to a [`Subscription`].
#[derive(Debug, Clone)]
pub enum EventFilter {
    /// Every event on the bus.
    All,
    /// Events whose id lies inside the given namespace.
    Namespace(Namespace),
}

impl EventFilter {
    #[must_use]
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match self {
            Self::All => true,
            Self::Namespace(namespace) => namespace.contains(event.id()),
        }
    }
}

/// Receiving end of the bus for one consumer.
///
/// Dropping the subscription unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    filter: EventFilter,
}

impl Subscription {
    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus is gone. A subscriber that falls behind
    /// the channel capacity loses the oldest events; this is logged and
    /// reception continues with the oldest retained event.
    ///
    /// Cancel safe: dropping the future never loses a matching event.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagged behind, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
