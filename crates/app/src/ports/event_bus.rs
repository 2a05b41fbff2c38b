//! Event bus port — publish side of the change-notification stream.

use std::future::Future;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::event::ChangeEvent;

/// Publishes change events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: ChangeEvent)
    -> impl Future<Output = Result<(), PixelHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: ChangeEvent,
    ) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        (**self).publish(event)
    }
}
