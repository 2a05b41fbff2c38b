//! Dispatcher — background task feeding one subscription into one handler.
//!
//! Events are handled strictly one at a time: the next event is received only
//! after the previous one was fully processed. A failing handler is logged and
//! does not stop the loop, so one misbehaving app cannot starve others or
//! itself of later events.

use std::future::Future;
use std::sync::Weak;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::event::ChangeEvent;

use crate::event_bus::Subscription;

/// Something that consumes change events delivered by a [`Dispatcher`].
pub trait ChangeHandler: Send + Sync + 'static {
    /// Label used in logs.
    fn label(&self) -> &str;

    /// Process one event to completion.
    fn handle(&self, event: ChangeEvent) -> impl Future<Output = Result<(), PixelHubError>> + Send;
}

/// Handle to a running dispatch loop.
///
/// The loop ends when [`shutdown`](Self::shutdown) is called, when this handle
/// is dropped, when the handler is dropped, or when the bus closes. In every
/// case the subscription is released.
pub struct Dispatcher {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawn the dispatch loop on the current Tokio runtime.
    ///
    /// The task only holds a weak reference to `handler`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn<H: ChangeHandler>(handler: Weak<H>, subscription: Subscription) -> Self {
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(run(handler, subscription, stopped));
        Self {
            stop: Some(stop),
            task,
        }
    }

    /// Whether the loop is still receiving events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the loop and wait until an in-flight event has been handled.
    ///
    /// Must not be awaited from inside the handler itself.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(err) = (&mut self.task).await {
            tracing::error!(error = %err, "dispatcher task ended abnormally");
        }
    }
}

async fn run<H: ChangeHandler>(
    handler: Weak<H>,
    mut subscription: Subscription,
    mut stopped: oneshot::Receiver<()>,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = &mut stopped => break,
            event = subscription.recv() => event,
        };
        let Some(event) = event else {
            tracing::debug!("event bus closed");
            break;
        };
        let Some(handler) = handler.upgrade() else {
            break;
        };

        let id = event.id().clone();
        if let Err(err) = handler.handle(event).await {
            tracing::error!(app = handler.label(), id = %id, error = %err, "change handler failed");
        }
    }
}
