//! Push-based snapshot subscriptions.

use futures_util::{Stream, stream};
use tokio::sync::watch;

/// A live, restartable stream of full snapshots
///
/// The first [`next`](Subscription::next) yields the current snapshot
/// immediately. Later calls wait for the next change. Snapshots that arrive
/// while the consumer is busy are coalesced, but every emitted snapshot is
/// complete, so consumers replace their view instead of merging deltas.
/// Dropping the subscription releases it.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    primed: bool,
}

impl<T: Clone> Subscription<T> {
    pub fn new(receiver: watch::Receiver<T>) -> Self {
        Self {
            receiver,
            primed: false,
        }
    }

    /// Next snapshot, or `None` once the publisher is gone
    ///
    /// Cancel safe.
    pub async fn next(&mut self) -> Option<T> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// The latest snapshot without waiting
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Adapt into a [`Stream`] of snapshots
    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        stream::unfold(self, |mut subscription| async move {
            subscription
                .next()
                .await
                .map(|snapshot| (snapshot, subscription))
        })
    }
}
