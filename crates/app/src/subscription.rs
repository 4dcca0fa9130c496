//! Live snapshot subscriptions.
//!
//! A [`Subscription`] decouples consumers from any particular backend's
//! push mechanism: each delivery is a full snapshot of the watched data,
//! never a diff, and the consumer replaces its local view wholesale. There
//! is no ordering guarantee between subscriptions on different collections.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use tokio::sync::watch;

/// A handle to a stream of full snapshots.
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(rx: watch::Receiver<T>) -> Self {
        Self { rx }
    }

    /// A subscription pinned to a single snapshot, for tests and mocks.
    pub fn fixed(value: T) -> Self {
        let (_tx, rx) = watch::channel(value);
        Self { rx }
    }

    /// The most recent snapshot.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the publisher is
    /// gone and no further snapshots can arrive.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;

        Some(self.rx.borrow_and_update().clone())
    }

    /// Stop receiving snapshots.
    pub fn close(self) {}
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Derive a subscription whose snapshots are `f` applied to each
    /// incoming snapshot of `self`.
    pub fn map<U, F>(mut self, f: F) -> Subscription<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        let initial = f(&self.rx.borrow());
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            while let Some(value) = self.changed().await {
                if tx.send(f(&value)).is_err() {
                    break;
                }
            }
        });

        Subscription { rx }
    }
}

impl<T> Debug for Subscription<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::watch;

    use super::*;

    #[tokio::test]
    async fn current_returns_latest_snapshot() {
        let (tx, rx) = watch::channel(vec![1, 2]);
        let subscription = Subscription::new(rx);

        assert_eq!(subscription.current(), vec![1, 2]);

        tx.send(vec![3]).unwrap();
        assert_eq!(subscription.current(), vec![3]);
    }

    #[tokio::test]
    async fn changed_delivers_full_snapshots() {
        let (tx, rx) = watch::channel(vec![1]);
        let mut subscription = Subscription::new(rx);

        tx.send(vec![1, 2]).unwrap();

        assert_eq!(subscription.changed().await, Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn changed_ends_when_publisher_is_dropped() {
        let (tx, rx) = watch::channel(0_u32);
        let mut subscription = Subscription::new(rx);

        drop(tx);

        assert_eq!(subscription.changed().await, None);
    }

    #[tokio::test]
    async fn fixed_subscription_never_changes() {
        let mut subscription = Subscription::fixed("only");

        assert_eq!(subscription.current(), "only");
        assert_eq!(subscription.changed().await, None);
    }

    #[tokio::test]
    async fn map_transforms_each_snapshot() {
        let (tx, rx) = watch::channel(vec![1, 2, 3]);
        let mut mapped = Subscription::new(rx).map(|values: &Vec<i32>| values.len());

        assert_eq!(mapped.current(), 3);

        tx.send(vec![7]).unwrap();

        assert_eq!(mapped.changed().await, Some(1));
    }
}
