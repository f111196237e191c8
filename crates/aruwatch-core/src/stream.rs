// ── Reactive session streams ──
//
// Subscription handle for consuming snapshot changes from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::ClientSession;

/// A subscription to the client-session snapshot.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed()`](Self::changed) or by converting to a
/// `Stream`.
pub struct SessionStream {
    current: Arc<Vec<Arc<ClientSession>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<ClientSession>>>>,
}

impl SessionStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<ClientSession>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Arc<ClientSession>>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<ClientSession>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the sender (store) has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<ClientSession>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SessionWatchStream {
        SessionWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the store is mutated.
pub struct SessionWatchStream {
    inner: WatchStream<Arc<Vec<Arc<ClientSession>>>>,
}

impl Stream for SessionWatchStream {
    type Item = Arc<Vec<Arc<ClientSession>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Whitelist;
    use tokio_stream::StreamExt;

    fn row(ip: &str) -> Arc<ClientSession> {
        Arc::new(ClientSession {
            ip: ip.into(),
            hostname: "host".into(),
            band: None,
            ssid: None,
            ap_name: None,
            duration: None,
            health: Whitelist::Excluded,
        })
    }

    #[tokio::test]
    async fn changed_tracks_the_latest_snapshot() {
        let (tx, rx) = watch::channel(Arc::new(vec![]));
        let mut stream = SessionStream::new(rx);
        assert!(stream.current().is_empty());

        tx.send(Arc::new(vec![row("10.0.0.1")])).unwrap();
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);

        drop(tx);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn stream_adapter_yields_each_update() {
        let (tx, rx) = watch::channel(Arc::new(vec![row("10.0.0.1")]));
        let mut stream = SessionStream::new(rx).into_stream();

        // WatchStream yields the initial value first.
        assert_eq!(stream.next().await.unwrap().len(), 1);

        tx.send(Arc::new(vec![row("10.0.0.1"), row("10.0.0.2")]))
            .unwrap();
        assert_eq!(stream.next().await.unwrap().len(), 2);
    }
}
