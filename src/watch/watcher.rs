use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::debug_span;
use tracing::trace;
use tracing::Instrument;

use super::IndexTracker;
use crate::metrics::record_watch_delivery;
use crate::metrics::record_watch_termination;
use crate::Entry;
use crate::Result;
use crate::Store;
use crate::WatchConfig;
use crate::WatchError;

/// Why a watch loop stopped without a store error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Cancelled,
    ConsumerGone,
}

impl Stop {
    fn as_str(self) -> &'static str {
        match self {
            Stop::Cancelled => "cancelled",
            Stop::ConsumerGone => "consumer_gone",
        }
    }
}

/// Background long-poll loop over a single key.
///
/// `Starting → Polling → Delivering → Polling → … → Closed`. The loop owns
/// the only sender of its delivery channel, so leaving the loop closes the
/// stream exactly once and nothing can be sent afterwards.
pub struct ChangeWatcher<S: Store> {
    store: Arc<S>,
    tracker: Arc<IndexTracker>,
    key: String,
    sentinel_index: u64,
    channel_capacity: usize,
    cancel: CancellationToken,
}

impl<S: Store> ChangeWatcher<S> {
    /// # Errors
    /// - [`crate::Error::Config`] when `config` fails [`WatchConfig::validate`]
    pub fn new(
        store: Arc<S>,
        tracker: Arc<IndexTracker>,
        key: impl Into<String>,
        config: &WatchConfig,
        cancel: CancellationToken,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            tracker,
            key: key.into(),
            sentinel_index: config.sentinel_index,
            channel_capacity: config.channel_capacity,
            cancel,
        })
    }

    /// Starts the loop on the current Tokio runtime.
    pub fn spawn(self) -> WatchHandle {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let key = self.key.clone();
        let cancel = self.cancel.clone();
        let span = debug_span!("watch", key = %key);
        let task = tokio::spawn(self.run(tx).instrument(span));

        WatchHandle {
            key,
            rx,
            cancel,
            task,
        }
    }

    async fn run(
        self,
        tx: mpsc::Sender<Option<Entry>>,
    ) -> Result<()> {
        let mut wait_index = self.tracker.get(&self.key).unwrap_or(self.sentinel_index);
        debug!(wait_index, "watch started");

        let stop = loop {
            if self.cancel.is_cancelled() {
                break Stop::Cancelled;
            }

            // Polling
            let polled = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Stop::Cancelled,
                _ = tx.closed() => break Stop::ConsumerGone,
                polled = self.store.fetch(&self.key, Some(wait_index)) => polled,
            };

            let (entry, meta) = match polled {
                Ok(response) => response,
                Err(e) => {
                    debug!(wait_index, "watch closed by store error: {:?}", e);
                    record_watch_termination("store_error");
                    return Err(e);
                }
            };

            if wait_index == self.sentinel_index && entry.is_none() {
                // Key never seen: nothing to deliver yet. Re-poll right away,
                // but from the reported revision so a deleted key does not
                // answer instantly forever.
                trace!(last_index = meta.last_index, "no entry behind sentinel index");
                wait_index = wait_index.max(meta.last_index);
                continue;
            }

            self.tracker.set(&self.key, meta.last_index);
            wait_index = wait_index.max(meta.last_index);

            // Delivering
            trace!(wait_index, present = entry.is_some(), "delivering entry");
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Stop::Cancelled,
                sent = tx.send(entry) => {
                    if sent.is_err() {
                        break Stop::ConsumerGone;
                    }
                    record_watch_delivery(&self.key);
                }
            }
        };

        debug!(reason = stop.as_str(), "watch stopped");
        record_watch_termination(stop.as_str());
        Ok(())
    }
}

/// Consumer side of a running watch.
///
/// Yields `Some(entry)` for each delivered response, where `entry` is `None`
/// when the key does not exist. The stream ends when the watch is cancelled
/// or the store reports an error; [`WatchHandle::join`] tells which.
pub struct WatchHandle {
    key: String,
    rx: mpsc::Receiver<Option<Entry>>,
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl WatchHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Next delivered entry; `None` once the stream is closed
    pub async fn recv(&mut self) -> Option<Option<Entry>> {
        self.rx.recv().await
    }

    /// Asks the loop to stop at its next suspension point
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops consuming and waits for the loop to exit.
    ///
    /// Returns the store error that closed the stream, or `Ok(())` when the
    /// watch was cancelled or released here.
    pub async fn join(self) -> Result<()> {
        let WatchHandle { rx, task, .. } = self;
        drop(rx);
        task.await.map_err(WatchError::TaskFailed)?
    }

    /// Converts into a [`futures::Stream`] of deliveries.
    ///
    /// Dropping the stream stops the loop.
    pub fn into_stream(self) -> ReceiverStream<Option<Entry>> {
        ReceiverStream::new(self.rx)
    }
}
