//! Bounded FIFO hand-off between touch producers and the dispatcher.
//!
//! The queue is a thin wrapper over a bounded `tokio::sync::mpsc` channel.
//! The wrapper exists to pin down the backpressure contract:
//!
//! - When fewer than `capacity` samples are pending, enqueueing returns at once.
//! - When the queue is full, [`EventProducer::enqueue`] **blocks** the calling
//!   thread (and [`EventProducer::enqueue_async`] suspends the calling task)
//!   until the dispatcher frees a slot.  Samples are never dropped or
//!   reordered: a lost Begin or End would corrupt the gesture state.
//! - Once the dispatcher shuts down, every enqueue call fails with
//!   [`QueueError::Closed`].
//!
//! # Blocking vs async producers (for beginners)
//!
//! Touch input usually arrives on a plain OS thread (a UI loop, a stdin
//! reader).  Such a thread may block, so it calls `enqueue`.  Code running
//! *inside* the Tokio runtime must never block a worker thread; it calls
//! `enqueue_async` instead.  Calling `enqueue` from async code panics, which
//! is Tokio's way of catching that mistake early.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use touchmouse_core::TouchSample;

/// Default number of samples that may be pending before producers wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Error returned by the producer side of the queue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The dispatcher has shut down; no further samples are accepted.
    #[error("event queue is closed")]
    Closed,
    /// Returned by [`EventProducer::try_enqueue`] when no slot is free.
    #[error("event queue is full ({capacity} pending samples)")]
    Full { capacity: usize },
}

/// Creates a queue holding at most `capacity` pending samples.
///
/// A capacity of zero is treated as one.
pub fn bounded(capacity: usize) -> (EventProducer, EventConsumer) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (EventProducer { tx, capacity }, EventConsumer { rx })
}

/// Producer handle.  Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct EventProducer {
    tx: mpsc::Sender<TouchSample>,
    capacity: usize,
}

impl EventProducer {
    /// Appends `sample`, blocking the current thread while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the dispatcher has shut down.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.  Use
    /// [`enqueue_async`](Self::enqueue_async) there.
    pub fn enqueue(&self, sample: TouchSample) -> Result<(), QueueError> {
        self.tx.blocking_send(sample).map_err(|_| QueueError::Closed)
    }

    /// Appends `sample`, waiting asynchronously while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the dispatcher has shut down.
    pub async fn enqueue_async(&self, sample: TouchSample) -> Result<(), QueueError> {
        self.tx.send(sample).await.map_err(|_| QueueError::Closed)
    }

    /// Appends `sample` only if a slot is free right now.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] when the queue is at capacity and
    /// [`QueueError::Closed`] if the dispatcher has shut down.
    pub fn try_enqueue(&self, sample: TouchSample) -> Result<(), QueueError> {
        self.tx.try_send(sample).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once the consumer has been closed or dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle, owned by the dispatcher.
#[derive(Debug)]
pub struct EventConsumer {
    rx: mpsc::Receiver<TouchSample>,
}

impl EventConsumer {
    /// Waits for the next sample.
    ///
    /// Returns `None` once every producer has been dropped and the queue is
    /// empty, or after [`close`](Self::close) once the queue is drained.
    pub async fn next(&mut self) -> Option<TouchSample> {
        self.rx.recv().await
    }

    /// Stops accepting new samples and returns how many were still pending.
    ///
    /// The pending samples are discarded.  Producers blocked in `enqueue`
    /// are woken and receive [`QueueError::Closed`].
    pub fn close(&mut self) -> usize {
        self.rx.close();
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    /// Number of samples currently waiting.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
