//! Dispatcher: the single consumer of the event queue.
//!
//! For every sample, in arrival order, the dispatcher:
//!
//! 1. classifies it with the [`GestureClassifier`] it owns,
//! 2. encodes the resulting [`Action`] (if any) with the wire codec,
//! 3. hands the bytes to the [`DatagramSender`] and waits for the send to
//!    return,
//!
//! and only then takes the next sample.  Because the dispatcher owns both the
//! classifier and the sender outright, nothing else can observe or mutate the
//! gesture state, and no lock is needed.
//!
//! # Failure policy
//!
//! A failed send is logged, counted in [`DispatchStats::send_failures`], and
//! forgotten.  There is no retry and no buffering: for a live pointer, a
//! dropped delta is better than a late one.
//!
//! # Architecture
//!
//! The dispatcher depends only on traits (`DatagramSender`, `Clock`) and
//! domain types.  The UDP socket is injected at construction time, so the
//! whole pipeline is unit-testable with in-memory doubles.

use std::io;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use touchmouse_core::{encode_action, Action, GestureClassifier, GestureConfig, TouchSample};

use crate::application::event_queue::EventConsumer;
use crate::application::shutdown::ShutdownListener;

/// Fire-and-forget datagram output.
///
/// The infrastructure implementation is a connected UDP socket; tests use
/// recording doubles.
#[async_trait]
pub trait DatagramSender: Send + Sync {
    /// Sends `payload` as exactly one datagram.
    async fn send(&self, payload: &[u8]) -> io::Result<()>;
}

/// Source of "now" for tap timing.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Counters reported when the dispatcher stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Samples taken off the queue.
    pub samples: u64,
    /// Samples that produced no action (Begin, or strict-mode strays).
    pub silent: u64,
    pub clicks: u64,
    pub moves: u64,
    /// Datagrams whose send returned an error.
    pub send_failures: u64,
}

/// Owns the classifier and the transport for the lifetime of the relay.
pub struct Dispatcher {
    classifier: GestureClassifier,
    sender: Box<dyn DatagramSender>,
    clock: Box<dyn Clock>,
    stats: DispatchStats,
}

impl Dispatcher {
    /// Creates a dispatcher that times gestures with the system clock.
    pub fn new(config: GestureConfig, sender: Box<dyn DatagramSender>) -> Self {
        Self::with_clock(config, sender, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: GestureConfig,
        sender: Box<dyn DatagramSender>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            classifier: GestureClassifier::new(config),
            sender,
            clock,
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Runs one sample through classify → encode → send.
    ///
    /// Returns the action that was emitted, whether or not the send
    /// succeeded.
    pub async fn process(&mut self, sample: TouchSample) -> Option<Action> {
        self.stats.samples += 1;

        let Some(action) = self.classifier.classify(sample, self.clock.now()) else {
            self.stats.silent += 1;
            return None;
        };
        match action {
            Action::Click => self.stats.clicks += 1,
            Action::Move { .. } => self.stats.moves += 1,
        }

        let message = encode_action(&action);
        debug!(%message, "sending");
        if let Err(e) = self.sender.send(message.as_bytes()).await {
            self.stats.send_failures += 1;
            warn!("err sending data: {e}");
        }
        Some(action)
    }

    /// Drains `queue` until shutdown is requested or every producer is gone.
    ///
    /// Shutdown takes priority over pending samples: once it is observed the
    /// queue is closed, whatever is still queued is discarded, and blocked
    /// producers are released with `QueueError::Closed`.  The sender is
    /// dropped when this returns.
    pub async fn run(
        mut self,
        mut queue: EventConsumer,
        mut shutdown: ShutdownListener,
    ) -> DispatchStats {
        info!("dispatcher started");
        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    let discarded = queue.close();
                    info!(discarded, "shutdown requested; dispatcher stopping");
                    break;
                }
                next = queue.next() => match next {
                    Some(sample) => {
                        self.process(sample).await;
                    }
                    None => {
                        info!("all producers closed; dispatcher stopping");
                        break;
                    }
                },
            }
        }
        self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
