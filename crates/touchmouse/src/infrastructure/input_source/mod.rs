//! Touch input sources for the relay.
//!
//! Platform touch APIs report positions in physical pixels and know more
//! phases than the core does (a gesture may be *cancelled* by the system).
//! This module is the boundary where such events become core
//! [`TouchSample`]s:
//!
//! - pixel coordinates are divided by the surface's pixels-per-point and
//!   truncated to whole logical points,
//! - `Cancel` is mapped to `End`, so the classifier always sees a release,
//! - non-finite coordinates are dropped.
//!
//! A [`TouchSource`] runs on its own OS thread (see [`spawn_source`]) and
//! pushes samples with the blocking [`EventProducer::enqueue`], so a full
//! queue stalls the source instead of losing a Begin or End.
//!
//! # Testability
//!
//! [`mock::ScriptedTouchSource`] replays a fixed list of events, which lets
//! tests drive the whole pipeline without a real touch device.

use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info};
use touchmouse_core::{TouchPhase, TouchSample};

use crate::application::event_queue::{EventProducer, QueueError};

pub mod line;
pub mod mock;

pub use line::LineTouchSource;

/// Touch phases as reported by a platform, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTouchKind {
    Begin,
    Move,
    End,
    /// The system aborted the gesture (palm rejection, incoming call, ...).
    Cancel,
}

/// A touch event in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouchEvent {
    pub x_px: f32,
    pub y_px: f32,
    pub kind: RawTouchKind,
}

impl RawTouchEvent {
    pub fn new(kind: RawTouchKind, x_px: f32, y_px: f32) -> Self {
        Self { x_px, y_px, kind }
    }
}

/// Error type for input source operations.
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading from the underlying device or stream failed.
    #[error("input read error: {0}")]
    Io(#[from] std::io::Error),
    /// The input thread could not be started.
    #[error("failed to spawn input thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Something that produces touch events and pushes them into the queue.
pub trait TouchSource: Send {
    /// Feeds `producer` until the source is exhausted or the queue closes.
    ///
    /// Returns the number of samples enqueued.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] if the source itself fails.
    fn pump(&mut self, producer: &EventProducer) -> Result<usize, InputError>;
}

/// What happened to one raw event handed to [`forward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarded {
    Enqueued,
    /// The event could not be normalised and was skipped.
    Dropped,
    /// The dispatcher has shut down; the source should stop.
    QueueClosed,
}

/// Converts a raw event into a core sample.
///
/// Returns `None` if `pixels_per_pt` is not a positive finite number or a
/// coordinate is not finite.  Out-of-range values saturate at the `i32`
/// bounds.
pub fn normalize(raw: RawTouchEvent, pixels_per_pt: f32) -> Option<TouchSample> {
    if !(pixels_per_pt.is_finite() && pixels_per_pt > 0.0) {
        return None;
    }
    if !(raw.x_px.is_finite() && raw.y_px.is_finite()) {
        return None;
    }
    let phase = match raw.kind {
        RawTouchKind::Begin => TouchPhase::Begin,
        RawTouchKind::Move => TouchPhase::Move,
        RawTouchKind::End | RawTouchKind::Cancel => TouchPhase::End,
    };
    // `as` truncates toward zero and saturates.
    Some(TouchSample::new(
        (raw.x_px / pixels_per_pt) as i32,
        (raw.y_px / pixels_per_pt) as i32,
        phase,
    ))
}

/// Normalises `raw` and enqueues it, blocking while the queue is full.
pub fn forward(producer: &EventProducer, raw: RawTouchEvent, pixels_per_pt: f32) -> Forwarded {
    let Some(sample) = normalize(raw, pixels_per_pt) else {
        debug!(?raw, "dropping touch event that cannot be normalised");
        return Forwarded::Dropped;
    };
    match producer.enqueue(sample) {
        Ok(()) => Forwarded::Enqueued,
        Err(QueueError::Closed) | Err(QueueError::Full { .. }) => Forwarded::QueueClosed,
    }
}

/// Runs `source` on a dedicated thread named `touchmouse-input`.
///
/// The producer is dropped when the source finishes, which lets the
/// dispatcher stop once the queue is drained.
///
/// # Errors
///
/// Returns [`InputError::Spawn`] if the OS refuses to create the thread.
pub fn spawn_source<S>(
    mut source: S,
    producer: EventProducer,
) -> Result<JoinHandle<Result<usize, InputError>>, InputError>
where
    S: TouchSource + 'static,
{
    thread::Builder::new()
        .name("touchmouse-input".to_string())
        .spawn(move || {
            let result = source.pump(&producer);
            match &result {
                Ok(count) => info!("input source finished after {count} samples"),
                Err(e) => info!("input source stopped: {e}"),
            }
            result
        })
        .map_err(InputError::Spawn)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::event_queue;

    #[test]
    fn test_normalize_divides_by_pixels_per_point() {
        // Arrange
        let raw = RawTouchEvent::new(RawTouchKind::Move, 301.0, 99.9);

        // Act
        let sample = normalize(raw, 3.0).unwrap();

        // Assert – 100.33 → 100, 33.3 → 33
        assert_eq!(sample, TouchSample::moved(100, 33));
    }

    #[test]
    fn test_normalize_truncates_toward_zero_for_negative_values() {
        let raw = RawTouchEvent::new(RawTouchKind::Begin, -5.9, -0.5);
        assert_eq!(normalize(raw, 1.0), Some(TouchSample::begin(-5, 0)));
    }

    #[test]
    fn test_cancel_maps_to_end() {
        let raw = RawTouchEvent::new(RawTouchKind::Cancel, 10.0, 20.0);
        assert_eq!(normalize(raw, 1.0), Some(TouchSample::end(10, 20)));
    }

    #[test]
    fn test_normalize_rejects_bad_scale_and_non_finite_coordinates() {
        let ok = RawTouchEvent::new(RawTouchKind::Move, 1.0, 1.0);
        assert_eq!(normalize(ok, 0.0), None);
        assert_eq!(normalize(ok, -2.0), None);
        assert_eq!(normalize(ok, f32::NAN), None);

        let nan = RawTouchEvent::new(RawTouchKind::Move, f32::NAN, 1.0);
        let inf = RawTouchEvent::new(RawTouchKind::Move, 1.0, f32::INFINITY);
        assert_eq!(normalize(nan, 1.0), None);
        assert_eq!(normalize(inf, 1.0), None);
    }

    #[test]
    fn test_normalize_saturates_huge_values() {
        let raw = RawTouchEvent::new(RawTouchKind::Move, 1.0e20, -1.0e20);
        assert_eq!(normalize(raw, 1.0), Some(TouchSample::moved(i32::MAX, i32::MIN)));
    }

    #[test]
    fn test_forward_reports_each_outcome() {
        // Arrange
        let (producer, consumer) = event_queue::bounded(4);
        let good = RawTouchEvent::new(RawTouchKind::Begin, 2.0, 2.0);
        let bad = RawTouchEvent::new(RawTouchKind::Move, f32::NAN, 0.0);

        // Act / Assert
        assert_eq!(forward(&producer, good, 1.0), Forwarded::Enqueued);
        assert_eq!(forward(&producer, bad, 1.0), Forwarded::Dropped);
        drop(consumer);
        assert_eq!(forward(&producer, good, 1.0), Forwarded::QueueClosed);
    }

    #[test]
    fn test_spawn_source_runs_on_named_thread_and_drops_producer() {
        // Arrange
        struct NameProbe;
        impl TouchSource for NameProbe {
            fn pump(&mut self, producer: &EventProducer) -> Result<usize, InputError> {
                assert_eq!(thread::current().name(), Some("touchmouse-input"));
                producer.enqueue(TouchSample::begin(0, 0)).unwrap();
                Ok(1)
            }
        }
        let (producer, mut consumer) = event_queue::bounded(4);

        // Act
        let handle = spawn_source(NameProbe, producer).unwrap();
        let count = handle.join().unwrap().unwrap();

        // Assert
        assert_eq!(count, 1);
        let drained = tokio_test::block_on(async {
            let mut n = 0;
            while consumer.next().await.is_some() {
                n += 1;
            }
            n
        });
        assert_eq!(drained, 1, "queue must close after the source thread ends");
    }
}
