//! Scripted input source for testing.
//!
//! Replays a fixed list of [`RawTouchEvent`]s without any touch hardware, so
//! tests can drive the queue and dispatcher with exact gestures.

use std::collections::VecDeque;

use tracing::info;

use super::{forward, Forwarded, InputError, RawTouchEvent, RawTouchKind, TouchSource};
use crate::application::event_queue::EventProducer;

/// A [`TouchSource`] that replays a pre-recorded script.
#[derive(Debug, Clone)]
pub struct ScriptedTouchSource {
    script: VecDeque<RawTouchEvent>,
    pixels_per_pt: f32,
}

impl ScriptedTouchSource {
    /// Creates a source that replays `events` at a scale of one pixel per point.
    pub fn new(events: impl IntoIterator<Item = RawTouchEvent>) -> Self {
        Self {
            script: events.into_iter().collect(),
            pixels_per_pt: 1.0,
        }
    }

    /// Sets the pixel density used to normalise the script.
    pub fn with_pixels_per_pt(mut self, pixels_per_pt: f32) -> Self {
        self.pixels_per_pt = pixels_per_pt;
        self
    }

    /// Appends a full tap (begin then end) at one point.
    pub fn tap(mut self, x_px: f32, y_px: f32) -> Self {
        self.script
            .push_back(RawTouchEvent::new(RawTouchKind::Begin, x_px, y_px));
        self.script
            .push_back(RawTouchEvent::new(RawTouchKind::End, x_px, y_px));
        self
    }

    /// Events not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TouchSource for ScriptedTouchSource {
    fn pump(&mut self, producer: &EventProducer) -> Result<usize, InputError> {
        let mut enqueued = 0;
        while let Some(raw) = self.script.pop_front() {
            match forward(producer, raw, self.pixels_per_pt) {
                Forwarded::Enqueued => enqueued += 1,
                Forwarded::Dropped => {}
                Forwarded::QueueClosed => {
                    info!("queue closed; {} scripted events left", self.script.len());
                    break;
                }
            }
        }
        Ok(enqueued)
    }
}
