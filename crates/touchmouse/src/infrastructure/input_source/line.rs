//! Text-line touch source.
//!
//! Reads one event per line in the form `<kind> <x> <y>`, where `kind` is
//! `begin`, `move`, `end` or `cancel` (any case) and the coordinates are
//! pixels.  Blank lines and lines starting with `#` are ignored.  A malformed
//! line is logged and skipped; it never stops the source.
//!
//! ```text
//! # a short drag
//! begin 100 200
//! move  112 196
//! end   112 196
//! ```
//!
//! Any touch driver that can print to a pipe can feed the relay this way.

use std::io::BufRead;

use thiserror::Error;
use tracing::{info, warn};

use super::{forward, Forwarded, InputError, RawTouchEvent, RawTouchKind, TouchSource};
use crate::application::event_queue::EventProducer;

/// Why a line could not be parsed.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    #[error("expected 3 fields, got {0}")]
    FieldCount(usize),
    #[error("unknown touch kind {0:?}")]
    UnknownKind(String),
    #[error("invalid coordinate {0:?}")]
    BadCoordinate(String),
}

/// Parses one input line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<RawTouchEvent>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [kind, x, y] = fields[..] else {
        return Err(LineError::FieldCount(fields.len()));
    };

    let kind = match kind.to_ascii_lowercase().as_str() {
        "begin" => RawTouchKind::Begin,
        "move" => RawTouchKind::Move,
        "end" => RawTouchKind::End,
        "cancel" => RawTouchKind::Cancel,
        _ => return Err(LineError::UnknownKind(kind.to_string())),
    };
    let coord = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| LineError::BadCoordinate(s.to_string()))
    };

    Ok(Some(RawTouchEvent::new(kind, coord(x)?, coord(y)?)))
}

/// A [`TouchSource`] reading events from any buffered reader (typically stdin).
pub struct LineTouchSource<R> {
    reader: R,
    pixels_per_pt: f32,
}

impl<R: BufRead + Send> LineTouchSource<R> {
    pub fn new(reader: R, pixels_per_pt: f32) -> Self {
        Self {
            reader,
            pixels_per_pt,
        }
    }
}

impl<R: BufRead + Send> TouchSource for LineTouchSource<R> {
    fn pump(&mut self, producer: &EventProducer) -> Result<usize, InputError> {
        let mut enqueued = 0;
        let mut line = String::new();
        let mut line_no = 0usize;

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                info!("end of touch input");
                return Ok(enqueued);
            }
            line_no += 1;

            let raw = match parse_line(&line) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("skipping touch input line {line_no}: {e}");
                    continue;
                }
            };

            match forward(producer, raw, self.pixels_per_pt) {
                Forwarded::Enqueued => enqueued += 1,
                Forwarded::Dropped => {}
                Forwarded::QueueClosed => {
                    info!("queue closed; no longer reading touch input");
                    return Ok(enqueued);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::event_queue;
    use std::io::Cursor;
    use touchmouse_core::TouchSample;

    #[test]
    fn test_parse_line_accepts_every_kind_in_any_case() {
        assert_eq!(
            parse_line("begin 1 2").unwrap(),
            Some(RawTouchEvent::new(RawTouchKind::Begin, 1.0, 2.0))
        );
        assert_eq!(
            parse_line("MOVE 1.5 -2").unwrap(),
            Some(RawTouchEvent::new(RawTouchKind::Move, 1.5, -2.0))
        );
        assert_eq!(
            parse_line("  End\t3 4  ").unwrap(),
            Some(RawTouchEvent::new(RawTouchKind::End, 3.0, 4.0))
        );
        assert_eq!(
            parse_line("cancel 0 0").unwrap(),
            Some(RawTouchEvent::new(RawTouchKind::Cancel, 0.0, 0.0))
        );
    }

    #[test]
    fn test_parse_line_ignores_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \n").unwrap(), None);
        assert_eq!(parse_line("# begin 1 2").unwrap(), None);
    }

    #[test]
    fn test_parse_line_rejects_malformed_input() {
        assert_eq!(parse_line("begin 1"), Err(LineError::FieldCount(2)));
        assert_eq!(parse_line("begin 1 2 3"), Err(LineError::FieldCount(4)));
        assert_eq!(
            parse_line("hover 1 2"),
            Err(LineError::UnknownKind("hover".to_string()))
        );
        assert_eq!(
            parse_line("move x 2"),
            Err(LineError::BadCoordinate("x".to_string()))
        );
    }

    #[test]
    fn test_line_source_enqueues_valid_lines_and_skips_bad_ones() {
        // Arrange
        let input = "# drag\nbegin 10 10\nwiggle 1 1\n\nmove 16 4\ncancel 16 4\n";
        let mut source = LineTouchSource::new(Cursor::new(input), 2.0);
        let (producer, mut consumer) = event_queue::bounded(8);

        // Act
        let count = source.pump(&producer).unwrap();
        drop(producer);

        // Assert
        assert_eq!(count, 3);
        tokio_test::block_on(async {
            assert_eq!(consumer.next().await, Some(TouchSample::begin(5, 5)));
            assert_eq!(consumer.next().await, Some(TouchSample::moved(8, 2)));
            assert_eq!(consumer.next().await, Some(TouchSample::end(8, 2)));
            assert_eq!(consumer.next().await, None);
        });
    }

    #[test]
    fn test_line_source_stops_when_queue_closes() {
        let mut source = LineTouchSource::new(Cursor::new("begin 1 1\nend 1 1\n"), 1.0);
        let (producer, consumer) = event_queue::bounded(8);
        drop(consumer);

        assert_eq!(source.pump(&producer).unwrap(), 0);
    }

    #[test]
    fn test_line_source_handles_missing_trailing_newline() {
        let mut source = LineTouchSource::new(Cursor::new("begin 1 1\nend 1 1"), 1.0);
        let (producer, _consumer) = event_queue::bounded(8);

        assert_eq!(source.pump(&producer).unwrap(), 2);
    }
}
