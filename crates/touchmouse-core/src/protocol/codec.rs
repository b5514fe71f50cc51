//! Text codec for TouchMouse remote-control messages.
//!
//! Wire format (one message per datagram, ASCII, no header):
//! ```text
//! click
//! mouse: <dx>,<dy>
//! ```
//! `<dx>` and `<dy>` are base-10 signed integers without padding.  There is no
//! version byte, length prefix, sequence number or terminator: the datagram
//! boundary is the message boundary.

use std::fmt;
use std::io::Write;

use crate::domain::gesture::Action;

/// Payload of a [`Action::Click`] datagram.
pub const CLICK_MESSAGE: &[u8] = b"click";

/// Prefix of a [`Action::Move`] datagram, followed by `<dx>,<dy>`.
pub const MOUSE_PREFIX: &[u8] = b"mouse: ";

/// Longest possible payload: `"mouse: "` + two `i32::MIN` renderings + comma.
const MAX_MESSAGE_LEN: usize = 7 + 11 + 1 + 11;

/// An encoded datagram payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireMessage(Vec<u8>);

impl WireMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for WireMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The encoder only ever writes ASCII.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`Action`] into its datagram payload.
///
/// Encoding is infallible and deterministic: the same action always yields
/// byte-identical output.
///
/// # Examples
///
/// ```rust
/// use touchmouse_core::{encode_action, Action};
///
/// assert_eq!(encode_action(&Action::Click).as_bytes(), b"click");
/// assert_eq!(
///     encode_action(&Action::Move { dx: -8, dy: 12 }).as_bytes(),
///     b"mouse: -8,12"
/// );
/// ```
pub fn encode_action(action: &Action) -> WireMessage {
    let mut buf = Vec::with_capacity(MAX_MESSAGE_LEN);
    encode_into(&mut buf, action);
    WireMessage(buf)
}

/// Appends the encoding of `action` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, action: &Action) {
    match action {
        Action::Click => buf.extend_from_slice(CLICK_MESSAGE),
        Action::Move { dx, dy } => {
            buf.extend_from_slice(MOUSE_PREFIX);
            // Writing to a Vec<u8> cannot fail.
            let _ = write!(buf, "{dx},{dy}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
