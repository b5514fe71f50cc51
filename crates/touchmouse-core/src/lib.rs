//! # touchmouse-core
//!
//! Shared library for TouchMouse containing the gesture classifier and the
//! wire protocol codec.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! TouchMouse turns a touch surface into a remote touchpad: taps become mouse
//! clicks and drags become relative pointer motion on another machine, sent as
//! tiny text datagrams.
//!
//! This crate (`touchmouse-core`) is the pure part of that pipeline:
//!
//! - **`domain`** – The tap-vs-drag state machine.  It consumes one
//!   [`TouchSample`] at a time and emits zero or one [`Action`].
//!
//! - **`protocol`** – How an [`Action`] looks on the wire: `click` or
//!   `mouse: <dx>,<dy>`, one message per datagram.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `touchmouse_core::GestureClassifier` instead of the full module path.
pub use domain::gesture::{
    Action, GestureClassifier, GestureConfig, GestureState, TouchPhase, TouchSample,
};
pub use protocol::codec::{encode_action, WireMessage};
