//! touchmouse library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touchmouse do? (for beginners)
//!
//! The relay sits between a touch surface and a remote machine:
//!
//! 1. An input source (a thread reading touch events) pushes
//!    [`touchmouse_core::TouchSample`]s into a bounded queue.
//! 2. A single dispatcher task pops them in order, classifies each one as a
//!    tap or part of a drag, and encodes the result as `click` or
//!    `mouse: dx,dy`.
//! 3. The encoded message is sent as one UDP datagram to the listener.  If
//!    the send fails, the message is dropped and the next one is processed.

/// Application layer: event queue, dispatcher, shutdown signal.
pub mod application;

/// Infrastructure layer: UDP transport, input sources, configuration storage.
pub mod infrastructure;
