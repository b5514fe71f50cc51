//! Infrastructure layer for the relay.
//!
//! Contains OS-facing adapters: the UDP socket, touch input sources, and
//! file-system storage for the configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchmouse_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`input_source`** – Turns platform touch events (pixel coordinates,
//!   begin/move/end/cancel) into core `TouchSample`s and feeds the queue.
//!
//! - **`network`** – The connected UDP socket that implements
//!   `DatagramSender`.
//!
//! - **`storage`** – Reads the TOML configuration file.

pub mod input_source;
pub mod network;
pub mod storage;
