//! Network infrastructure for the relay.
//!
//! # Sub-modules
//!
//! - **`transport`** – Resolves the listener address once at startup and
//!   sends each encoded action as one UDP datagram.  Outbound only.

pub mod transport;

pub use transport::{TransportError, UdpTransport};
