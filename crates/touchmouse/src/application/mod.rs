//! Application layer for the relay.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `touchmouse-core`) and the infrastructure
//! (sockets, stdin, config files).  It orchestrates domain objects and
//! depends on traits rather than concrete sockets, so every use case here can
//! be unit-tested with in-memory doubles.
//!
//! # Sub-modules
//!
//! - **`event_queue`** – The bounded FIFO between input producers and the
//!   dispatcher.  Full queue means the producer waits.
//!
//! - **`dispatch`** – The single consumer: classify → encode → send, one
//!   sample at a time, in arrival order.
//!
//! - **`shutdown`** – The signal that stops the dispatcher deterministically.

pub mod dispatch;
pub mod event_queue;
pub mod shutdown;
