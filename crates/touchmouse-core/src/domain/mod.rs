//! Domain entities for TouchMouse.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application is called the **domain**.  Domain
//! code holds the core rules of the system, imports nothing from OS APIs or
//! network libraries, and can be tested on any platform without setup.
//!
//! Here the core rule is how a stream of touch samples becomes clicks and
//! pointer deltas.  The dispatcher (application layer) and the UDP socket
//! (infrastructure layer) depend on it, never the other way round.

/// Tap-vs-drag gesture classification.
///
/// See [`gesture::GestureClassifier`] for the main type.
pub mod gesture;
