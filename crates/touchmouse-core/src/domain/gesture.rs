//! Tap-vs-drag gesture classification.
//!
//! A [`GestureClassifier`] consumes [`TouchSample`]s one at a time and turns
//! each into zero or one [`Action`]:
//!
//! - **Begin** arms the classifier: the anchor is reset to the touch position
//!   and the press time is recorded.  Nothing is emitted.
//! - **Move** emits the scaled delta from the anchor to the new position and
//!   advances the anchor.
//! - **End** emits a [`Action::Click`] if the press was shorter than the tap
//!   threshold.  Otherwise the release counts as one last move.
//!
//! # Why relative deltas? (for beginners)
//!
//! The remote machine does not know the size of the touch surface, so absolute
//! coordinates are meaningless to it.  Sending "move by (dx, dy)" behaves like
//! a laptop touchpad: lifting the finger and putting it down somewhere else
//! does not make the remote cursor jump.
//!
//! # Time
//!
//! [`GestureClassifier::classify`] takes the current [`Instant`] as a
//! parameter rather than reading the clock itself.  The dispatcher passes
//! `Instant::now()`; tests pass synthetic instants so that "the finger was
//! held for 1.5 seconds" does not require sleeping for 1.5 seconds.

use std::time::{Duration, Instant};

use tracing::trace;

/// Presses shorter than this are reported as a click.
pub const DEFAULT_TAP_THRESHOLD: Duration = Duration::from_secs(1);

/// Integer scale applied to both axes of every delta.
pub const DEFAULT_VELOCITY_FACTOR: i32 = 4;

/// The phase of a touch sample within a gesture.
///
/// Platform "cancel" events have no phase of their own; the input side maps
/// them to [`TouchPhase::End`] before they reach the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The finger touched the surface.
    Begin,
    /// The finger moved while touching the surface.
    Move,
    /// The finger left the surface.
    End,
}

/// One touch sample in surface-local logical points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchSample {
    pub x: i32,
    pub y: i32,
    pub phase: TouchPhase,
}

impl TouchSample {
    /// Creates a sample with an explicit phase.
    pub const fn new(x: i32, y: i32, phase: TouchPhase) -> Self {
        Self { x, y, phase }
    }

    /// Shorthand for a [`TouchPhase::Begin`] sample.
    pub const fn begin(x: i32, y: i32) -> Self {
        Self::new(x, y, TouchPhase::Begin)
    }

    /// Shorthand for a [`TouchPhase::Move`] sample.
    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(x, y, TouchPhase::Move)
    }

    /// Shorthand for a [`TouchPhase::End`] sample.
    pub const fn end(x: i32, y: i32) -> Self {
        Self::new(x, y, TouchPhase::End)
    }
}

/// What the remote side should do in response to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Press and release the primary button.
    Click,
    /// Move the pointer by a relative, already-scaled amount.
    Move { dx: i32, dy: i32 },
}

/// Tunables for [`GestureClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// A Begin→End pair strictly shorter than this is a tap.
    pub tap_threshold: Duration,
    /// Multiplier applied to both axes of every delta.
    pub velocity_factor: i32,
    /// When `true`, Move/End samples with no active gesture emit nothing
    /// instead of producing a delta against the stale anchor.
    pub strict_phases: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_threshold: DEFAULT_TAP_THRESHOLD,
            velocity_factor: DEFAULT_VELOCITY_FACTOR,
            strict_phases: false,
        }
    }
}

/// The classifier's mutable state.
///
/// Only [`GestureClassifier`] can change it; everyone else gets a read-only
/// view through [`GestureClassifier::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureState {
    anchor_x: i32,
    anchor_y: i32,
    /// `Some` exactly while a gesture is active.
    began_at: Option<Instant>,
}

impl GestureState {
    /// The baseline for the next delta.
    pub fn anchor(&self) -> (i32, i32) {
        (self.anchor_x, self.anchor_y)
    }

    /// Whether a Begin has been seen without its matching End.
    pub fn is_active(&self) -> bool {
        self.began_at.is_some()
    }

    /// When the active gesture began, if there is one.
    pub fn began_at(&self) -> Option<Instant> {
        self.began_at
    }
}

/// Stateful tap-vs-drag classifier.
///
/// Owned by exactly one dispatcher; `classify` takes `&mut self`, so the
/// borrow checker enforces the single-writer rule.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: GestureState,
}

impl GestureClassifier {
    /// Creates an idle classifier with its anchor at the origin.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Classifies one sample observed at `now`.
    ///
    /// Returns `None` for Begin samples (and, in strict mode, for Move/End
    /// samples outside a gesture).
    pub fn classify(&mut self, sample: TouchSample, now: Instant) -> Option<Action> {
        match sample.phase {
            TouchPhase::Begin => {
                self.state.anchor_x = sample.x;
                self.state.anchor_y = sample.y;
                self.state.began_at = Some(now);
                trace!(x = sample.x, y = sample.y, "gesture began");
                None
            }
            TouchPhase::End => match self.state.began_at.take() {
                Some(began) if now.saturating_duration_since(began) < self.config.tap_threshold => {
                    trace!("gesture ended as tap");
                    Some(Action::Click)
                }
                Some(_) => {
                    trace!("gesture ended as drag");
                    Some(self.track(sample))
                }
                None => self.untracked(sample),
            },
            TouchPhase::Move => {
                if self.state.is_active() {
                    Some(self.track(sample))
                } else {
                    self.untracked(sample)
                }
            }
        }
    }

    /// Convenience wrapper around [`classify`](Self::classify) using the
    /// current time.
    pub fn classify_now(&mut self, sample: TouchSample) -> Option<Action> {
        self.classify(sample, Instant::now())
    }

    /// Handles a Move/End that arrived with no active gesture.
    fn untracked(&mut self, sample: TouchSample) -> Option<Action> {
        if self.config.strict_phases {
            trace!(phase = ?sample.phase, "no active gesture; sample suppressed");
            return None;
        }
        Some(self.track(sample))
    }

    /// Emits the scaled delta from the anchor and advances the anchor.
    fn track(&mut self, sample: TouchSample) -> Action {
        let factor = self.config.velocity_factor;
        let dx = sample.x.saturating_sub(self.state.anchor_x).saturating_mul(factor);
        let dy = sample.y.saturating_sub(self.state.anchor_y).saturating_mul(factor);
        self.state.anchor_x = sample.x;
        self.state.anchor_y = sample.y;
        Action::Move { dx, dy }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
