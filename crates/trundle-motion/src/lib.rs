#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library describing the motion state of a two-channel open-loop drive."]
#![doc = ""]
#![doc = "This crate provides the direction vocabulary, the bounded per-channel speed,"]
#![doc = "the rule that mirrors a requested speed across the two channels, and the"]
#![doc = "inverted 16-bit duty scaling used by the output stage."]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod speed;

pub use error::MotionError;
pub use speed::{Speed, ZERO_DRIVE_DUTY};

/// The direction vocabulary of the drive.
///
/// Every mode is valid data, but only some of them have a conduction path on
/// the present switching hardware (see [`DirectionMode::is_wired`]).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DirectionMode {
    /// Both channels driven forward.
    Forward,
    /// Both channels driven in reverse.
    Reverse,
    /// Rotate in place to the left.
    SpinLeft,
    /// Rotate in place to the right.
    SpinRight,
    /// Pivot backwards to the left.
    SpinBackLeft,
    /// Pivot backwards to the right.
    SpinBackRight,
    /// No conduction path selected.
    #[default]
    Stopped,
}

impl DirectionMode {
    /// Every mode, in the order the control surface lists them.
    pub const ALL: [DirectionMode; 7] = [
        DirectionMode::Forward,
        DirectionMode::Reverse,
        DirectionMode::SpinLeft,
        DirectionMode::SpinRight,
        DirectionMode::SpinBackLeft,
        DirectionMode::SpinBackRight,
        DirectionMode::Stopped,
    ];

    /// The URL path segment that selects this mode.
    pub const fn path_segment(self) -> &'static str {
        match self {
            DirectionMode::Forward => "forward",
            DirectionMode::Reverse => "reverse",
            DirectionMode::SpinLeft => "spinLeft",
            DirectionMode::SpinRight => "spinRight",
            DirectionMode::SpinBackLeft => "spinBackLeft",
            DirectionMode::SpinBackRight => "spinBackRight",
            DirectionMode::Stopped => "stop",
        }
    }

    /// Whether the switching hardware can select this mode.
    ///
    /// Only the left relay pair and the right forward line are fitted, which
    /// is enough for forward drive and for stopping.
    pub const fn is_wired(self) -> bool {
        matches!(self, DirectionMode::Forward | DirectionMode::Stopped)
    }

    /// Returns `self` when the switching hardware can select it.
    ///
    /// # Errors
    ///
    /// [`MotionError::UnsupportedDirection`] for modes without a conduction
    /// path.
    pub fn ensure_wired(self) -> Result<Self, MotionError> {
        if self.is_wired() {
            Ok(self)
        } else {
            Err(MotionError::UnsupportedDirection(self))
        }
    }
}

impl fmt::Display for DirectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Whether `mode` drives both channels with the same magnitude.
///
/// True for [`DirectionMode::Forward`] and [`DirectionMode::SpinLeft`]. Every
/// other mode drives the right channel at zero until a second relay pair is
/// fitted.
pub const fn direction_requires_symmetric_drive(mode: DirectionMode) -> bool {
    matches!(mode, DirectionMode::Forward | DirectionMode::SpinLeft)
}

/// Direction and per-channel speed of the drive.
///
/// `left` and `right` are `None` until a valid speed has been commanded, and
/// are always set or unset together. After every [`MotionState::apply_speed`]
/// the right channel equals the left one in symmetric modes and is zero in
/// every other mode. The rule is not re-applied when only the direction
/// changes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionState {
    direction: DirectionMode,
    left: Option<Speed>,
    right: Option<Speed>,
}

impl MotionState {
    /// The power-up state: stopped, no speed commanded.
    pub const fn new() -> Self {
        MotionState {
            direction: DirectionMode::Stopped,
            left: None,
            right: None,
        }
    }

    /// Returns the current direction.
    pub const fn direction(&self) -> DirectionMode {
        self.direction
    }

    /// Returns the left channel speed, `None` when unset.
    pub const fn left(&self) -> Option<Speed> {
        self.left
    }

    /// Returns the right channel speed, `None` when unset.
    pub const fn right(&self) -> Option<Speed> {
        self.right
    }

    /// Returns both channel speeds when a valid speed has been commanded.
    pub fn speeds(&self) -> Option<(Speed, Speed)> {
        let left = self.left?;
        Some((left, self.right.unwrap_or(Speed::ZERO)))
    }

    /// Record a new direction for the next speed update.
    ///
    /// This does not touch any output.
    pub fn set_direction(&mut self, mode: DirectionMode) {
        self.direction = mode;
    }

    /// Clamp `requested` into `[0, 255]` and split it across the channels.
    ///
    /// # Returns
    ///
    /// The new `(left, right)` pair.
    pub fn apply_speed(&mut self, requested: i64) -> (Speed, Speed) {
        let left = Speed::clamped(requested);
        let right = if direction_requires_symmetric_drive(self.direction) {
            left
        } else {
            Speed::ZERO
        };
        self.left = Some(left);
        self.right = Some(right);
        (left, right)
    }

    /// Forget the commanded speed on both channels.
    pub fn clear_speed(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// Command zero speed on both channels.
    pub fn zero_speed(&mut self) {
        self.left = Some(Speed::ZERO);
        self.right = Some(Speed::ZERO);
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.speeds() {
            Some((left, right)) => write!(
                f,
                "(direction: {}, left: {}, right: {})",
                self.direction, left, right
            ),
            None => write!(f, "(direction: {}, speed: unset)", self.direction),
        }
    }
}
