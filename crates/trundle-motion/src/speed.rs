//! Bounded channel speed and its inverted duty-cycle projection.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Duty value that removes all drive from a channel.
///
/// The output stage is active-low, so the full-scale duty means "off".
pub const ZERO_DRIVE_DUTY: u16 = u16::MAX;

/// Duty counts per speed step. `255 * 257 == 65535`, so the scale is exact.
const DUTY_PER_STEP: u16 = u16::MAX / Speed::MAX.0 as u16;

/// Requested duty-cycle magnitude for one channel, in `[0, 255]`.
///
/// The range is enforced by the representation: every constructor clamps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Speed(u8);

impl Speed {
    /// No drive.
    pub const ZERO: Speed = Speed(0);
    /// Full drive.
    pub const MAX: Speed = Speed(u8::MAX);

    /// Construct a speed from a raw `u8` value.
    pub const fn new(value: u8) -> Self {
        Speed(value)
    }

    /// Construct a speed from any requested magnitude, clamping into `[0, 255]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trundle_motion::Speed;
    ///
    /// assert_eq!(Speed::clamped(-10), Speed::ZERO);
    /// assert_eq!(Speed::clamped(1000), Speed::MAX);
    /// assert_eq!(Speed::clamped(42).value(), 42);
    /// ```
    pub fn clamped(requested: i64) -> Self {
        Speed(requested.clamp(0, u8::MAX as i64) as u8)
    }

    /// Returns the raw value.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the inverted 16-bit duty for this speed.
    ///
    /// `duty = 65535 - round(v * 65535 / 255)`, which is exactly
    /// `65535 - v * 257`. Speed 0 maps to [`ZERO_DRIVE_DUTY`], speed 255 to 0.
    pub const fn duty(self) -> u16 {
        ZERO_DRIVE_DUTY - self.0 as u16 * DUTY_PER_STEP
    }
}

impl From<u8> for Speed {
    fn from(value: u8) -> Self {
        Speed(value)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
