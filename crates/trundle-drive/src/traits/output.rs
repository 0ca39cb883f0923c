use std::time::Duration;

/// A single duty-cycle output, such as one PWM channel.
///
/// The value is written as-is on the full 16-bit scale. Writes are immediate
/// and cannot fail at this layer.
pub trait DutyOutput {
    /// Write a new 16-bit duty value.
    fn set_duty_u16(&mut self, duty: u16);

    /// Returns the last duty value written.
    fn duty_u16(&self) -> u16;
}

/// A single boolean output line, such as a relay or bridge enable.
pub trait DigitalOutput {
    /// Drive the line high (`true`) or low (`false`).
    fn set_level(&mut self, high: bool);

    /// Returns whether the line is currently driven high.
    fn is_set_high(&self) -> bool;
}

/// Blocks the calling flow while the output stage settles.
pub trait Settle {
    /// Block for `interval` before returning.
    fn settle(&mut self, interval: Duration);
}

/// The four direction-enable lines of a two-channel bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionLines {
    /// Left channel forward conduction path.
    pub left_forward: bool,
    /// Left channel reverse conduction path.
    pub left_reverse: bool,
    /// Right channel forward conduction path.
    pub right_forward: bool,
    /// Right channel reverse conduction path.
    pub right_reverse: bool,
}

impl DirectionLines {
    /// Every path de-energized.
    pub const CLEARED: DirectionLines = DirectionLines {
        left_forward: false,
        left_reverse: false,
        right_forward: false,
        right_reverse: false,
    };

    /// Forward conduction on both channels.
    pub const FORWARD: DirectionLines = DirectionLines {
        left_forward: true,
        left_reverse: false,
        right_forward: true,
        right_reverse: false,
    };

    /// Returns `true` when no path is selected.
    pub fn is_cleared(&self) -> bool {
        *self == Self::CLEARED
    }
}

/// Hardware-facing snapshot of the outputs.
///
/// Duty values use the inverted scale: 65535 is zero drive, 0 is full drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTarget {
    /// Left channel duty.
    pub left_duty: u16,
    /// Right channel duty.
    pub right_duty: u16,
    /// Direction-enable lines.
    pub lines: DirectionLines,
}
