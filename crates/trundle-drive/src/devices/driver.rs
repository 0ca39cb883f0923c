use crate::traits::output::{DigitalOutput, DirectionLines, DutyOutput, OutputTarget, Settle};
use spin_sleep::SpinSleeper;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Shortest settling interval the interlock will ever wait.
pub const MIN_SETTLE_TIME: Duration = Duration::from_millis(250);

/// Duty value that removes all drive on the inverted output scale.
const ZERO_DRIVE_DUTY: u16 = u16::MAX;

/// One of the two drive channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Left => f.write_str("left"),
            Channel::Right => f.write_str("right"),
        }
    }
}

/// The physical outputs handed to an [`OutputDriver`].
pub struct DrivePins<P, L> {
    /// Duty output of the left channel.
    pub left_pwm: P,
    /// Duty output of the right channel.
    pub right_pwm: P,
    /// Left forward enable line.
    pub left_forward: L,
    /// Left reverse enable line.
    pub left_reverse: L,
    /// Right forward enable line.
    pub right_forward: L,
    /// Right reverse enable line.
    pub right_reverse: L,
}

/// Settling wait backed by a spin sleeper, accurate well below a millisecond.
pub struct SpinSettle {
    sleeper: SpinSleeper,
}

impl SpinSettle {
    /// Creates a sleeper that spins for the last 100 µs of each wait.
    pub fn new() -> Self {
        Self {
            sleeper: SpinSleeper::new(100_000),
        }
    }
}

impl Default for SpinSettle {
    fn default() -> Self {
        Self::new()
    }
}

impl Settle for SpinSettle {
    fn settle(&mut self, interval: Duration) {
        self.sleeper.sleep(interval);
    }
}

/// Owns the two duty outputs and the four direction lines of the drive.
///
/// Every method takes `&mut self`, so a multi-line update is never visible
/// half-applied to another reader of the outputs.
pub struct OutputDriver<P, L, S>
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    pins: DrivePins<P, L>,
    settle: S,
    settle_time: Duration,
}

impl<P, L, S> OutputDriver<P, L, S>
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    /// Take ownership of the outputs and put them in the neutral state.
    ///
    /// Both duties start at zero drive and every line starts low. The
    /// settling interval is raised to [`MIN_SETTLE_TIME`] if shorter.
    pub fn new(pins: DrivePins<P, L>, settle: S, settle_time: Duration) -> Self {
        let mut driver = Self {
            pins,
            settle,
            settle_time: settle_time.max(MIN_SETTLE_TIME),
        };
        driver.de_energize();
        driver
    }

    /// Returns the settling interval used by [`OutputDriver::momentary_stop`].
    pub fn settle_time(&self) -> Duration {
        self.settle_time
    }

    /// Write an inverted 16-bit duty value to one channel.
    pub fn set_duty(&mut self, channel: Channel, duty: u16) {
        debug!(%channel, duty, "set duty");
        match channel {
            Channel::Left => self.pins.left_pwm.set_duty_u16(duty),
            Channel::Right => self.pins.right_pwm.set_duty_u16(duty),
        }
    }

    /// Write all four direction-enable lines.
    ///
    /// Callers must run [`OutputDriver::momentary_stop`] first whenever the
    /// selected conduction path changes.
    pub fn set_direction_lines(&mut self, lines: DirectionLines) {
        debug!(?lines, "set direction lines");
        self.pins.left_forward.set_level(lines.left_forward);
        self.pins.left_reverse.set_level(lines.left_reverse);
        self.pins.right_forward.set_level(lines.right_forward);
        self.pins.right_reverse.set_level(lines.right_reverse);
    }

    /// Remove all drive, clear every direction line and wait for the bridge
    /// and any residual motion to settle.
    pub fn momentary_stop(&mut self) {
        self.de_energize();
        debug!(settle_ms = self.settle_time.as_millis() as u64, "settling");
        self.settle.settle(self.settle_time);
    }

    /// Read back the current hardware projection.
    pub fn output_target(&self) -> OutputTarget {
        OutputTarget {
            left_duty: self.pins.left_pwm.duty_u16(),
            right_duty: self.pins.right_pwm.duty_u16(),
            lines: DirectionLines {
                left_forward: self.pins.left_forward.is_set_high(),
                left_reverse: self.pins.left_reverse.is_set_high(),
                right_forward: self.pins.right_forward.is_set_high(),
                right_reverse: self.pins.right_reverse.is_set_high(),
            },
        }
    }

    /// Returns the settle backend, mostly useful to inspect a test double.
    pub fn settle_backend(&self) -> &S {
        &self.settle
    }

    fn de_energize(&mut self) {
        self.set_duty(Channel::Left, ZERO_DRIVE_DUTY);
        self.set_duty(Channel::Right, ZERO_DRIVE_DUTY);
        self.set_direction_lines(DirectionLines::CLEARED);
    }
}
