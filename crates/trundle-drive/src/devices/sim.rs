//! Simulated outputs for host builds and tests.
//!
//! Each output remembers its level and traces every change, so a host build
//! of the endpoint shows exactly what a board would have been told to do.

use crate::devices::driver::DrivePins;
use crate::traits::output::{DigitalOutput, DutyOutput, Settle};
use std::time::Duration;
use tracing::trace;

/// PWM carrier frequency of the stock motor driver board.
pub const DEFAULT_PWM_FREQUENCY_HZ: u32 = 200;

/// A simulated PWM channel running at a fixed carrier frequency.
#[derive(Debug, Clone)]
pub struct SimPwm {
    label: String,
    frequency_hz: u32,
    duty: u16,
}

impl SimPwm {
    /// Creates a channel at `frequency_hz` with a duty of zero.
    pub fn new(label: impl Into<String>, frequency_hz: u32) -> Self {
        Self {
            label: label.into(),
            frequency_hz,
            duty: 0,
        }
    }

    /// Returns the pin label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the carrier frequency in hertz.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }
}

impl DutyOutput for SimPwm {
    fn set_duty_u16(&mut self, duty: u16) {
        if self.duty != duty {
            trace!(
                pin = %self.label,
                freq_hz = self.frequency_hz,
                from = self.duty,
                to = duty,
                "pwm duty"
            );
        }
        self.duty = duty;
    }

    fn duty_u16(&self) -> u16 {
        self.duty
    }
}

/// A simulated digital output line.
#[derive(Debug, Clone)]
pub struct SimPin {
    label: String,
    high: bool,
}

impl SimPin {
    /// Creates a line that starts low.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            high: false,
        }
    }

    /// Returns the pin label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl DigitalOutput for SimPin {
    fn set_level(&mut self, high: bool) {
        if self.high != high {
            trace!(pin = %self.label, high, "line level");
        }
        self.high = high;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Settle backend that records each requested interval and returns at once.
#[derive(Debug, Clone, Default)]
pub struct InstantSettle {
    intervals: Vec<Duration>,
}

impl InstantSettle {
    /// Every interval requested so far, oldest first.
    pub fn intervals(&self) -> &[Duration] {
        &self.intervals
    }
}

impl Settle for InstantSettle {
    fn settle(&mut self, interval: Duration) {
        self.intervals.push(interval);
    }
}

/// Simulated outputs labelled with a conventional GPIO layout.
pub fn sim_pins() -> DrivePins<SimPwm, SimPin> {
    DrivePins {
        left_pwm: SimPwm::new("GP14", DEFAULT_PWM_FREQUENCY_HZ),
        right_pwm: SimPwm::new("GP15", DEFAULT_PWM_FREQUENCY_HZ),
        left_forward: SimPin::new("GP10"),
        left_reverse: SimPin::new("GP11"),
        right_forward: SimPin::new("GP12"),
        right_reverse: SimPin::new("GP13"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_pwm_remembers_duty() {
        let mut pwm = SimPwm::new("GP14", 1_000);
        assert_eq!(pwm.duty_u16(), 0);
        pwm.set_duty_u16(40_000);
        assert_eq!(pwm.duty_u16(), 40_000);
        assert_eq!(pwm.label(), "GP14");
        assert_eq!(pwm.frequency_hz(), 1_000);
    }

    #[test]
    fn test_sim_pins_use_default_frequency() {
        let pins = sim_pins();
        assert_eq!(pins.left_pwm.frequency_hz(), DEFAULT_PWM_FREQUENCY_HZ);
        assert_eq!(pins.right_pwm.frequency_hz(), DEFAULT_PWM_FREQUENCY_HZ);
    }

    #[test]
    fn test_sim_pin_levels() {
        let mut pin = SimPin::new("GP10");
        assert!(!pin.is_set_high());
        pin.set_level(true);
        assert!(pin.is_set_high());
        pin.set_level(false);
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_instant_settle_records() {
        let mut settle = InstantSettle::default();
        settle.settle(Duration::from_millis(250));
        settle.settle(Duration::from_millis(300));
        assert_eq!(
            settle.intervals(),
            &[Duration::from_millis(250), Duration::from_millis(300)]
        );
    }
}
