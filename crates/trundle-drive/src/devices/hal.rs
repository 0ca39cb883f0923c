//! Adapters from `embedded-hal` 1.0 peripherals to the drive output traits.
//!
//! These adapters are for board builds: the board crate configures its PWM
//! slices (including the carrier frequency) and GPIO, wraps them here and
//! hands them to [`OutputDriver`](crate::OutputDriver). The host binary drives
//! [`sim`](crate::devices::sim) outputs instead.
//!
//! Peripheral errors are logged and dropped: the output driver treats writes
//! as infallible, and a failed write leaves the previous level cached.

use crate::traits::output::{DigitalOutput, DutyOutput};
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use tracing::warn;

/// Wraps a PWM channel, rescaling the 16-bit duty to the channel's range.
pub struct HalPwm<T: SetDutyCycle> {
    inner: T,
    duty: u16,
}

impl<T: SetDutyCycle> HalPwm<T> {
    /// Wraps `inner`; the cached duty starts at zero.
    pub fn new(inner: T) -> Self {
        Self { inner, duty: 0 }
    }

    /// Returns the wrapped channel.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Rescale a full-range 16-bit duty to `0..=max`.
fn rescale(duty: u16, max: u16) -> u16 {
    ((duty as u32 * max as u32) / u16::MAX as u32) as u16
}

impl<T: SetDutyCycle> DutyOutput for HalPwm<T> {
    fn set_duty_u16(&mut self, duty: u16) {
        let scaled = rescale(duty, self.inner.max_duty_cycle());
        match self.inner.set_duty_cycle(scaled) {
            Ok(()) => self.duty = duty,
            Err(e) => warn!(error = ?e, duty, "pwm write failed"),
        }
    }

    fn duty_u16(&self) -> u16 {
        self.duty
    }
}

/// Wraps an output pin and caches the level last written to it.
pub struct HalPin<T: OutputPin> {
    inner: T,
    high: bool,
}

impl<T: OutputPin> HalPin<T> {
    /// Wraps `inner`; the cached level starts low.
    pub fn new(inner: T) -> Self {
        Self { inner, high: false }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: OutputPin> DigitalOutput for HalPin<T> {
    fn set_level(&mut self, high: bool) {
        let result = if high {
            self.inner.set_high()
        } else {
            self.inner.set_low()
        };
        match result {
            Ok(()) => self.high = high,
            Err(e) => warn!(error = ?e, high, "line write failed"),
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as DigitalErrorType;
    use embedded_hal::pwm::ErrorType as PwmErrorType;

    struct MockPwmChannel {
        duty_cycle: u16,
        max_duty_cycle: u16,
    }

    impl PwmErrorType for MockPwmChannel {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwmChannel {
        fn max_duty_cycle(&self) -> u16 {
            self.max_duty_cycle
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            assert!(duty <= self.max_duty_cycle);
            self.duty_cycle = duty;
            Ok(())
        }
    }

    struct MockPin {
        high: bool,
    }

    impl DigitalErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(0, 1000), 0);
        assert_eq!(rescale(u16::MAX, 1000), 1000);
        assert_eq!(rescale(u16::MAX / 2, 1000), 499);
        assert_eq!(rescale(12345, u16::MAX), 12345);
    }

    #[test]
    fn test_hal_pwm_scales_to_channel_range() {
        let mut pwm = HalPwm::new(MockPwmChannel {
            duty_cycle: 0,
            max_duty_cycle: 1000,
        });
        pwm.set_duty_u16(u16::MAX);
        assert_eq!(pwm.duty_u16(), u16::MAX);
        assert_eq!(pwm.into_inner().duty_cycle, 1000);
    }

    #[test]
    fn test_hal_pin_tracks_level() {
        let mut pin = HalPin::new(MockPin { high: false });
        pin.set_level(true);
        assert!(pin.is_set_high());
        pin.set_level(false);
        assert!(!pin.is_set_high());
        assert!(!pin.into_inner().high);
    }
}
