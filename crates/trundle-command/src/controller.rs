use crate::command::Command;
use crate::interpreter::{Reply, execute};
use tracing::{debug, info, info_span};
use trundle_drive::{DigitalOutput, DutyOutput, OutputDriver, OutputTarget, Settle};
use trundle_motion::MotionState;

/// The motion state and the outputs it drives, handled as one unit.
pub struct DriveController<P, L, S>
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    state: MotionState,
    driver: OutputDriver<P, L, S>,
}

impl<P, L, S> DriveController<P, L, S>
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    /// Start from the power-up motion state.
    pub fn new(driver: OutputDriver<P, L, S>) -> Self {
        Self {
            state: MotionState::new(),
            driver,
        }
    }

    /// Parse and apply one command.
    pub fn handle(&mut self, text: &str) -> Reply {
        let command = Command::parse(text);
        let _span = info_span!("command", %command).entered();
        let reply = execute(&command, &mut self.state, &mut self.driver);
        debug!(state = %self.state, ?reply, "command applied");
        reply
    }

    /// Remove all drive, keeping the commanded direction and speed.
    pub fn park(&mut self) {
        info!(state = %self.state, "parking outputs");
        self.driver.momentary_stop();
    }

    /// Returns the current motion state.
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Returns what the outputs were last told to do.
    pub fn output_target(&self) -> OutputTarget {
        self.driver.output_target()
    }

    /// Returns the output driver.
    pub fn driver(&self) -> &OutputDriver<P, L, S> {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trundle_drive::devices::sim::{InstantSettle, SimPin, SimPwm, sim_pins};
    use trundle_drive::{DirectionLines, MIN_SETTLE_TIME};
    use trundle_motion::{DirectionMode, Speed};

    fn controller() -> DriveController<SimPwm, SimPin, InstantSettle> {
        DriveController::new(OutputDriver::new(
            sim_pins(),
            InstantSettle::default(),
            MIN_SETTLE_TIME,
        ))
    }

    #[test]
    fn test_handle_sequence() {
        let mut controller = controller();
        assert_eq!(controller.handle("/forward/"), Reply::MissingSpeed);
        assert_eq!(
            controller.handle("/speed/200"),
            Reply::SpeedSet {
                left: Speed::new(200),
                right: Speed::new(200)
            }
        );
        assert_eq!(controller.state().direction(), DirectionMode::Forward);
        assert_eq!(controller.output_target().lines, DirectionLines::FORWARD);
        assert_eq!(controller.handle("/nothing"), Reply::ControlSurface);
    }

    #[test]
    fn test_park() {
        let mut controller = controller();
        controller.handle("/forward/");
        controller.handle("/speed/90");
        controller.park();

        let target = controller.output_target();
        assert_eq!(target.left_duty, u16::MAX);
        assert_eq!(target.right_duty, u16::MAX);
        assert!(target.lines.is_cleared());
        assert_eq!(controller.state().direction(), DirectionMode::Forward);
        assert_eq!(controller.state().left(), Some(Speed::new(90)));
        assert_eq!(controller.driver().settle_backend().intervals().len(), 2);
    }
}
