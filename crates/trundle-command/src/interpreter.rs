use crate::command::Command;
use std::fmt;
use tracing::{debug, warn};
use trundle_drive::{Channel, DigitalOutput, DirectionLines, DutyOutput, OutputDriver, Settle};
use trundle_motion::{DirectionMode, MotionError, MotionState, Speed};

/// The outcome of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The commanded speed was pushed to both channels.
    SpeedSet { left: Speed, right: Speed },
    /// No valid speed is commanded, so nothing was pushed.
    MissingSpeed,
    /// The command was not acted on; answer with the control surface.
    ControlSurface,
}

impl Reply {
    /// The plain-text answer, `None` for [`Reply::ControlSurface`].
    pub fn message(&self) -> Option<String> {
        match self {
            Reply::ControlSurface => None,
            _ => Some(self.to_string()),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::SpeedSet { left, right } => {
                write!(f, "Speed set to left: {}, right: {}", left, right)
            }
            Reply::MissingSpeed => f.write_str("Invalid or missing speed"),
            Reply::ControlSurface => f.write_str("control surface"),
        }
    }
}

/// Apply one command to the motion state and the outputs.
///
/// Speed, direction and stop commands end by pushing the commanded speed to
/// both channels again, so a direction change re-energizes the drive at the
/// previous speed. Only a direction command changes the recorded direction.
/// Unknown commands and unwired directions touch nothing.
pub fn execute<P, L, S>(
    command: &Command,
    state: &mut MotionState,
    driver: &mut OutputDriver<P, L, S>,
) -> Reply
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    match command {
        Command::Speed(Ok(requested)) => {
            let (left, right) = state.apply_speed(*requested);
            debug!(requested, %left, %right, "speed commanded");
        }
        Command::Speed(Err(e)) => {
            warn!(error = %e, "rejecting speed command");
            state.clear_speed();
        }
        Command::Direction(mode) => match mode.ensure_wired().and_then(conduction_path) {
            Ok(lines) => select_path(*mode, lines, state, driver),
            Err(e) => {
                warn!(error = %e, "direction ignored");
                return Reply::ControlSurface;
            }
        },
        // Stops remove drive but keep the selected direction.
        Command::Stop => driver.momentary_stop(),
        Command::EmergencyStop => {
            driver.momentary_stop();
            state.zero_speed();
        }
        Command::Unknown => return Reply::ControlSurface,
    }

    reassert_speed(state, driver)
}

/// Direction lines that select `mode`.
fn conduction_path(mode: DirectionMode) -> Result<DirectionLines, MotionError> {
    match mode {
        DirectionMode::Forward => Ok(DirectionLines::FORWARD),
        DirectionMode::Stopped => Ok(DirectionLines::CLEARED),
        // TODO: wire reverse and the spin modes once the right relay pair is fitted.
        DirectionMode::Reverse
        | DirectionMode::SpinLeft
        | DirectionMode::SpinRight
        | DirectionMode::SpinBackLeft
        | DirectionMode::SpinBackRight => Err(MotionError::UnsupportedDirection(mode)),
    }
}

/// Interlock first, then the new lines, then the recorded direction.
fn select_path<P, L, S>(
    mode: DirectionMode,
    lines: DirectionLines,
    state: &mut MotionState,
    driver: &mut OutputDriver<P, L, S>,
) where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    driver.momentary_stop();
    if !lines.is_cleared() {
        driver.set_direction_lines(lines);
    }
    state.set_direction(mode);
    debug!(direction = %mode, "direction selected");
}

fn reassert_speed<P, L, S>(state: &MotionState, driver: &mut OutputDriver<P, L, S>) -> Reply
where
    P: DutyOutput,
    L: DigitalOutput,
    S: Settle,
{
    match state.speeds() {
        Some((left, right)) => {
            debug!(%left, %right, "setting speed");
            driver.set_duty(Channel::Left, left.duty());
            driver.set_duty(Channel::Right, right.duty());
            Reply::SpeedSet { left, right }
        }
        None => Reply::MissingSpeed,
    }
}
