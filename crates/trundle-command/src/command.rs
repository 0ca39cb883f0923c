use std::fmt;
use std::num::IntErrorKind;
use trundle_motion::DirectionMode;

const SPEED: &str = "/speed/";
const FORWARD: &str = "/forward/";
const STOP: &str = "/stop/";
const EMERGENCY_STOP: &str = "/emergencystop/";

/// Why a speed command carried no usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedTokenError {
    /// Nothing follows `/speed/`.
    Missing,
    /// The token after `/speed/` is not an integer.
    NotANumber(String),
}

impl fmt::Display for SpeedTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedTokenError::Missing => write!(f, "Missing speed value"),
            SpeedTokenError::NotANumber(token) => write!(f, "Speed is not a number: {:?}", token),
        }
    }
}

impl std::error::Error for SpeedTokenError {}

/// One parsed inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set and apply a speed. Out-of-range values are kept as requested and
    /// clamped when applied.
    Speed(Result<i64, SpeedTokenError>),
    /// Select a conduction path.
    Direction(DirectionMode),
    /// Interlock only, the commanded speed is kept.
    Stop,
    /// Interlock and zero speed.
    EmergencyStop,
    /// Anything else.
    Unknown,
}

impl Command {
    /// Parse a path-like command.
    ///
    /// Patterns are searched anywhere in `text` and the first match wins, in
    /// this order: `/speed/`, `/forward/`, `/stop/`, `/emergencystop/`, then
    /// the advertised but unwired directions (`/reverse/`, `/spinLeft/`,
    /// `/spinRight/`, `/spinBackLeft/`, `/spinBackRight/`).
    ///
    /// `/emergencystop/` never contains `/stop/`, so the stop patterns do not
    /// shadow each other.
    pub fn parse(text: &str) -> Command {
        if text.contains(SPEED) {
            Command::Speed(speed_token(text))
        } else if text.contains(FORWARD) {
            Command::Direction(DirectionMode::Forward)
        } else if text.contains(STOP) {
            Command::Stop
        } else if text.contains(EMERGENCY_STOP) {
            Command::EmergencyStop
        } else if let Some(mode) = advertised_direction(text) {
            Command::Direction(mode)
        } else {
            Command::Unknown
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Speed(Ok(value)) => write!(f, "speed {}", value),
            Command::Speed(Err(e)) => write!(f, "speed ({})", e),
            Command::Direction(mode) => write!(f, "direction {}", mode),
            Command::Stop => f.write_str("stop"),
            Command::EmergencyStop => f.write_str("emergency stop"),
            Command::Unknown => f.write_str("unknown"),
        }
    }
}

/// Directions other than forward and stop that have their own path segment.
fn advertised_direction(text: &str) -> Option<DirectionMode> {
    DirectionMode::ALL
        .into_iter()
        .filter(|mode| !matches!(mode, DirectionMode::Forward | DirectionMode::Stopped))
        .find(|mode| text.contains(&format!("/{}/", mode.path_segment())))
}

/// Extract the integer after the first `/speed/`.
///
/// The token is the first whitespace-delimited word before any further
/// `/speed/`. Integers too large for `i64` saturate, so they still clamp to
/// the speed bounds.
fn speed_token(text: &str) -> Result<i64, SpeedTokenError> {
    let rest = text
        .split_once(SPEED)
        .map(|(_, rest)| rest)
        .ok_or(SpeedTokenError::Missing)?;
    let segment = rest.split(SPEED).next().unwrap_or_default();
    let token = segment
        .split_whitespace()
        .next()
        .ok_or(SpeedTokenError::Missing)?;

    match token.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(SpeedTokenError::NotANumber(token.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_speed() {
        assert_eq!(Command::parse("/speed/100"), Command::Speed(Ok(100)));
        assert_eq!(Command::parse("/speed/-10"), Command::Speed(Ok(-10)));
        assert_eq!(Command::parse("/speed/+7"), Command::Speed(Ok(7)));
        assert_eq!(Command::parse("GET /speed/42 HTTP/1.1"), Command::Speed(Ok(42)));
    }

    #[test]
    fn test_parse_speed_token_stops_at_next_speed() {
        assert_eq!(Command::parse("/speed/12/speed/99"), Command::Speed(Ok(12)));
    }

    #[test]
    fn test_parse_speed_overflow_saturates() {
        assert_eq!(
            Command::parse("/speed/99999999999999999999999"),
            Command::Speed(Ok(i64::MAX))
        );
        assert_eq!(
            Command::parse("/speed/-99999999999999999999999"),
            Command::Speed(Ok(i64::MIN))
        );
    }

    #[test]
    fn test_parse_speed_missing() {
        assert_eq!(
            Command::parse("/speed/"),
            Command::Speed(Err(SpeedTokenError::Missing))
        );
        assert_eq!(
            Command::parse("/speed/   "),
            Command::Speed(Err(SpeedTokenError::Missing))
        );
    }

    #[test]
    fn test_parse_speed_not_a_number() {
        assert_eq!(
            Command::parse("/speed/fast"),
            Command::Speed(Err(SpeedTokenError::NotANumber("fast".into())))
        );
        assert_eq!(
            Command::parse("/speed/100?x=1"),
            Command::Speed(Err(SpeedTokenError::NotANumber("100?x=1".into())))
        );
        assert_eq!(
            Command::parse("/speed/3.5"),
            Command::Speed(Err(SpeedTokenError::NotANumber("3.5".into())))
        );
    }

    #[test]
    fn test_parse_directions_and_stops() {
        assert_eq!(
            Command::parse("/forward/"),
            Command::Direction(DirectionMode::Forward)
        );
        assert_eq!(Command::parse("/stop/"), Command::Stop);
        assert_eq!(Command::parse("/emergencystop/"), Command::EmergencyStop);
    }

    #[test]
    fn test_emergency_stop_is_not_stop() {
        assert!(!EMERGENCY_STOP.contains(STOP));
        assert_eq!(Command::parse("/x/emergencystop/"), Command::EmergencyStop);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(Command::parse("/forward/speed/5"), Command::Speed(Ok(5)));
        assert_eq!(Command::parse("/stop/speed/5"), Command::Speed(Ok(5)));
        assert_eq!(
            Command::parse("/stop/forward/"),
            Command::Direction(DirectionMode::Forward)
        );
        assert_eq!(Command::parse("/emergencystop/stop/"), Command::Stop);
    }

    #[test]
    fn test_parse_unwired_directions() {
        assert_eq!(
            Command::parse("/reverse/"),
            Command::Direction(DirectionMode::Reverse)
        );
        assert_eq!(
            Command::parse("/spinLeft/"),
            Command::Direction(DirectionMode::SpinLeft)
        );
        assert_eq!(
            Command::parse("/spinBackRight/"),
            Command::Direction(DirectionMode::SpinBackRight)
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("/"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
        assert_eq!(Command::parse("/forward"), Command::Unknown);
        assert_eq!(Command::parse("/turnLeft/"), Command::Unknown);
        assert_eq!(Command::parse("/speed"), Command::Unknown);
        assert_eq!(Command::parse("/favicon.ico"), Command::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::parse("/speed/9").to_string(), "speed 9");
        assert_eq!(
            Command::parse("/speed/x").to_string(),
            "speed (Speed is not a number: \"x\")"
        );
        assert_eq!(Command::parse("/reverse/").to_string(), "direction reverse");
    }
}
