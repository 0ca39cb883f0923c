//! Output stage of a two-channel relay/bridge drive.
//!
//! [`devices::driver::OutputDriver`] owns the two duty-cycle outputs and the
//! four direction-enable lines, and enforces the settling interlock that must
//! run before any conduction path is reselected.
//!
//! The host binary uses the simulated outputs in [`devices::sim`]. The `hal`
//! feature (on by default) adds `embedded-hal` 1.0 adapters for board builds.

pub mod devices;
pub mod traits;

pub use devices::driver::{Channel, DrivePins, MIN_SETTLE_TIME, OutputDriver, SpinSettle};
pub use traits::output::{DigitalOutput, DirectionLines, DutyOutput, OutputTarget, Settle};
