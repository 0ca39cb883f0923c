//! Command interpreter for the drive endpoint.
//!
//! One short path-like command string goes in, a [`Reply`] comes out, and in
//! between the [`MotionState`](trundle_motion::MotionState) and the
//! [`OutputDriver`](trundle_drive::OutputDriver) are updated in a fixed order:
//! the settling interlock always runs before a direction line changes.

pub mod command;
pub mod controller;
pub mod interpreter;

pub use command::{Command, SpeedTokenError};
pub use controller::DriveController;
pub use interpreter::{Reply, execute};
