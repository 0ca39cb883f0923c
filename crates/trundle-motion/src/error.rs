#![warn(missing_docs)]

//! Error types for the motion library.
//!
//! This module defines the errors that can occur while selecting a drive
//! direction.

use core::fmt;

use crate::DirectionMode;

/// Errors that can occur in motion state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// The direction is part of the vocabulary, but the present switching
    /// hardware has no conduction path for it.
    UnsupportedDirection(DirectionMode),
}

impl core::fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::UnsupportedDirection(mode) => {
                write!(f, "Unsupported direction: {} is not wired", mode)
            }
        }
    }
}

impl core::error::Error for MotionError {}
