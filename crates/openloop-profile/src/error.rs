#![warn(missing_docs)]

//! Error types for the velocity-profile library.
//!
//! This module defines error types that can occur while planning a motion
//! profile or stepping it against elapsed time.

use core::fmt;

/// Errors that can occur in profile planning and stepping.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Error for invalid travel distance.
    /// This variant is returned when a distance is provided that is not
    /// positive and finite.
    InvalidDistance(&'static str),
    /// Error for an unrecognized profile selection.
    /// This variant is returned when an operator-facing selection integer
    /// does not map to a known profile kind.
    InvalidProfileSelection(&'static str),
    /// Error for an unclassifiable stepper input.
    /// This variant is returned when the stepper cannot place the elapsed
    /// time into any phase of the profile.
    UnsupportedProfile(&'static str),
}

impl core::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidDistance(msg) => write!(f, "Invalid distance: {}", msg),
            ProfileError::InvalidProfileSelection(msg) => {
                write!(f, "Invalid profile selection: {}", msg)
            }
            ProfileError::UnsupportedProfile(msg) => write!(f, "Unsupported profile: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProfileError {}
