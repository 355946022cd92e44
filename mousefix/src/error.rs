//! Our application errors.

use thiserror::Error;

use crate::config::MAX_SCALE_LEVELS;

/// General error type.
#[derive(Error, Debug)]
pub enum MouseFixError {
    #[error("Acceleration factor must be a positive number, got {0}")]
    InvalidAcceleration(f64),
    #[error("Could not establish connection to mouse device")]
    DeviceUnavailable,
    #[error("Too many scaling factor pairs defined.\n          Maximum allowed = {max}")]
    TooManyScaleLevels { count: usize, max: usize },
    #[error("Scaling thresholds must increase, entry {index} does not")]
    UnorderedThresholds { index: usize },
    #[error("Scaling entry {index} does not fit into the driver's table")]
    ScaleLevelOutOfRange { index: usize },
    #[error("Failed to serialize settings:\n{0}")]
    SerializeSettings(#[from] toml::ser::Error),
}

impl MouseFixError {
    /// Error for a table with `count` entries, which is more than the driver accepts.
    pub fn too_many_scale_levels(count: usize) -> Self {
        Self::TooManyScaleLevels {
            count,
            max: MAX_SCALE_LEVELS,
        }
    }
}

/// Errors reported by the event-status driver itself.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DriverError {
    #[error("Driver call returned kernel error {0:#x}")]
    Kern(i32),
    #[error("Event-status driver is not available on this platform")]
    Unsupported,
}
