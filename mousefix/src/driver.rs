//! Access to the HID event-status driver.
//!
//! The driver is only reached through [`EventStatusDriver`], the real
//! implementation is [`iokit::IoKitDriver`]. A handle is held by an
//! [`EventStatusSession`] which closes it again when dropped, so every path
//! out of a run releases the handle.

pub mod iokit;

use std::fmt;

use crate::config::{AccelerationFactor, ScalingTable, MAX_SCALE_LEVELS};
use crate::error::{DriverError, MouseFixError};

/// Scaling table in the layout the driver expects (`NXMouseScaling`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseScaling {
    num_scale_levels: i32,
    scale_thresholds: [i16; MAX_SCALE_LEVELS],
    scale_factors: [i16; MAX_SCALE_LEVELS],
}

impl MouseScaling {
    /// A struct with no levels, which makes the driver drop its scaling curve.
    pub fn disabled() -> Self {
        Self {
            num_scale_levels: 0,
            scale_thresholds: [0; MAX_SCALE_LEVELS],
            scale_factors: [0; MAX_SCALE_LEVELS],
        }
    }

    pub fn num_scale_levels(&self) -> usize {
        usize::try_from(self.num_scale_levels).unwrap_or_default()
    }

    /// Thresholds of the used levels.
    pub fn thresholds(&self) -> &[i16] {
        &self.scale_thresholds[..self.num_scale_levels()]
    }

    /// Multipliers of the used levels.
    pub fn factors(&self) -> &[i16] {
        &self.scale_factors[..self.num_scale_levels()]
    }
}

impl TryFrom<&ScalingTable> for MouseScaling {
    type Error = MouseFixError;

    fn try_from(table: &ScalingTable) -> Result<Self, Self::Error> {
        table.validate()?;

        let mut scaling = Self::disabled();
        for (index, level) in table.levels().iter().enumerate() {
            scaling.scale_thresholds[index] = i16::try_from(level.threshold)
                .map_err(|_| MouseFixError::ScaleLevelOutOfRange { index })?;
            scaling.scale_factors[index] = i16::try_from(level.multiplier)
                .map_err(|_| MouseFixError::ScaleLevelOutOfRange { index })?;
        }
        scaling.num_scale_levels =
            i32::try_from(table.len()).map_err(|_| MouseFixError::too_many_scale_levels(table.len()))?;

        Ok(scaling)
    }
}

impl fmt::Display for MouseScaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} levels, thresholds {:?}, factors {:?}",
            self.num_scale_levels,
            self.thresholds(),
            self.factors()
        )
    }
}

/// Operations of the event-status driver.
///
/// Setting the acceleration comes in two forms, a plain factor and a full scaling table.
pub trait EventStatusDriver {
    type Handle: Copy + fmt::Debug;

    /// Connect to the driver. `None` if no connection could be made.
    fn open_event_status(&mut self) -> Option<Self::Handle>;

    fn close_event_status(&mut self, handle: Self::Handle);

    fn set_acceleration_scalar(
        &mut self,
        handle: Self::Handle,
        factor: f64,
    ) -> Result<(), DriverError>;

    fn set_acceleration_table(
        &mut self,
        handle: Self::Handle,
        scaling: &MouseScaling,
    ) -> Result<(), DriverError>;
}

/// An open handle to the event-status driver, closed on drop.
pub struct EventStatusSession<'d, D: EventStatusDriver> {
    driver: &'d mut D,
    handle: D::Handle,
}

impl<'d, D: EventStatusDriver> EventStatusSession<'d, D> {
    pub fn open(driver: &'d mut D) -> Result<Self, MouseFixError> {
        let handle = driver
            .open_event_status()
            .ok_or(MouseFixError::DeviceUnavailable)?;
        log::info!("Opened event status handle {:?}.", handle);

        Ok(Self { driver, handle })
    }

    /// Push the acceleration factor.
    /// Driver errors are logged but do not fail the run.
    pub fn set_acceleration(&mut self, factor: AccelerationFactor) {
        log::info!("Setting acceleration factor {}.", factor);

        if let Err(e) = self
            .driver
            .set_acceleration_scalar(self.handle, factor.value())
        {
            log::warn!("Ignoring failure to set acceleration factor: {}", e);
        }
    }

    /// Push the scaling table, or clear the driver's table if `table` is empty.
    /// Fails without touching the driver if the table does not fit.
    pub fn set_scaling(&mut self, table: &ScalingTable) -> Result<(), MouseFixError> {
        let scaling = MouseScaling::try_from(table)?;
        log::info!("Setting mouse scaling: {}.", scaling);

        if let Err(e) = self.driver.set_acceleration_table(self.handle, &scaling) {
            log::warn!("Ignoring failure to set mouse scaling: {}", e);
        }
        Ok(())
    }
}

impl<D: EventStatusDriver> Drop for EventStatusSession<'_, D> {
    fn drop(&mut self) {
        self.driver.close_event_status(self.handle);
        log::info!("Closed event status handle {:?}.", self.handle);
    }
}
