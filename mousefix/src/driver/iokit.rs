//! The event-status driver of macOS, reached through IOKit.
//!
//! Other platforms have no such driver, there [`IoKitDriver`] never manages to
//! open a handle.

use super::{EventStatusDriver, MouseScaling};
use crate::error::DriverError;

/// `NXEventHandle`, a mach port.
pub type EventHandle = u32;

#[cfg(target_os = "macos")]
mod ffi {
    use super::{EventHandle, MouseScaling};

    pub const KERN_SUCCESS: i32 = 0;

    #[link(name = "IOKit", kind = "framework")]
    extern "C" {
        pub fn NXOpenEventStatus() -> EventHandle;
        pub fn NXCloseEventStatus(handle: EventHandle);
        pub fn IOHIDSetMouseAcceleration(handle: EventHandle, acceleration: f64) -> i32;
        pub fn NXSetMouseScaling(handle: EventHandle, scaling: *mut MouseScaling);
    }
}

/// Driver backed by the system's HID event-status service.
#[derive(Debug, Default)]
pub struct IoKitDriver;

#[cfg(target_os = "macos")]
impl EventStatusDriver for IoKitDriver {
    type Handle = EventHandle;

    fn open_event_status(&mut self) -> Option<EventHandle> {
        // SAFETY: takes no arguments, a null port signals failure.
        let handle = unsafe { ffi::NXOpenEventStatus() };
        if handle == 0 {
            None
        } else {
            Some(handle)
        }
    }

    fn close_event_status(&mut self, handle: EventHandle) {
        // SAFETY: `handle` came from NXOpenEventStatus and is closed exactly once.
        unsafe { ffi::NXCloseEventStatus(handle) }
    }

    fn set_acceleration_scalar(
        &mut self,
        handle: EventHandle,
        factor: f64,
    ) -> Result<(), DriverError> {
        // SAFETY: `handle` is an open event-status handle.
        let ret = unsafe { ffi::IOHIDSetMouseAcceleration(handle, factor) };
        if ret == ffi::KERN_SUCCESS {
            Ok(())
        } else {
            Err(DriverError::Kern(ret))
        }
    }

    fn set_acceleration_table(
        &mut self,
        handle: EventHandle,
        scaling: &MouseScaling,
    ) -> Result<(), DriverError> {
        // The driver wants a mutable pointer even though it only reads the table.
        let mut scaling = *scaling;
        // SAFETY: `scaling` is repr(C) with the layout of NXMouseScaling and outlives the call.
        unsafe { ffi::NXSetMouseScaling(handle, &mut scaling) };
        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
impl EventStatusDriver for IoKitDriver {
    type Handle = EventHandle;

    fn open_event_status(&mut self) -> Option<EventHandle> {
        log::warn!("{}", DriverError::Unsupported);
        None
    }

    fn close_event_status(&mut self, _handle: EventHandle) {}

    fn set_acceleration_scalar(
        &mut self,
        _handle: EventHandle,
        _factor: f64,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    fn set_acceleration_table(
        &mut self,
        _handle: EventHandle,
        _scaling: &MouseScaling,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_never_opens() {
        let mut driver = IoKitDriver;

        assert_eq!(None, driver.open_event_status());
    }
}
