//! The configuration run: open the driver, write the settings, close it again.

use std::{io::Write, process::ExitCode};

use crate::cli::{ProgramArgs, PROGRAM_NAME};
use crate::config::Settings;
use crate::driver::{EventStatusDriver, EventStatusSession};
use crate::error::MouseFixError;

/// Outcome of a run as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

/// Write `settings` to the mouse driver.
///
/// The acceleration factor is written before the scaling table is checked, so a
/// rejected table still leaves the new factor in place. The handle is closed on
/// every path once it has been opened.
pub fn apply<D: EventStatusDriver>(
    driver: &mut D,
    settings: &Settings,
) -> Result<(), MouseFixError> {
    log::trace!("Entering fix::apply.");

    let mut session = EventStatusSession::open(driver)?;
    session.set_acceleration(settings.acceleration);
    session.set_scaling(&settings.scaling)?;

    log::trace!("Leaving fix::apply.");
    Ok(())
}

/// Resolve the settings from `args` and apply them.
///
/// Usage and diagnostics are written to `out`. The driver is not touched at all
/// if the arguments are invalid.
pub fn run<D: EventStatusDriver, W: Write>(
    args: &ProgramArgs,
    driver: &mut D,
    out: &mut W,
) -> ExitStatus {
    log::trace!("Entering fix::run.");
    log::info!("Using arguments:\n{}", args);

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            report(out, &args.usage());
            return ExitStatus::Failure;
        }
    };
    log::info!("Using settings:\n{}", settings);

    let status = run_settings(&settings, driver, out);
    log::trace!("Leaving fix::run.");
    status
}

/// Apply already resolved `settings`, printing a diagnostic to `out` on failure.
pub fn run_settings<D: EventStatusDriver, W: Write>(
    settings: &Settings,
    driver: &mut D,
    out: &mut W,
) -> ExitStatus {
    match apply(driver, settings) {
        Ok(()) => ExitStatus::Success,
        Err(e) => {
            log::error!("{}", e);
            report(out, &format!("{}: {}", PROGRAM_NAME, e));
            ExitStatus::Failure
        }
    }
}

fn report<W: Write>(out: &mut W, message: &str) {
    if let Err(e) = writeln!(out, "{}", message) {
        log::error!("Failed to print message: {}", e);
    }
}
