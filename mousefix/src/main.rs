use std::io;
use std::process::ExitCode;

use mousefix::cli::ProgramArgs;
use mousefix::driver::iokit::IoKitDriver;
use mousefix::fix;

/// Parse the acceleration factor and write it to the mouse driver together with the scaling table.
fn main() -> ExitCode {
    env_logger::init();

    let args = ProgramArgs::get();
    let status = fix::run(&args, &mut IoKitDriver, &mut io::stdout());
    log::info!("Exiting with {:?}", status);

    status.into()
}
