use anyhow::Context;
use clap::Parser;

use mousefix::config::{AccelerationFactor, Settings};

/// Print the settings mousefix would write to the mouse driver, as TOML.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Acceleration factor to preview instead of the default.
    #[arg(long)]
    accel: Option<f64>,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = Settings::compiled();
    if let Some(accel) = cli.accel {
        let accel = AccelerationFactor::new(accel).context("Invalid --accel")?;
        settings = settings.with_acceleration(accel);
    }
    if let Err(e) = settings.scaling.validate() {
        log::warn!("The compiled scaling table would be rejected: {}", e);
    }

    print!("{}", settings.to_toml_string()?);
    Ok(())
}
