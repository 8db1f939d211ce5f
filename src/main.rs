use std::fs::File;

use chrono::Local;
use color_eyre::{eyre::WrapErr, Result};
use padwatch::config::Config;
use padwatch::controller::{AxisNormalizer, ConsoleReporter, EventReader, Session};
use padwatch::device::{
    ensure_root, find_led_control, set_led, DeviceError, DevicePathResolver, SysfsResolver,
};
use padwatch::logging;
use tracing::{info, warn};

fn main() -> Result<()> {
    setup()?;

    ensure_root()?;

    let config = Config::load_or_default();
    info!("Using device node {}", config.device_node.display());

    let hardware_path = SysfsResolver::default().resolve(&config.device_node)?;

    // The LED is cosmetic, a failure here must not stop the session
    if config.led.enabled {
        let led = find_led_control(&hardware_path, &config.led.marker)
            .and_then(|control| set_led(&control, config.led.color));
        if let Err(e) = led {
            warn!("Could not set status LED: {}", e);
        }
    }

    let device = File::open(&config.device_node).map_err(|source| DeviceError::Open {
        path: config.device_node.clone(),
        source,
    })?;
    info!(
        "Opened {} at {}",
        config.device_node.display(),
        Local::now().format("%H:%M:%S.%3f")
    );

    let session = Session::start(
        EventReader::new(device),
        AxisNormalizer::with_deadzone(config.deadzone),
    );
    let mut reporter = ConsoleReporter::stdout();
    session
        .run(&mut reporter)
        .wrap_err("Failed to report controller events")?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    logging::init();
    Ok(())
}
