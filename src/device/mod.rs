//! Hardware collaborators used once at startup
//!
//! - [`privilege`] - effective uid check
//! - [`resolver`] - maps a device node to its sysfs hardware directory
//! - [`led`] - RGB status LED control file

pub mod led;
pub mod privilege;
pub mod resolver;

use std::io;
use std::path::PathBuf;

pub use led::{find_led_control, set_led, Rgb};
pub use privilege::ensure_root;
pub use resolver::{DevicePathResolver, SysfsResolver};

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Permission denied: root privileges are required")]
    PermissionDenied,

    #[error("No input device found for {}", node.display())]
    DeviceNotFound { node: PathBuf },

    #[error("Failed to open device {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No RGB LED control found under {}", dir.display())]
    LedNotFound { dir: PathBuf },

    #[error("Failed to write LED control {}: {source}", path.display())]
    LedWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
