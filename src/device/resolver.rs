use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::DeviceError;

pub const INPUT_CLASS_ROOT: &str = "/sys/class/input";

/// Finds the hardware control directory backing a device node.
pub trait DevicePathResolver {
    fn resolve(&self, device_node: &Path) -> Result<PathBuf, DeviceError>;
}

/// Resolves through the sysfs input class.
///
/// `<class_root>/<node name>` links to the node's directory under
/// `/sys/devices`. The hardware directory is the closest ancestor of it that
/// exposes a `leds/` directory, usually the HID device a few levels up.
#[derive(Debug, Clone)]
pub struct SysfsResolver {
    class_root: PathBuf,
}

impl Default for SysfsResolver {
    fn default() -> Self {
        Self::new(INPUT_CLASS_ROOT)
    }
}

impl SysfsResolver {
    pub fn new(class_root: impl Into<PathBuf>) -> Self {
        Self {
            class_root: class_root.into(),
        }
    }
}

impl DevicePathResolver for SysfsResolver {
    fn resolve(&self, device_node: &Path) -> Result<PathBuf, DeviceError> {
        let not_found = || DeviceError::DeviceNotFound {
            node: device_node.to_path_buf(),
        };

        let name = device_node.file_name().ok_or_else(not_found)?;
        let class_entry = self.class_root.join(name);
        let syspath = class_entry.canonicalize().map_err(|e| {
            debug!("Cannot resolve {}: {}", class_entry.display(), e);
            not_found()
        })?;
        debug!("{} has syspath {}", device_node.display(), syspath.display());

        let hardware = syspath
            .ancestors()
            .find(|dir| dir.join("leds").is_dir())
            .ok_or_else(not_found)?;

        info!(
            "Resolved {} to hardware path {}",
            device_node.display(),
            hardware.display()
        );
        Ok(hardware.to_path_buf())
    }
}
