use nix::unistd::geteuid;
use tracing::debug;

use super::DeviceError;

// Device nodes and LED controls are root-only on stock systems
pub fn ensure_root() -> Result<(), DeviceError> {
    let euid = geteuid();
    debug!("Running with effective uid {}", euid);
    if euid.is_root() {
        Ok(())
    } else {
        Err(DeviceError::PermissionDenied)
    }
}
