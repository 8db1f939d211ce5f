use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::DeviceError;

pub const DEFAULT_LED_MARKER: &str = "rgb";
const INTENSITY_FILE: &str = "multi_intensity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        [rgb.red, rgb.green, rgb.blue]
    }
}

// Format expected by the multicolor LED class: "R G B"
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.red, self.green, self.blue)
    }
}

/// Locate the intensity file of the first LED whose name contains `marker`.
pub fn find_led_control(hardware_path: &Path, marker: &str) -> Result<PathBuf, DeviceError> {
    let leds_dir = hardware_path.join("leds");
    let not_found = || DeviceError::LedNotFound {
        dir: leds_dir.clone(),
    };

    let entries = fs::read_dir(&leds_dir).map_err(|e| {
        debug!("Cannot read {}: {}", leds_dir.display(), e);
        not_found()
    })?;

    let mut names: Vec<_> = entries
        .flatten()
        .map(|entry| entry.file_name())
        .filter(|name| name.to_string_lossy().contains(marker))
        .collect();
    // read_dir order is unspecified, keep the choice stable
    names.sort();

    let led = names.into_iter().next().ok_or_else(not_found)?;
    let control = leds_dir.join(led).join(INTENSITY_FILE);
    debug!("Using LED control {}", control.display());
    Ok(control)
}

// Requires write access to sysfs, normally root
pub fn set_led(control: &Path, color: Rgb) -> Result<(), DeviceError> {
    let write_err = |source| DeviceError::LedWrite {
        path: control.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(control)
        .map_err(write_err)?;
    file.write_all(color.to_string().as_bytes())
        .map_err(write_err)?;

    info!("LED set to ({}) via {}", color, control.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hardware_with_leds(names: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in names {
            let dir = tmp.path().join("leds").join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(INTENSITY_FILE), "0 0 0").unwrap();
        }
        tmp
    }

    #[test]
    fn finds_rgb_led_among_others() {
        let tmp = hardware_with_leds(&["input3:white:player-1", "input3:rgb:indicator"]);

        let control = find_led_control(tmp.path(), DEFAULT_LED_MARKER).unwrap();
        assert_eq!(
            control,
            tmp.path()
                .join("leds/input3:rgb:indicator/multi_intensity")
        );
    }

    #[test]
    fn missing_led_is_reported() {
        let tmp = hardware_with_leds(&["input3:white:player-1"]);
        let err = find_led_control(tmp.path(), DEFAULT_LED_MARKER).unwrap_err();
        assert!(matches!(err, DeviceError::LedNotFound { .. }));

        let empty = TempDir::new().unwrap();
        let err = find_led_control(empty.path(), DEFAULT_LED_MARKER).unwrap_err();
        assert!(matches!(err, DeviceError::LedNotFound { .. }));
    }

    #[test]
    fn writes_space_separated_triple_without_newline() {
        let tmp = hardware_with_leds(&["input3:rgb:indicator"]);
        let control = find_led_control(tmp.path(), DEFAULT_LED_MARKER).unwrap();

        set_led(&control, Rgb::new(100, 100, 100)).unwrap();
        assert_eq!(fs::read_to_string(&control).unwrap(), "100 100 100");

        set_led(&control, Rgb::new(255, 0, 7)).unwrap();
        assert_eq!(fs::read_to_string(&control).unwrap(), "255 0 7");
    }

    #[test]
    fn write_to_missing_control_fails() {
        let tmp = TempDir::new().unwrap();
        let err = set_led(&tmp.path().join("nope/multi_intensity"), Rgb::new(1, 2, 3))
            .unwrap_err();
        assert!(matches!(err, DeviceError::LedWrite { .. }));
    }
}
