use crate::sample::TiltSample;
use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kernel name of an IIO device (the `name` attribute, e.g. `bmg160`) or
/// its sysfs directory name (`iio:device0`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct DeviceName(String);

crate::impl_string_newtype!(DeviceName);

const IIO_ROOT: &str = "/sys/bus/iio/devices";

// Angular-velocity channel attributes. Devices that expose other channel
// kinds (in_accel_*, in_illuminance_*, ...) are not gyroscopes and are
// filtered out during the scan.
const ANGVEL_X_RAW: &str = "in_anglvel_x_raw";
const ANGVEL_Y_RAW: &str = "in_anglvel_y_raw";
const ANGVEL_SCALE: &str = "in_anglvel_scale";

#[derive(Debug, Error)]
pub enum IioError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unparseable value {value:?} in {path}")]
    Parse { path: PathBuf, value: String },
}

/// A discovered gyroscope: an IIO device carrying angular-velocity
/// channels.
#[derive(Debug, Clone)]
pub struct Gyroscope {
    dir: PathBuf,
    name: DeviceName,
    scale: f64,
}

impl Gyroscope {
    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    /// Opens `dir` as a gyroscope if it carries both angular-velocity
    /// channels.
    fn open(dir: &Path) -> Option<Self> {
        if !dir.join(ANGVEL_X_RAW).exists() || !dir.join(ANGVEL_Y_RAW).exists() {
            return None;
        }

        let name = fs::read_to_string(dir.join("name"))
            .map(|s| DeviceName::new(s.trim()))
            .unwrap_or_else(|_| DeviceName::new(dir.file_name().unwrap_or_default().to_string_lossy()));

        let scale = fs::read_to_string(dir.join(ANGVEL_SCALE))
            .ok()
            .and_then(|s| parse_attr(&s))
            .unwrap_or(1.0);

        Some(Self {
            dir: dir.to_path_buf(),
            name,
            scale,
        })
    }

    /// Picks a gyroscope from the bus. With `wanted` set, only a device
    /// whose kernel name or sysfs directory matches is returned;
    /// otherwise the first gyroscope found wins.
    pub fn discover(wanted: Option<&DeviceName>) -> Option<Self> {
        let devices = list();
        match wanted {
            None => devices.into_iter().next(),
            Some(w) => devices.into_iter().find(|g| g.matches(w)),
        }
    }

    fn matches(&self, wanted: &DeviceName) -> bool {
        self.name == *wanted
            || self.dir.file_name().and_then(|n| n.to_str()) == Some(wanted.as_str())
    }

    /// Reads the two angular-velocity channels as one sample, scaled to
    /// rad/s.
    pub fn read(&self) -> Result<TiltSample, IioError> {
        let x = self.read_channel(ANGVEL_X_RAW)?;
        let y = self.read_channel(ANGVEL_Y_RAW)?;
        Ok(TiltSample::new(x, y))
    }

    fn read_channel(&self, attr: &str) -> Result<f64, IioError> {
        let path = self.dir.join(attr);
        let text = fs::read_to_string(&path)?;
        let raw = parse_attr(&text).ok_or_else(|| IioError::Parse {
            path,
            value: text.trim().to_string(),
        })?;
        Ok(raw * self.scale)
    }
}

/// Scans the IIO bus for gyroscopes. A missing bus (no CONFIG_IIO, no
/// sensors) yields an empty list, not an error.
pub fn list() -> Vec<Gyroscope> {
    let entries = match fs::read_dir(IIO_ROOT) {
        Ok(e) => e,
        Err(e) => {
            log::debug!("no IIO bus at {IIO_ROOT}: {e}");
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter_map(|entry| Gyroscope::open(&entry.path()))
        .collect()
}

/// Parses one sysfs attribute value. Attributes are single-line decimal
/// numbers with a trailing newline.
fn parse_attr(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attr() {
        assert_eq!(parse_attr("42\n"), Some(42.0));
        assert_eq!(parse_attr("  -118 "), Some(-118.0));
        assert_eq!(parse_attr("0.000266316\n"), Some(0.000266316));
        assert_eq!(parse_attr(""), None);
        assert_eq!(parse_attr("oops"), None);
    }

    fn gyro(dir: &str, name: &str) -> Gyroscope {
        Gyroscope {
            dir: PathBuf::from(dir),
            name: DeviceName::new(name),
            scale: 1.0,
        }
    }

    #[test]
    fn test_device_matching() {
        let g = gyro("/sys/bus/iio/devices/iio:device0", "bmg160");
        assert!(g.matches(&DeviceName::new("bmg160")));
        assert!(g.matches(&DeviceName::new("iio:device0")));
        assert!(!g.matches(&DeviceName::new("bma250")));
    }
}
