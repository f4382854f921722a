use directories::ProjectDirs;
use gyrio::DeviceName;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Delivery-rate hint for the sampler, named after the hints a mobile
/// sensor stack exposes. Each maps to a fixed poll period.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RateHint {
    #[strum(serialize = "Fastest", serialize = "0")]
    Fastest,
    #[strum(serialize = "Game", serialize = "1")]
    Game,
    #[default]
    #[strum(serialize = "Ui", serialize = "2")]
    Ui,
    #[strum(serialize = "Normal", serialize = "3")]
    Normal,
}

impl RateHint {
    pub fn period(&self) -> Duration {
        match self {
            RateHint::Fastest => Duration::from_millis(5),
            RateHint::Game => Duration::from_millis(20),
            RateHint::Ui => Duration::from_millis(60),
            RateHint::Normal => Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SensorConfig {
    /// IIO device to read; the first gyroscope found when unset.
    pub device: Option<DeviceName>,
    #[serde(default)]
    pub rate: RateHint,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "tiltglass", "tiltglass").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("TILTGLASS"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the configuration, seeding a commented default file on first
/// run. Any failure falls back to defaults; the app never refuses to
/// start over configuration.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("wrote default configuration to {}", path.display()),
            Err(e) => log::warn!("could not write default configuration: {}", e),
        }
        return Config::default();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("falling back to default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_hint_deserialization() {
        let cases = vec![
            ("\"ui\"", RateHint::Ui),
            ("\"Ui\"", RateHint::Ui),
            ("\"UI\"", RateHint::Ui),
            ("\"2\"", RateHint::Ui),
            ("\"fastest\"", RateHint::Fastest),
            ("\"0\"", RateHint::Fastest),
            ("\"game\"", RateHint::Game),
            ("\"1\"", RateHint::Game),
            ("\"normal\"", RateHint::Normal),
            ("\"3\"", RateHint::Normal),
        ];

        for (json, expected) in cases {
            let deserialized: RateHint = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_rate_hint_defaults_to_ui() {
        let sensor: SensorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(sensor.rate, RateHint::Ui);
        assert!(sensor.device.is_none());
    }

    #[test]
    fn test_rate_hint_periods_are_ordered() {
        assert!(RateHint::Fastest.period() < RateHint::Game.period());
        assert!(RateHint::Game.period() < RateHint::Ui.period());
        assert!(RateHint::Ui.period() < RateHint::Normal.period());
    }
}
