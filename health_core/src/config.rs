//! Configuration file support for the health tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/health/config.toml`.

use crate::window::ALL_DAY;
use crate::{Error, Result, TimeWindow};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub targets: DailyTargets,

    #[serde(default = "default_windows")]
    pub windows: BTreeMap<String, TimeWindow>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            targets: DailyTargets::default(),
            windows: default_windows(),
        }
    }
}

/// Data location configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_journal_path")]
    pub journal_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
        }
    }
}

/// Minimum amounts to reach every day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyTargets {
    #[serde(default = "default_min_steps")]
    pub min_steps_per_day: f64,

    #[serde(default = "default_min_hours")]
    pub min_hours_of_movement_per_day: f64,

    #[serde(default = "default_min_kilocalories")]
    pub min_kilocalories_per_day: f64,

    #[serde(default = "default_min_liters")]
    pub min_liters_per_day: f64,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            min_steps_per_day: default_min_steps(),
            min_hours_of_movement_per_day: default_min_hours(),
            min_kilocalories_per_day: default_min_kilocalories(),
            min_liters_per_day: default_min_liters(),
        }
    }
}

impl DailyTargets {
    /// Reject minimums that would make completion rates meaningless
    pub fn validate(&self) -> Result<()> {
        let minimums = [
            ("min_steps_per_day", self.min_steps_per_day),
            (
                "min_hours_of_movement_per_day",
                self.min_hours_of_movement_per_day,
            ),
            ("min_kilocalories_per_day", self.min_kilocalories_per_day),
            ("min_liters_per_day", self.min_liters_per_day),
        ];

        for (name, value) in minimums {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_journal_path() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("health").join("journal.jsonl")
}

fn default_min_steps() -> f64 {
    2000.0
}

fn default_min_hours() -> f64 {
    2.0
}

fn default_min_kilocalories() -> f64 {
    1300.0
}

fn default_min_liters() -> f64 {
    2.0
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN)
}

fn default_windows() -> BTreeMap<String, TimeWindow> {
    BTreeMap::from([
        (ALL_DAY.to_string(), TimeWindow::unbounded()),
        (
            "breakfast".to_string(),
            TimeWindow::new(hms(2, 0, 0), hms(12, 0, 0)),
        ),
        (
            "lunch".to_string(),
            TimeWindow::new(hms(12, 0, 0), hms(17, 0, 0)),
        ),
        (
            "dinner".to_string(),
            TimeWindow::new(hms(17, 0, 0), hms(23, 59, 59)),
        ),
    ])
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("health").join("config.toml")
    }

    /// Check targets and windows
    pub fn validate(&self) -> Result<()> {
        self.targets.validate()?;

        for (name, window) in &self.windows {
            if window.start > window.end {
                return Err(Error::Config(format!(
                    "time window '{}' starts at {} after it ends at {}; windows cannot span midnight",
                    name, window.start, window.end
                )));
            }
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    ///
    /// The file is written to a temp file next to `path` and renamed over it.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.targets.min_steps_per_day, 2000.0);
        assert_eq!(config.targets.min_hours_of_movement_per_day, 2.0);
        assert_eq!(config.targets.min_kilocalories_per_day, 1300.0);
        assert_eq!(config.targets.min_liters_per_day, 2.0);
        assert!(config.windows[ALL_DAY].is_unbounded());
        assert!(config.windows.contains_key("breakfast"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.targets, parsed.targets);
        assert_eq!(config.windows, parsed.windows);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[targets]
min_steps_per_day = 10000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.targets.min_steps_per_day, 10000.0);
        assert_eq!(config.targets.min_liters_per_day, 2.0); // default
        assert!(config.windows.contains_key("lunch")); // default
    }

    #[test]
    fn test_custom_windows_replace_defaults() {
        let toml_str = r#"
[windows.snack]
start = "15:00:00"
end = "16:00:00"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.windows.len(), 1);
        assert_eq!(config.windows["snack"].start, hms(15, 0, 0));
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let mut config = Config::default();
        config.targets.min_kilocalories_per_day = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.targets.min_kilocalories_per_day = -5.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.targets.min_kilocalories_per_day = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_window_spanning_midnight_rejected() {
        let mut config = Config::default();
        config.windows.insert(
            "late".into(),
            TimeWindow::new(hms(22, 0, 0), hms(2, 0, 0)),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("late"));
    }

    #[test]
    fn test_save_and_load_from_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.targets.min_liters_per_day = 2.5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.targets.min_liters_per_day, 2.5);
        assert_eq!(loaded.windows, config.windows);
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[targets]\nmin_steps_per_day = -1\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
