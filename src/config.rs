//! # Configuration Module
//!
//! Handles loading and validating the hub description from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{HubSensorError, Result};
use crate::gateway::events::DEFAULT_EVENT_CAPACITY;
use crate::sensor::protocol::{DeviceVariant, HubGeneration};

/// Largest accepted event channel capacity
const MAX_EVENT_CAPACITY: usize = 4096;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Hub configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    #[serde(default = "default_generation")]
    pub generation: HubGeneration,
}

/// Event channel configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// One attached sensor
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    pub port: u8,
    pub variant: DeviceVariant,
}

// Default value functions
fn default_generation() -> HubGeneration { HubGeneration::Modern }
fn default_capacity() -> usize { DEFAULT_EVENT_CAPACITY }

impl Default for HubConfig {
    fn default() -> Self {
        Self { generation: default_generation() }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: default_capacity() }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hub_sensors::config::Config;
    ///
    /// let config = Config::load("config/hub.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if the event capacity is out of range or two devices
    /// share a port
    fn validate(&self) -> Result<()> {
        if self.events.capacity == 0 || self.events.capacity > MAX_EVENT_CAPACITY {
            return Err(HubSensorError::Config(toml::de::Error::custom(format!(
                "events capacity must be between 1 and {}",
                MAX_EVENT_CAPACITY
            ))));
        }

        let mut ports = HashSet::new();
        for device in &self.devices {
            if !ports.insert(device.port) {
                return Err(HubSensorError::Config(toml::de::Error::custom(format!(
                    "port {} is assigned to more than one device",
                    device.port
                ))));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            hub: HubConfig::default(),
            events: EventsConfig::default(),
            devices: vec![
                DeviceConfig { port: 0, variant: DeviceVariant::ColorDistanceSensor },
                DeviceConfig { port: 1, variant: DeviceVariant::TiltSensor },
            ],
        }
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_generation(), HubGeneration::Modern);
        assert_eq!(default_capacity(), 64);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.hub.generation, HubGeneration::Modern);
        assert_eq!(config.events.capacity, 64);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = Config::from_toml(
            r#"
[hub]
generation = "legacy"

[events]
capacity = 8

[[devices]]
port = 1
variant = "color_distance_sensor"

[[devices]]
port = 2
variant = "tilt_sensor"
"#,
        )
        .unwrap();

        assert_eq!(config.hub.generation, HubGeneration::Legacy);
        assert_eq!(config.events.capacity, 8);
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].variant, DeviceVariant::ColorDistanceSensor);
        assert_eq!(config.devices[1].port, 2);
    }

    #[test]
    fn test_unknown_generation() {
        let result = Config::from_toml("[hub]\ngeneration = \"future\"\n");
        assert!(matches!(result, Err(HubSensorError::Config(_))));
    }

    #[test]
    fn test_unknown_variant() {
        let result = Config::from_toml("[[devices]]\nport = 0\nvariant = \"motor\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_capacity_zero() {
        let mut config = create_valid_config();
        config.events.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_capacity_too_high() {
        let mut config = create_valid_config();
        config.events.capacity = 4097;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_capacity_bounds_valid() {
        for capacity in [1, 4096] {
            let mut config = create_valid_config();
            config.events.capacity = capacity;
            assert!(config.validate().is_ok(), "capacity {} should be valid", capacity);
        }
    }

    #[test]
    fn test_duplicate_port() {
        let mut config = create_valid_config();
        config.devices[1].port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[hub]
generation = "modern"

[[devices]]
port = 3
variant = "tilt_sensor"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.devices[0].port, 3);
        assert_eq!(config.events.capacity, 64);
    }

    #[test]
    fn test_load_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/hub.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.hub.generation, HubGeneration::Modern);
        assert_eq!(config.devices.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/hub.toml");
        assert!(matches!(result, Err(HubSensorError::Io(_))));
    }
}
