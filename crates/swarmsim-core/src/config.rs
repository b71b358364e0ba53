//! Configuration loading and typed config structures.
//!
//! The configuration lives in `swarmsim-config.yaml` next to the engine
//! binary's working directory. This module defines strongly-typed structs
//! that mirror the YAML structure and a loader that reads and validates
//! the file. Every field has a default, so an empty file (or no file at
//! all) yields a working setup.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Loop rates.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Connection settings.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Message subjects used on the bus.
    #[serde(default)]
    pub subjects: SubjectsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `NATS_URL` environment variable overrides
    /// `infrastructure.nats_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.timing.validate()?;
        Ok(config)
    }
}

/// Loop rate configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Motion integrator ticks per second.
    #[serde(default = "default_integrator_hz")]
    pub integrator_hz: u32,

    /// Position publisher ticks per second.
    #[serde(default = "default_publisher_hz")]
    pub publisher_hz: u32,
}

impl TimingConfig {
    /// Reject zero rates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either rate is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.integrator_hz == 0 {
            return Err(ConfigError::Invalid {
                reason: "timing.integrator_hz must be at least 1".to_owned(),
            });
        }
        if self.publisher_hz == 0 {
            return Err(ConfigError::Invalid {
                reason: "timing.publisher_hz must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Time between integrator ticks.
    pub fn integrator_period(&self) -> Duration {
        period_for(self.integrator_hz)
    }

    /// Time between publisher ticks.
    pub fn publisher_period(&self) -> Duration {
        period_for(self.publisher_hz)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            integrator_hz: default_integrator_hz(),
            publisher_hz: default_publisher_hz(),
        }
    }
}

/// Connection settings for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// NATS messaging URL.
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Address the operator API binds to.
    #[serde(default = "default_observer_host")]
    pub observer_host: String,

    /// Port the operator API listens on.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl InfrastructureConfig {
    /// Override connection settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("NATS_URL") {
            self.nats_url = val;
        }
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            observer_host: default_observer_host(),
            observer_port: default_observer_port(),
        }
    }
}

/// Bus subjects for inbound and outbound traffic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubjectsConfig {
    /// Inbound velocity commands.
    #[serde(default = "default_velocity_subject")]
    pub velocity: String,

    /// Outbound position snapshots.
    #[serde(default = "default_positions_subject")]
    pub positions: String,

    /// Outbound leader-change events.
    #[serde(default = "default_leader_subject")]
    pub leader: String,

    /// Outbound connected-fleet mapping.
    #[serde(default = "default_fleet_subject")]
    pub fleet: String,
}

impl Default for SubjectsConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity_subject(),
            positions: default_positions_subject(),
            leader: default_leader_subject(),
            fleet: default_fleet_subject(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG`
    /// takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn period_for(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}

const fn default_integrator_hz() -> u32 {
    100
}

const fn default_publisher_hz() -> u32 {
    50
}

fn default_nats_url() -> String {
    String::from("nats://localhost:4222")
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_velocity_subject() -> String {
    String::from("cmd_vel")
}

fn default_positions_subject() -> String {
    String::from("april_tag_pos")
}

fn default_leader_subject() -> String {
    String::from("change_leader")
}

fn default_fleet_subject() -> String {
    String::from("sphero_swarm.connected")
}

fn default_log_level() -> String {
    String::from("info")
}
