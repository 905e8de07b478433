//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::registry::{RegistrySettings, TimetablePolicy};

/// Runtime configuration for the delay server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Registry JSON file.
    pub registry_path: PathBuf,

    /// Timetable JSON file (read-only).
    pub timetable_path: PathBuf,

    /// Static assets directory served under `/static`.
    pub static_dir: PathBuf,

    /// Station and timetable policy for the registry.
    pub registry: RegistrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            registry_path: PathBuf::from("train_data.json"),
            timetable_path: PathBuf::from("train_schedule.json"),
            static_dir: PathBuf::from("static"),
            registry: RegistrySettings::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, using defaults for unset keys.
    ///
    /// Recognised keys: `DELAY_BIND_ADDR`, `DELAY_REGISTRY_PATH`,
    /// `DELAY_TIMETABLE_PATH`, `DELAY_STATIC_DIR`, `DELAY_STATION`,
    /// `DELAY_TIMETABLE_POLICY`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("DELAY_BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "DELAY_BIND_ADDR",
                value: addr.clone(),
            })?;
        }
        if let Some(path) = get("DELAY_REGISTRY_PATH") {
            config.registry_path = PathBuf::from(path);
        }
        if let Some(path) = get("DELAY_TIMETABLE_PATH") {
            config.timetable_path = PathBuf::from(path);
        }
        if let Some(dir) = get("DELAY_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(station) = get("DELAY_STATION") {
            config.registry.station = station.trim().to_string();
        }
        if let Some(policy) = get("DELAY_TIMETABLE_POLICY") {
            config.registry.policy =
                policy
                    .parse::<TimetablePolicy>()
                    .map_err(|_| ConfigError::Invalid {
                        key: "DELAY_TIMETABLE_POLICY",
                        value: policy.clone(),
                    })?;
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
