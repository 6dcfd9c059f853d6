use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::sensors::{SensorBackendConfig, SensorSource};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub sensors: SensorsConfig,
    pub export: ExportConfig,
    pub nats: NatsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct SensorsConfig {
    /// "simulated" or "replay"
    pub source: String,
    pub motion_rate_hz: u32,
    pub pressure_interval_ms: u64,
    /// Recording played back when `source = "replay"`
    pub replay_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    pub documents_dir: String,
    pub file_name: String,
    /// "none" or "nats"
    pub share: String,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

impl Config {
    /// Load from a config file (extension optional) with
    /// `SENSOR_RECORDER__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SENSOR_RECORDER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl SensorsConfig {
    pub fn source(&self) -> Result<SensorSource> {
        match self.source.as_str() {
            "simulated" => Ok(SensorSource::Simulated),
            "replay" => match &self.replay_path {
                Some(path) => Ok(SensorSource::Replay(expand_path(path))),
                None => bail!("sensors.replay_path is required when sensors.source = \"replay\""),
            },
            other => bail!("Unknown sensor source: {:?}", other),
        }
    }

    pub fn backend_config(&self) -> SensorBackendConfig {
        SensorBackendConfig {
            motion_rate_hz: self.motion_rate_hz,
            pressure_interval: Duration::from_millis(self.pressure_interval_ms),
        }
    }
}

impl ExportConfig {
    pub fn documents_dir(&self) -> PathBuf {
        expand_path(&self.documents_dir)
    }
}

/// Expand `~` and environment variables in a configured path
fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
