use anyhow::Result;
use sensor_recorder::sensors::SensorSource;
use sensor_recorder::Config;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const SAMPLE_CONFIG: &str = r#"
[service]
name = "sensor-recorder"

[service.http]
bind = "127.0.0.1"
port = 8787

[sensors]
source = "simulated"
motion_rate_hz = 60
pressure_interval_ms = 1000

[export]
documents_dir = "~/.sensor-recorder/documents"
file_name = "sensor_data.mtn"
share = "none"

[nats]
url = "nats://localhost:4222"
"#;

fn write_config(dir: &TempDir, content: &str) -> Result<String> {
    let path = dir.path().join("sensor-recorder.toml");
    fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

#[test]
fn test_load_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load(&write_config(&dir, SAMPLE_CONFIG)?)?;

    assert_eq!(cfg.service.name, "sensor-recorder");
    assert_eq!(cfg.service.http.port, 8787);
    assert_eq!(cfg.export.file_name, "sensor_data.mtn");
    assert!(matches!(cfg.sensors.source()?, SensorSource::Simulated));

    let backend = cfg.sensors.backend_config();
    assert_eq!(backend.motion_rate_hz, 60);
    assert_eq!(backend.pressure_interval, Duration::from_millis(1000));
    assert_eq!(backend.motion_interval(), Duration::from_secs_f64(1.0 / 60.0));

    Ok(())
}

#[test]
fn test_documents_dir_expands_home() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load(&write_config(&dir, SAMPLE_CONFIG)?)?;

    let documents = cfg.export.documents_dir();
    assert!(!documents.to_string_lossy().starts_with('~'));
    assert!(documents.ends_with(PathBuf::from(".sensor-recorder/documents")));

    Ok(())
}

#[test]
fn test_replay_source_requires_path() -> Result<()> {
    let dir = TempDir::new()?;
    let content = SAMPLE_CONFIG.replace("source = \"simulated\"", "source = \"replay\"");
    let cfg = Config::load(&write_config(&dir, &content)?)?;

    assert!(cfg.sensors.source().is_err());

    Ok(())
}

#[test]
fn test_unknown_source_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let content = SAMPLE_CONFIG.replace("source = \"simulated\"", "source = \"gyroscope\"");
    let cfg = Config::load(&write_config(&dir, &content)?)?;

    assert!(cfg.sensors.source().is_err());

    Ok(())
}

#[test]
fn test_missing_config_file_fails() {
    assert!(Config::load("/nonexistent/sensor-recorder").is_err());
}
