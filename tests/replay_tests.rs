// Integration tests for replaying an exported recording through a session

use anyhow::Result;
use sensor_recorder::sensors::{SensorBackendConfig, SensorFactory, SensorSource};
use sensor_recorder::session::{RecordingSession, SessionConfig};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const RECORDING: &str = "timestamps,acc_x,acc_y,acc_z,pressure
1000,0.1,0,9.8,0
1050,0.2,0,9.8,0
1100,0.3,0,9.8,1013.5
1150,0.4,0,9.8,1013.5
1200,0.5,0,9.8,1013.5
";

#[tokio::test]
async fn test_replay_feeds_recorded_motion() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("sensor_data.mtn");
    fs::write(&path, RECORDING)?;

    let sensors = SensorFactory::create(
        SensorSource::Replay(path),
        SensorBackendConfig {
            motion_rate_hz: 100,
            ..SensorBackendConfig::default()
        },
    )?;

    let session = RecordingSession::new(
        SessionConfig {
            motion_rate_hz: 100,
            ..SessionConfig::default()
        },
        sensors.motion,
        sensors.pressure,
    );

    session.start().await?;

    // Wait for the last row and the pressure change to be replayed
    for _ in 0..400 {
        let snapshot = session.snapshot().await;
        if snapshot.len() == 5 && snapshot.latest().and_then(|s| s.pressure) == Some(1013.5) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let status = session.stop().await;
    let snapshot = session.snapshot().await;

    let xs: Vec<_> = snapshot.rows().map(|s| s.accel_x).collect();
    assert_eq!(
        xs,
        vec![Some(0.1), Some(0.2), Some(0.3), Some(0.4), Some(0.5)]
    );
    assert_eq!(snapshot.latest().and_then(|s| s.pressure), Some(1013.5));
    assert_eq!(status.sample_count, 5);

    Ok(())
}

#[test]
fn test_replay_of_missing_file_fails() {
    let result = SensorFactory::create(
        SensorSource::Replay("/nonexistent/sensor_data.mtn".into()),
        SensorBackendConfig::default(),
    );

    assert!(result.is_err());
}
