// Tests for the HTTP control API, driven through the router without a socket

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use sensor_recorder::export::{Exporter, LocalFileStore, Unavailable};
use sensor_recorder::sensors::{SensorBackendConfig, SensorFactory, SensorSource};
use sensor_recorder::session::{RecordingSession, SessionConfig};
use sensor_recorder::{create_router, AppState};
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(documents: &std::path::Path) -> Result<Router> {
    let sensors = SensorFactory::create(
        SensorSource::Simulated,
        SensorBackendConfig {
            motion_rate_hz: 100,
            pressure_interval: Duration::from_millis(30),
        },
    )?;

    let session = RecordingSession::new(
        SessionConfig {
            session_id: "http-test".to_string(),
            motion_rate_hz: 100,
            ..SessionConfig::default()
        },
        sensors.motion,
        sensors.pressure,
    );
    let exporter = Exporter::new(Box::new(LocalFileStore::new(documents)), Box::new(Unavailable));

    Ok(create_router(AppState::new(session, exporter)))
}

async fn call(app: &Router, method: &str, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty())?)
        .await?;

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    Ok((status, json))
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = app(temp_dir.path())?;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"OK");

    Ok(())
}

#[tokio::test]
async fn test_status_starts_idle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = app(temp_dir.path())?;

    let (status, json) = call(&app, "GET", "/session/status").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], "http-test");
    assert_eq!(json["state"], "idle");
    assert_eq!(json["motion_active"], false);
    assert_eq!(json["sample_count"], 0);

    Ok(())
}

#[tokio::test]
async fn test_toggle_records_and_export_saves() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = app(temp_dir.path())?;

    let (status, json) = call(&app, "POST", "/session/toggle").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "recording");
    assert_eq!(json["motion_active"], true);
    assert_eq!(json["pressure_active"], true);

    tokio::time::sleep(Duration::from_millis(200)).await;

    let (status, json) = call(&app, "POST", "/session/toggle").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "idle");
    assert!(json["sample_count"].as_u64().unwrap_or(0) > 0);

    let (status, json) = call(&app, "POST", "/session/export").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["shared"], false);
    assert_eq!(
        json["notice"],
        "Sharing not available: Please save the file manually."
    );

    let written = std::fs::read_to_string(temp_dir.path().join("sensor_data.mtn"))?;
    assert!(written.starts_with("timestamps,acc_x,acc_y,acc_z,pressure\n"));
    assert_eq!(
        written.lines().count() as u64 - 1,
        json["rows"].as_u64().unwrap_or(0)
    );

    Ok(())
}

#[tokio::test]
async fn test_stop_when_idle_is_ok() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = app(temp_dir.path())?;

    let (status, json) = call(&app, "POST", "/session/stop").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "idle");

    Ok(())
}

#[tokio::test]
async fn test_export_failure_returns_500() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("documents");
    std::fs::write(&blocker, "not a directory")?;
    let app = app(&blocker)?;

    let (status, json) = call(&app, "POST", "/session/export").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Failed to export recording"));

    Ok(())
}
