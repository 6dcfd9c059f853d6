// Integration tests for exporting recordings
//
// These tests verify the exact `.mtn` text format and how the exporter
// reacts to its persistence and share collaborators.

use anyhow::Result;
use chrono::DateTime;
use sensor_recorder::export::{
    render, ExportOutcome, Exporter, FileStore, LocalFileStore, SensorDataFile, ShareTarget,
    Unavailable, EXPORT_FILE_NAME, MANUAL_RETRIEVAL_NOTICE,
};
use sensor_recorder::recording::{Sample, SampleBuffer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn sample(millis: i64, x: f64, y: f64, z: f64, pressure: Option<f64>) -> Sample {
    Sample {
        timestamp: DateTime::from_timestamp_millis(millis).unwrap(),
        accel_x: Some(x),
        accel_y: Some(y),
        accel_z: Some(z),
        pressure,
    }
}

fn two_row_buffer() -> SampleBuffer {
    [
        sample(1000, 1.0, 2.0, 3.0, None),
        sample(1060, 4.0, 5.0, 6.0, Some(7.5)),
    ]
    .into_iter()
    .collect()
}

/// Share target that records every path it is asked to share
#[derive(Clone, Default)]
struct RecordingShare {
    shared: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait::async_trait]
impl ShareTarget for RecordingShare {
    async fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, path: &Path) -> Result<()> {
        self.shared.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Store that always fails, like a full or read-only disk
struct FailingStore;

#[async_trait::async_trait]
impl FileStore for FailingStore {
    async fn write(&self, relative_path: &str, _content: &str) -> Result<PathBuf> {
        anyhow::bail!("disk full while writing {}", relative_path)
    }
}

#[test]
fn test_render_exact_format() {
    let text = render(&two_row_buffer());

    assert_eq!(
        text,
        "timestamps,acc_x,acc_y,acc_z,pressure\n1000,1,2,3,0\n1060,4,5,6,7.5\n"
    );
}

#[test]
fn test_render_empty_buffer_is_header_only() {
    assert_eq!(
        render(&SampleBuffer::new()),
        "timestamps,acc_x,acc_y,acc_z,pressure\n"
    );
}

#[test]
fn test_render_substitutes_zero_for_missing_values() {
    let buffer: SampleBuffer = [Sample {
        timestamp: DateTime::from_timestamp_millis(1700000000123).unwrap(),
        accel_x: None,
        accel_y: Some(-0.0),
        accel_z: Some(f64::NAN),
        pressure: Some(1013.25),
    }]
    .into_iter()
    .collect();

    let text = render(&buffer);
    assert_eq!(text.lines().nth(1), Some("1700000000123,0,0,0,1013.25"));
}

#[test]
fn test_render_keeps_full_precision() {
    let buffer: SampleBuffer = [sample(5, 0.1 + 0.2, -9.80665, 1e-3, Some(1012.987654))]
        .into_iter()
        .collect();

    assert_eq!(
        render(&buffer).lines().nth(1),
        Some("5,0.30000000000000004,-9.80665,0.001,1012.987654")
    );
}

#[tokio::test]
async fn test_export_without_share_saves_file_and_asks_for_manual_retrieval() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let documents = temp_dir.path().join("documents");

    let exporter = Exporter::new(Box::new(LocalFileStore::new(&documents)), Box::new(Unavailable));
    let outcome = exporter.export(&two_row_buffer()).await?;

    assert!(outcome.needs_manual_retrieval());
    assert_eq!(outcome.notice(), Some(MANUAL_RETRIEVAL_NOTICE));
    assert_eq!(outcome.rows(), 2);
    assert_eq!(outcome.path(), &documents.join(EXPORT_FILE_NAME));

    let written = fs::read_to_string(outcome.path())?;
    assert_eq!(
        written,
        "timestamps,acc_x,acc_y,acc_z,pressure\n1000,1,2,3,0\n1060,4,5,6,7.5\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_export_shares_written_path() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let share = RecordingShare::default();

    let exporter = Exporter::new(
        Box::new(LocalFileStore::new(temp_dir.path())),
        Box::new(share.clone()),
    );
    let outcome = exporter.export(&two_row_buffer()).await?;

    let expected = temp_dir.path().join("sensor_data.mtn");
    assert_eq!(
        outcome,
        ExportOutcome::Shared {
            path: expected.clone(),
            rows: 2
        }
    );
    assert_eq!(outcome.notice(), None);
    assert_eq!(*share.shared.lock().unwrap(), vec![expected]);

    Ok(())
}

#[tokio::test]
async fn test_export_write_failure_is_an_error() {
    let share = RecordingShare::default();
    let exporter = Exporter::new(Box::new(FailingStore), Box::new(share.clone()));

    let result = exporter.export(&two_row_buffer()).await;

    let err = result.expect_err("Write failure must fail the export");
    assert!(format!("{:#}", err).contains("disk full"));
    assert!(
        share.shared.lock().unwrap().is_empty(),
        "Nothing is shared when the write fails"
    );
}

#[tokio::test]
async fn test_export_into_unwritable_directory_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // A regular file where the documents directory should be
    let blocker = temp_dir.path().join("documents");
    fs::write(&blocker, "not a directory")?;

    let exporter = Exporter::new(Box::new(LocalFileStore::new(&blocker)), Box::new(Unavailable));
    assert!(exporter.export(&two_row_buffer()).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_export_custom_file_name() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let exporter = Exporter::new(Box::new(LocalFileStore::new(temp_dir.path())), Box::new(Unavailable))
        .with_file_name("walk.mtn");
    let outcome = exporter.export(&two_row_buffer()).await?;

    assert_eq!(outcome.path(), &temp_dir.path().join("walk.mtn"));

    Ok(())
}

#[tokio::test]
async fn test_exported_file_reads_back() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(Box::new(LocalFileStore::new(temp_dir.path())), Box::new(Unavailable));

    let outcome = exporter.export(&two_row_buffer()).await?;
    let file = SensorDataFile::open(outcome.path())?;

    assert_eq!(file.samples.len(), 2);
    assert!((file.duration_seconds - 0.06).abs() < 1e-9);
    assert!(file.path.contains("sensor_data.mtn"));

    let rows: Vec<_> = file.samples.rows().collect();
    assert_eq!(rows[0].timestamp.timestamp_millis(), 1000);
    assert_eq!(rows[0].pressure, Some(0.0), "Missing pressure was written as 0");
    assert_eq!(rows[1].accel_z, Some(6.0));
    assert_eq!(rows[1].pressure, Some(7.5));

    Ok(())
}

#[test]
fn test_parse_rejects_unknown_header() {
    let result = SensorDataFile::parse("time,x,y,z\n1,2,3,4\n");
    assert!(result.is_err());
}

#[test]
fn test_parse_reports_bad_line() {
    let content = "timestamps,acc_x,acc_y,acc_z,pressure\n1000,1,2,3,0\n1016,abc,2,3,0\n";

    let err = SensorDataFile::parse(content).err().expect("Bad number must fail");
    assert!(format!("{:#}", err).contains("Line 3"));
}
