use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use super::format::{parse_line, HEADER};
use crate::recording::SampleBuffer;

/// A recording read back from an exported `.mtn` file
pub struct SensorDataFile {
    pub path: String,
    pub duration_seconds: f64,
    pub samples: SampleBuffer,
}

impl SensorDataFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening sensor data file: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sensor data file: {}", path.display()))?;

        let mut recording = Self::parse(&content)?;
        recording.path = path.display().to_string();

        info!(
            "Sensor data loaded: {:.1}s, {} samples",
            recording.duration_seconds,
            recording.samples.len()
        );

        Ok(recording)
    }

    /// Parse the contents of an exported file
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();

        match lines.next() {
            Some(header) if header.trim() == HEADER => {}
            Some(header) => bail!("Unexpected header: {:?}", header),
            None => bail!("Sensor data file is empty"),
        }

        let mut samples = SampleBuffer::new();
        for (index, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            // +2: one-based, after the header
            let sample = parse_line(line).with_context(|| format!("Line {}", index + 2))?;
            samples.push_row(sample);
        }

        let duration_seconds = match (samples.first_timestamp(), samples.latest()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        };

        Ok(Self {
            path: String::new(),
            duration_seconds,
            samples,
        })
    }
}
