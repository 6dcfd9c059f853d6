use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::recording::{Sample, SampleBuffer};

/// Fixed file name of the exported recording
pub const EXPORT_FILE_NAME: &str = "sensor_data.mtn";

/// First line of every exported recording
pub const HEADER: &str = "timestamps,acc_x,acc_y,acc_z,pressure";

/// Serialize a buffer to the delimited `.mtn` text format
///
/// Each line is `\n`-terminated. Timestamps are epoch milliseconds; missing,
/// zero and non-finite values are written as `0`.
pub fn render(buffer: &SampleBuffer) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + buffer.len() * 48);
    out.push_str(HEADER);
    out.push('\n');

    for sample in buffer.rows() {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            sample.timestamp.timestamp_millis(),
            render_value(sample.accel_x),
            render_value(sample.accel_y),
            render_value(sample.accel_z),
            render_value(sample.pressure),
        );
    }

    out
}

/// Render one numeric field
pub fn render_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v.to_string(),
        _ => "0".to_string(),
    }
}

/// Parse one data line back into a sample
pub fn parse_line(line: &str) -> Result<Sample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        bail!("Expected 5 fields, found {}", fields.len());
    }

    let millis: i64 = fields[0]
        .parse()
        .with_context(|| format!("Invalid timestamp: {:?}", fields[0]))?;
    let timestamp: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
        .with_context(|| format!("Timestamp out of range: {}", millis))?;

    Ok(Sample {
        timestamp,
        accel_x: parse_value(fields[1])?,
        accel_y: parse_value(fields[2])?,
        accel_z: parse_value(fields[3])?,
        pressure: parse_value(fields[4])?,
    })
}

fn parse_value(field: &str) -> Result<Option<f64>> {
    if field.is_empty() {
        return Ok(None);
    }
    let value: f64 = field
        .parse()
        .with_context(|| format!("Invalid number: {:?}", field))?;
    Ok(Some(value))
}
