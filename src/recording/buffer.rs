use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pressure written into rows recorded before the first barometer reading
pub const PRESSURE_PLACEHOLDER: f64 = 0.0;

/// A single row of the recording table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Capture instant of the motion event that created the row
    pub timestamp: DateTime<Utc>,
    /// Acceleration along X (None when missing)
    pub accel_x: Option<f64>,
    /// Acceleration along Y (None when missing)
    pub accel_y: Option<f64>,
    /// Acceleration along Z (None when missing)
    pub accel_z: Option<f64>,
    /// Pressure in hPa (None when missing)
    pub pressure: Option<f64>,
}

/// In-memory, append-only table of sensor readings for one recording session
///
/// Stored column-wise. All five columns have the same length after every
/// mutation completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffer {
    timestamps: Vec<DateTime<Utc>>,
    accel_x: Vec<Option<f64>>,
    accel_y: Vec<Option<f64>>,
    accel_z: Vec<Option<f64>>,
    pressure: Vec<Option<f64>>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every column
    pub fn reset(&mut self) {
        self.timestamps.clear();
        self.accel_x.clear();
        self.accel_y.clear();
        self.accel_z.clear();
        self.pressure.clear();
    }

    /// Append a row driven by the motion stream
    ///
    /// The pressure column carries forward the previous row's value, or
    /// [`PRESSURE_PLACEHOLDER`] when this is the first row.
    pub fn append_motion(&mut self, timestamp: DateTime<Utc>, x: f64, y: f64, z: f64) {
        let carried = self
            .pressure
            .last()
            .copied()
            .unwrap_or(Some(PRESSURE_PLACEHOLDER));

        self.timestamps.push(timestamp);
        self.accel_x.push(finite(x));
        self.accel_y.push(finite(y));
        self.accel_z.push(finite(z));
        self.pressure.push(carried);

        debug_assert!(self.columns_aligned());
    }

    /// Overwrite the pressure of the most recent row
    ///
    /// Returns `false` (and changes nothing) when the buffer is empty.
    pub fn update_latest_pressure(&mut self, pressure: f64) -> bool {
        match self.pressure.last_mut() {
            Some(slot) => {
                *slot = finite(pressure);
                true
            }
            None => false,
        }
    }

    /// Append a complete row, e.g. one read back from an exported file
    pub fn push_row(&mut self, sample: Sample) {
        self.timestamps.push(sample.timestamp);
        self.accel_x.push(sample.accel_x);
        self.accel_y.push(sample.accel_y);
        self.accel_z.push(sample.accel_z);
        self.pressure.push(sample.pressure);
    }

    /// Rows in index order
    ///
    /// The iterator is cheap to clone, so a consumer can restart it.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            buffer: self,
            index: 0,
        }
    }

    /// Row at `index`, if any
    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            timestamp: *self.timestamps.get(index)?,
            accel_x: self.accel_x[index],
            accel_y: self.accel_y[index],
            accel_z: self.accel_z[index],
            pressure: self.pressure[index],
        })
    }

    /// Most recently appended row
    pub fn latest(&self) -> Option<Sample> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Lengths of the five columns, in export order
    pub fn column_lengths(&self) -> [usize; 5] {
        [
            self.timestamps.len(),
            self.accel_x.len(),
            self.accel_y.len(),
            self.accel_z.len(),
            self.pressure.len(),
        ]
    }

    fn columns_aligned(&self) -> bool {
        let lengths = self.column_lengths();
        lengths.iter().all(|&len| len == lengths[0])
    }
}

impl FromIterator<Sample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut buffer = SampleBuffer::new();
        for sample in iter {
            buffer.push_row(sample);
        }
        buffer
    }
}

/// Iterator over the rows of a [`SampleBuffer`]
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    buffer: &'a SampleBuffer,
    index: usize,
}

impl Iterator for Rows<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let sample = self.buffer.get(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
