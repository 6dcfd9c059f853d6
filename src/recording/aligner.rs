use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::buffer::SampleBuffer;
use crate::sensors::{MotionReading, SensorEvent};

/// Counters kept by a [`StreamAligner`], readable while recording
#[derive(Debug, Default)]
pub struct AlignerStats {
    motion_rows: AtomicUsize,
    pressure_updates: AtomicUsize,
    dropped_pressure: AtomicUsize,
}

impl AlignerStats {
    /// Rows appended by motion events
    pub fn motion_rows(&self) -> usize {
        self.motion_rows.load(Ordering::SeqCst)
    }

    /// Pressure events that overwrote a row
    pub fn pressure_updates(&self) -> usize {
        self.pressure_updates.load(Ordering::SeqCst)
    }

    /// Pressure events that arrived before the first motion row
    pub fn dropped_pressure(&self) -> usize {
        self.dropped_pressure.load(Ordering::SeqCst)
    }
}

/// Merges the motion and pressure streams into one table
///
/// Motion events drive the rows. Pressure is held as a last-known value on
/// the motion clock: a pressure event overwrites the newest row and never
/// creates one.
#[derive(Debug, Default)]
pub struct StreamAligner {
    stats: Arc<AlignerStats>,
}

impl StreamAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to this aligner's counters
    pub fn stats(&self) -> Arc<AlignerStats> {
        Arc::clone(&self.stats)
    }

    /// Apply one event from the serialized event queue
    pub fn apply(&mut self, buffer: &mut SampleBuffer, event: SensorEvent) {
        match event {
            SensorEvent::Motion {
                captured_at,
                reading,
            } => self.on_motion(buffer, captured_at, reading),
            SensorEvent::Pressure { hpa, .. } => self.on_pressure(buffer, hpa),
        }
    }

    pub fn on_motion(
        &mut self,
        buffer: &mut SampleBuffer,
        captured_at: DateTime<Utc>,
        reading: MotionReading,
    ) {
        buffer.append_motion(captured_at, reading.x, reading.y, reading.z);
        self.stats.motion_rows.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_pressure(&mut self, buffer: &mut SampleBuffer, hpa: f64) {
        if buffer.update_latest_pressure(hpa) {
            self.stats.pressure_updates.fetch_add(1, Ordering::SeqCst);
        } else {
            let dropped = self.stats.dropped_pressure.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(
                "Dropped pressure reading {:.3} hPa: no motion row yet ({} dropped)",
                hpa, dropped
            );
        }
    }
}
