use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Which sensor stream an event or subscription belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Tri-axial accelerometer, fixed rate
    Motion,
    /// Barometer, irregular rate
    Pressure,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Motion => write!(f, "motion"),
            StreamKind::Pressure => write!(f, "pressure"),
        }
    }
}

/// Acceleration along the three device axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MotionReading {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One event delivered by a sensor subscription
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Motion {
        /// When the event entered the sink
        captured_at: DateTime<Utc>,
        reading: MotionReading,
    },
    Pressure {
        captured_at: DateTime<Utc>,
        /// Atmospheric pressure in hPa
        hpa: f64,
    },
}

impl SensorEvent {
    pub fn kind(&self) -> StreamKind {
        match self {
            SensorEvent::Motion { .. } => StreamKind::Motion,
            SensorEvent::Pressure { .. } => StreamKind::Pressure,
        }
    }
}

/// Opaque token for a live sensor subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: Uuid,
    kind: StreamKind,
}

impl SubscriptionHandle {
    pub fn new(kind: StreamKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

/// Sending half of a session's event queue
///
/// Every subscription of a session gets a clone. Events are stamped with the
/// wall-clock instant they are handed in, not with any sensor-internal clock.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<SensorEvent>,
}

impl EventSink {
    /// Create a sink and the receiver that drains it. A capacity of zero is
    /// treated as one.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SensorEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Deliver a motion reading. Returns `false` once the session is gone.
    pub async fn motion(&self, reading: MotionReading) -> bool {
        self.tx
            .send(SensorEvent::Motion {
                captured_at: Utc::now(),
                reading,
            })
            .await
            .is_ok()
    }

    /// Deliver a pressure reading in hPa. Returns `false` once the session is gone.
    pub async fn pressure(&self, hpa: f64) -> bool {
        self.tx
            .send(SensorEvent::Pressure {
                captured_at: Utc::now(),
                hpa,
            })
            .await
            .is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Configuration shared by sensor backends
#[derive(Debug, Clone)]
pub struct SensorBackendConfig {
    /// Accelerometer update rate in Hz
    pub motion_rate_hz: u32,
    /// Average barometer cadence (simulated backends only)
    pub pressure_interval: Duration,
}

impl SensorBackendConfig {
    /// Interval between motion updates for the configured rate
    pub fn motion_interval(&self) -> Duration {
        motion_interval(self.motion_rate_hz)
    }
}

impl Default for SensorBackendConfig {
    fn default() -> Self {
        Self {
            motion_rate_hz: 60,                          // Same as the phone app
            pressure_interval: Duration::from_millis(1000), // Barometers report ~1 Hz
        }
    }
}

/// Update interval for a rate in Hz (a zero rate is treated as 1 Hz)
pub fn motion_interval(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64)
}

/// Accelerometer collaborator
#[async_trait::async_trait]
pub trait MotionSensor: Send + Sync {
    /// Set the interval between motion updates
    fn set_update_interval(&mut self, interval: Duration);

    /// Start delivering readings into `sink`
    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle>;

    /// Stop a subscription. Unknown handles are ignored.
    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()>;

    /// Get sensor name for logging
    fn name(&self) -> &str;
}

/// Barometer collaborator
#[async_trait::async_trait]
pub trait PressureSensor: Send + Sync {
    /// Whether the device has a barometer at all
    async fn is_available(&self) -> bool;

    /// Start delivering readings into `sink`
    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle>;

    /// Stop a subscription. Unknown handles are ignored.
    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()>;

    /// Get sensor name for logging
    fn name(&self) -> &str;
}

/// Where sensor readings come from
#[derive(Debug, Clone)]
pub enum SensorSource {
    /// Synthetic readings (steady motion, jittered pressure)
    Simulated,
    /// Play back a previously exported recording
    Replay(PathBuf),
}

/// Motion and pressure sensors built from one source
pub struct SensorPair {
    pub motion: Box<dyn MotionSensor>,
    pub pressure: Box<dyn PressureSensor>,
}

/// Sensor backend factory
pub struct SensorFactory;

impl SensorFactory {
    /// Create both sensor collaborators for the given source
    pub fn create(source: SensorSource, config: SensorBackendConfig) -> Result<SensorPair> {
        match source {
            SensorSource::Simulated => {
                use super::simulated::{SimulatedBarometer, SimulatedMotion};
                Ok(SensorPair {
                    motion: Box::new(SimulatedMotion::new(config.motion_interval())),
                    pressure: Box::new(SimulatedBarometer::new(config.pressure_interval)),
                })
            }

            SensorSource::Replay(path) => {
                use super::replay::ReplaySensors;
                let replay = ReplaySensors::open(&path, config.motion_interval())?;
                let (motion, pressure) = replay.split();
                Ok(SensorPair {
                    motion: Box::new(motion),
                    pressure: Box::new(pressure),
                })
            }
        }
    }
}
