//! Sensor collaborators
//!
//! Accelerometer and barometer sources deliver readings into an [`EventSink`],
//! the single queue a recording session drains in order.

pub mod backend;
pub mod replay;
pub mod simulated;
mod tasks;

pub use backend::{
    motion_interval, EventSink, MotionReading, MotionSensor, PressureSensor, SensorBackendConfig,
    SensorEvent, SensorFactory, SensorPair, SensorSource, StreamKind, SubscriptionHandle,
};
pub use replay::{ReplayBarometer, ReplayMotion, ReplaySensors};
pub use simulated::{SimulatedBarometer, SimulatedMotion};
