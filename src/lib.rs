pub mod config;
pub mod derived;
pub mod export;
pub mod http;
pub mod nats;
pub mod recording;
pub mod sensors;
pub mod session;

pub use config::Config;
pub use export::{ExportOutcome, Exporter, FileStore, LocalFileStore, SensorDataFile, ShareTarget};
pub use http::{create_router, AppState};
pub use nats::{ExportMessage, NatsClient, NatsShare};
pub use recording::{Sample, SampleBuffer, StreamAligner};
pub use sensors::{
    EventSink, MotionReading, MotionSensor, PressureSensor, SensorEvent, SensorFactory,
    SensorSource, SubscriptionHandle,
};
pub use session::{RecordingSession, SessionConfig, SessionState, SessionStatus};
