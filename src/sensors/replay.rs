// Sensors that play back an exported recording

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::info;

use super::backend::{
    EventSink, MotionReading, MotionSensor, PressureSensor, StreamKind, SubscriptionHandle,
};
use super::tasks::SubscriptionTasks;
use crate::export::SensorDataFile;
use crate::recording::SampleBuffer;

/// Loaded recording, split into a motion and a pressure sensor
pub struct ReplaySensors {
    rows: Arc<SampleBuffer>,
    interval: Duration,
}

impl ReplaySensors {
    pub fn open(path: impl AsRef<Path>, interval: Duration) -> Result<Self> {
        let file = SensorDataFile::open(path)?;
        Ok(Self::from_buffer(file.samples, interval))
    }

    pub fn from_buffer(rows: SampleBuffer, interval: Duration) -> Self {
        Self {
            rows: Arc::new(rows),
            interval,
        }
    }

    pub fn split(self) -> (ReplayMotion, ReplayBarometer) {
        (
            ReplayMotion {
                rows: Arc::clone(&self.rows),
                interval: self.interval,
                tasks: SubscriptionTasks::new(StreamKind::Motion),
            },
            ReplayBarometer {
                rows: self.rows,
                interval: self.interval,
                tasks: SubscriptionTasks::new(StreamKind::Pressure),
            },
        )
    }
}

/// Replays the acceleration columns, one row per update interval
pub struct ReplayMotion {
    rows: Arc<SampleBuffer>,
    interval: Duration,
    tasks: SubscriptionTasks,
}

#[async_trait::async_trait]
impl MotionSensor for ReplayMotion {
    fn set_update_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle> {
        let rows = Arc::clone(&self.rows);
        let period = self.interval;

        let handle = self.tasks.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for sample in rows.rows() {
                ticker.tick().await;
                let reading = MotionReading::new(
                    sample.accel_x.unwrap_or(f64::NAN),
                    sample.accel_y.unwrap_or(f64::NAN),
                    sample.accel_z.unwrap_or(f64::NAN),
                );
                if !sink.motion(reading).await {
                    return;
                }
            }

            info!("Motion replay finished ({} rows)", rows.len());
        });

        info!(
            "Motion replay subscription {} started ({} rows)",
            handle,
            self.rows.len()
        );

        Ok(handle)
    }

    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()> {
        self.tasks.cancel(handle);
        Ok(())
    }

    fn name(&self) -> &str {
        "replay-motion"
    }
}

/// Replays the pressure column, emitting only when the value changes
pub struct ReplayBarometer {
    rows: Arc<SampleBuffer>,
    interval: Duration,
    tasks: SubscriptionTasks,
}

#[async_trait::async_trait]
impl PressureSensor for ReplayBarometer {
    async fn is_available(&self) -> bool {
        self.rows.rows().any(|sample| sample.pressure.is_some())
    }

    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle> {
        let rows = Arc::clone(&self.rows);
        let period = self.interval;

        let handle = self.tasks.spawn(async move {
            // Trail the motion replay by half a tick so each change lands on its own row
            sleep(period / 2).await;

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = None;

            for sample in rows.rows() {
                ticker.tick().await;
                let Some(hpa) = sample.pressure else {
                    continue;
                };
                if last == Some(hpa) {
                    continue;
                }
                last = Some(hpa);
                if !sink.pressure(hpa).await {
                    return;
                }
            }
        });

        info!("Pressure replay subscription {} started", handle);

        Ok(handle)
    }

    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()> {
        self.tasks.cancel(handle);
        Ok(())
    }

    fn name(&self) -> &str {
        "replay-barometer"
    }
}
