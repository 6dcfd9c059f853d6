// Synthetic sensors for running without device hardware

use anyhow::Result;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::info;

use super::backend::{
    EventSink, MotionReading, MotionSensor, PressureSensor, StreamKind, SubscriptionHandle,
};
use super::tasks::SubscriptionTasks;

/// Standard gravity in m/s²
const GRAVITY: f64 = 9.80665;

/// Sea-level standard pressure in hPa
const SEA_LEVEL_HPA: f64 = 1013.25;

/// Accelerometer that reports a device resting face up with a slight sway
pub struct SimulatedMotion {
    interval: Duration,
    tasks: SubscriptionTasks,
}

impl SimulatedMotion {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tasks: SubscriptionTasks::new(StreamKind::Motion),
        }
    }

    /// Reading for the `tick`-th update
    pub fn reading_at(tick: u64, interval: Duration) -> MotionReading {
        let t = tick as f64 * interval.as_secs_f64();
        MotionReading::new(
            0.05 * (t * 2.0).sin(),
            0.05 * (t * 3.0).cos(),
            GRAVITY + 0.01 * (t * 5.0).sin(),
        )
    }
}

#[async_trait::async_trait]
impl MotionSensor for SimulatedMotion {
    fn set_update_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle> {
        let period = self.interval;

        let handle = self.tasks.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut tick = 0u64;

            loop {
                ticker.tick().await;
                if !sink.motion(Self::reading_at(tick, period)).await {
                    break;
                }
                tick += 1;
            }
        });

        info!(
            "Simulated motion subscription {} started ({:.1}ms interval)",
            handle,
            period.as_secs_f64() * 1000.0
        );

        Ok(handle)
    }

    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()> {
        if self.tasks.cancel(handle) {
            info!("Simulated motion subscription {} stopped", handle);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated-motion"
    }
}

/// Barometer with a slow drift and an uneven reporting cadence
pub struct SimulatedBarometer {
    interval: Duration,
    available: bool,
    tasks: SubscriptionTasks,
}

impl SimulatedBarometer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            available: true,
            tasks: SubscriptionTasks::new(StreamKind::Pressure),
        }
    }

    /// A barometer that reports itself as missing, like devices without one
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Duration::from_secs(1))
        }
    }

    /// Pressure for the `n`-th report
    pub fn reading_at(n: u64) -> f64 {
        SEA_LEVEL_HPA - 0.002 * n as f64 + 0.01 * (n as f64 * 0.7).sin()
    }

    /// Delay before the `n`-th report: between 0.6 and 1.4 times the interval
    fn delay_before(n: u64, interval: Duration) -> Duration {
        let factor = 0.6 + 0.2 * ((n * 7) % 5) as f64;
        interval.mul_f64(factor)
    }
}

#[async_trait::async_trait]
impl PressureSensor for SimulatedBarometer {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn subscribe(&mut self, sink: EventSink) -> Result<SubscriptionHandle> {
        if !self.available {
            anyhow::bail!("No barometer on this device");
        }

        let period = self.interval;

        let handle = self.tasks.spawn(async move {
            let mut n = 0u64;
            loop {
                sleep(Self::delay_before(n, period)).await;
                if !sink.pressure(Self::reading_at(n)).await {
                    break;
                }
                n += 1;
            }
        });

        info!("Simulated barometer subscription {} started", handle);

        Ok(handle)
    }

    async fn unsubscribe(&mut self, handle: SubscriptionHandle) -> Result<()> {
        if self.tasks.cancel(handle) {
            info!("Simulated barometer subscription {} stopped", handle);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated-barometer"
    }
}
