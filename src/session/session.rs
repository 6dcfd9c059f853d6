use super::config::SessionConfig;
use super::status::{SessionState, SessionStatus};
use crate::derived::{
    acceleration_magnitude, format_elapsed, format_magnitude, format_pressure, hpa_to_pa,
    Atmosphere,
};
use crate::export::{ExportOutcome, Exporter};
use crate::recording::{AlignerStats, SampleBuffer, StreamAligner};
use crate::sensors::{
    motion_interval, EventSink, MotionSensor, PressureSensor, SensorEvent, SubscriptionHandle,
};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A recording session that owns the sensor subscriptions and the sample table
///
/// Both sensor streams feed one event queue. A single task drains that queue
/// through a [`StreamAligner`], so rows are only ever mutated in delivery order.
pub struct RecordingSession {
    /// Session configuration
    config: SessionConfig,

    /// Accelerometer collaborator
    motion: Mutex<Box<dyn MotionSensor>>,

    /// Barometer collaborator
    pressure: Mutex<Box<dyn PressureSensor>>,

    /// Rows of the current (or last) session
    buffer: Arc<Mutex<SampleBuffer>>,

    /// Subscription handles and the event loop, present while recording
    live: Mutex<LiveSubscriptions>,
}

struct LiveSubscriptions {
    motion: Option<SubscriptionHandle>,
    pressure: Option<SubscriptionHandle>,
    event_loop: Option<EventLoop>,
    /// Counters of the most recent session
    stats: Arc<AlignerStats>,
}

/// The single writer of the sample table
struct EventLoop {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl EventLoop {
    fn spawn(
        mut aligner: StreamAligner,
        mut events: mpsc::Receiver<SensorEvent>,
        buffer: Arc<Mutex<SampleBuffer>>,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            debug!("Event loop started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        // Refuse new events, keep the ones already accepted
                        events.close();
                        let mut drained = 0usize;
                        while let Some(event) = events.recv().await {
                            let mut buffer = buffer.lock().await;
                            aligner.apply(&mut buffer, event);
                            drained += 1;
                        }
                        debug!("Applied {} queued events on shutdown", drained);
                        break;
                    }

                    event = events.recv() => match event {
                        Some(event) => {
                            let mut buffer = buffer.lock().await;
                            aligner.apply(&mut buffer, event);
                        }
                        None => break,
                    },
                }
            }

            debug!("Event loop stopped");
        });

        Self { shutdown, task }
    }

    /// Close the queue, apply what it still holds and wait for the task
    async fn shutdown(self) {
        // The task may already have exited on its own
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            error!("Event loop panicked: {}", e);
        }
    }
}

impl RecordingSession {
    /// Create a new, idle recording session
    pub fn new(
        config: SessionConfig,
        motion: Box<dyn MotionSensor>,
        pressure: Box<dyn PressureSensor>,
    ) -> Self {
        info!(
            "Creating recording session: {} (motion: {}, pressure: {})",
            config.session_id,
            motion.name(),
            pressure.name()
        );

        Self {
            config,
            motion: Mutex::new(motion),
            pressure: Mutex::new(pressure),
            buffer: Arc::new(Mutex::new(SampleBuffer::new())),
            live: Mutex::new(LiveSubscriptions {
                motion: None,
                pressure: None,
                event_loop: None,
                stats: Arc::new(AlignerStats::default()),
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start recording. Does nothing if already recording.
    pub async fn start(&self) -> Result<()> {
        let mut live = self.live.lock().await;
        self.start_locked(&mut live).await
    }

    /// Stop recording. Does nothing if already idle.
    pub async fn stop(&self) -> SessionStatus {
        {
            let mut live = self.live.lock().await;
            self.stop_locked(&mut live).await;
        }
        self.status().await
    }

    /// Stop if recording, start otherwise. Returns the new state.
    pub async fn toggle(&self) -> Result<SessionState> {
        let mut live = self.live.lock().await;

        if live.motion.is_some() {
            self.stop_locked(&mut live).await;
            Ok(SessionState::Idle)
        } else {
            self.start_locked(&mut live).await?;
            Ok(SessionState::Recording)
        }
    }

    /// Clear the sample table without touching the subscriptions
    pub async fn reset(&self) {
        self.buffer.lock().await.reset();
        info!("Session {} buffer cleared", self.config.session_id);
    }

    pub async fn is_recording(&self) -> bool {
        self.live.lock().await.motion.is_some()
    }

    pub async fn state(&self) -> SessionState {
        if self.is_recording().await {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    /// Copy of the current sample table
    pub async fn snapshot(&self) -> SampleBuffer {
        self.buffer.lock().await.clone()
    }

    /// Export a snapshot of the current table. Allowed while recording.
    pub async fn export(&self, exporter: &Exporter) -> Result<ExportOutcome> {
        let snapshot = self.snapshot().await;
        info!(
            "Exporting session {} ({} rows)",
            self.config.session_id,
            snapshot.len()
        );
        exporter.export(&snapshot).await
    }

    /// Get the live readout
    pub async fn status(&self) -> SessionStatus {
        let (motion_active, pressure_active, stats) = {
            let live = self.live.lock().await;
            (
                live.motion.is_some(),
                live.pressure.is_some(),
                Arc::clone(&live.stats),
            )
        };

        let buffer = self.buffer.lock().await;
        let latest = buffer.latest();
        let started_at = buffer.first_timestamp();

        // Running clock while recording, frozen at the last row afterwards
        let elapsed = started_at.map(|first| {
            let until = match (motion_active, latest) {
                (false, Some(last)) => last.timestamp,
                _ => Utc::now(),
            };
            (until - first).to_std().unwrap_or_default()
        });

        let (x, y, z, pressure) = match latest {
            Some(s) => (s.accel_x, s.accel_y, s.accel_z, s.pressure),
            None => (None, None, None, None),
        };

        let pressure_hpa = pressure.filter(|p| p.is_finite()).unwrap_or(0.0);
        let altitude = if pressure_hpa > 0.0 {
            Atmosphere::default().altitude(hpa_to_pa(pressure_hpa))
        } else {
            0.0
        };

        SessionStatus {
            session_id: self.config.session_id.clone(),
            state: if motion_active {
                SessionState::Recording
            } else {
                SessionState::Idle
            },
            motion_active,
            pressure_active,
            started_at,
            elapsed_secs: elapsed.map(|d| d.as_secs_f64()).unwrap_or(0.0),
            elapsed: elapsed.map(format_elapsed).unwrap_or_default(),
            sample_count: buffer.len(),
            acceleration: acceleration_magnitude(x, y, z),
            acceleration_display: format_magnitude(x, y, z),
            pressure: pressure_hpa,
            pressure_display: format_pressure(pressure),
            altitude,
            dropped_pressure_events: stats.dropped_pressure(),
        }
    }

    async fn start_locked(&self, live: &mut LiveSubscriptions) -> Result<()> {
        if live.motion.is_some() {
            warn!("Recording already started");
            return Ok(());
        }

        info!("Starting recording session: {}", self.config.session_id);

        // A new session never sees rows of the previous one
        self.buffer.lock().await.reset();

        let (sink, events) = EventSink::channel(self.config.event_queue_capacity);
        let aligner = StreamAligner::new();
        let stats = aligner.stats();
        let event_loop = EventLoop::spawn(aligner, events, Arc::clone(&self.buffer));

        let mut motion = self.motion.lock().await;
        motion.set_update_interval(motion_interval(self.config.motion_rate_hz));

        let motion_handle = match motion
            .subscribe(sink.clone())
            .await
            .with_context(|| format!("Failed to subscribe to {}", motion.name()))
        {
            Ok(handle) => handle,
            Err(e) => {
                event_loop.shutdown().await;
                return Err(e);
            }
        };

        let mut pressure = self.pressure.lock().await;
        let pressure_handle = if pressure.is_available().await {
            match pressure
                .subscribe(sink)
                .await
                .with_context(|| format!("Failed to subscribe to {}", pressure.name()))
            {
                Ok(handle) => Some(handle),
                Err(e) => {
                    if let Err(unsub) = motion.unsubscribe(motion_handle).await {
                        error!("Failed to roll back motion subscription: {}", unsub);
                    }
                    event_loop.shutdown().await;
                    return Err(e);
                }
            }
        } else {
            warn!(
                "Barometer {} not available, recording motion only",
                pressure.name()
            );
            None
        };

        live.motion = Some(motion_handle);
        live.pressure = pressure_handle;
        live.event_loop = Some(event_loop);
        live.stats = stats;

        info!(
            "Recording session started ({} Hz motion, pressure {})",
            self.config.motion_rate_hz,
            if live.pressure.is_some() { "on" } else { "off" }
        );

        Ok(())
    }

    async fn stop_locked(&self, live: &mut LiveSubscriptions) {
        if live.motion.is_none() && live.pressure.is_none() && live.event_loop.is_none() {
            warn!("Recording not active");
            return;
        }

        info!("Stopping recording session: {}", self.config.session_id);

        if let Some(handle) = live.motion.take() {
            let mut motion = self.motion.lock().await;
            if let Err(e) = motion.unsubscribe(handle).await {
                error!("Failed to unsubscribe {}: {}", motion.name(), e);
            }
        }

        if let Some(handle) = live.pressure.take() {
            let mut pressure = self.pressure.lock().await;
            if let Err(e) = pressure.unsubscribe(handle).await {
                error!("Failed to unsubscribe {}: {}", pressure.name(), e);
            }
        }

        if let Some(event_loop) = live.event_loop.take() {
            event_loop.shutdown().await;
        }

        info!(
            "Recording session stopped ({} rows, {} pressure updates, {} dropped)",
            live.stats.motion_rows(),
            live.stats.pressure_updates(),
            live.stats.dropped_pressure()
        );
    }
}
