use anyhow::{bail, Context, Result};
use clap::Parser;
use sensor_recorder::export::Unavailable;
use sensor_recorder::{
    create_router, AppState, Config, Exporter, LocalFileStore, NatsClient, NatsShare,
    RecordingSession, SensorFactory, SessionConfig, ShareTarget,
};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sensor-recorder")]
#[command(about = "Record accelerometer and barometer samples and export them")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/sensor-recorder")]
    config: String,

    /// Serve the HTTP control API instead of recording headless
    #[arg(short, long)]
    serve: bool,

    /// Seconds to record in headless mode
    #[arg(short, long, default_value = "10")]
    duration: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Sensor source: {}", cfg.sensors.source);
    info!("Documents directory: {}", cfg.export.documents_dir().display());

    let session_config = SessionConfig {
        motion_rate_hz: cfg.sensors.motion_rate_hz,
        ..SessionConfig::default()
    };

    let sensors = SensorFactory::create(cfg.sensors.source()?, cfg.sensors.backend_config())
        .context("Failed to create sensors")?;

    let share: Box<dyn ShareTarget> = match cfg.export.share.as_str() {
        "none" => Box::new(Unavailable),
        "nats" => {
            let client = NatsClient::connect(&cfg.nats.url, session_config.session_id.clone())
                .await
                .context("Failed to connect share target")?;
            Box::new(NatsShare::new(client))
        }
        other => bail!("Unknown share target: {:?}", other),
    };

    let exporter = Exporter::new(
        Box::new(LocalFileStore::new(cfg.export.documents_dir())),
        share,
    )
    .with_file_name(cfg.export.file_name.clone());

    let session = RecordingSession::new(session_config, sensors.motion, sensors.pressure);

    if args.serve {
        let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("HTTP API listening on {}", addr);

        let app = create_router(AppState::new(session, exporter));
        axum::serve(listener, app).await.context("HTTP server failed")?;

        return Ok(());
    }

    info!("Recording for {} seconds", args.duration);
    session.start().await?;
    tokio::time::sleep(Duration::from_secs(args.duration)).await;
    let status = session.stop().await;

    info!(
        "Recorded {} samples over {} (last pressure {} hPa, acceleration {} m/s², altitude {:.1} m)",
        status.sample_count,
        status.elapsed,
        status.pressure_display,
        status.acceleration_display,
        status.altitude
    );

    let outcome = session.export(&exporter).await?;
    info!("Saved {}", outcome.path().display());
    if let Some(notice) = outcome.notice() {
        warn!("{}", notice);
    }

    Ok(())
}
