//! Lapsecam - Adaptive timelapse capture for networked cameras
//!
//! Binary entry point: parses the CLI, probes and configures the camera,
//! then hands the session to the capture orchestrator.

use clap::Parser;
use lapsecam::camera_link::{CameraDevice, CameraLink};
use lapsecam::cli::Cli;
use lapsecam::exposure::ExposureController;
use lapsecam::frame_store::FrameStore;
use lapsecam::orchestrator::{CaptureOrchestrator, TokioPacer};
use lapsecam::{CaptureSession, Error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "lapsecam=debug"
    } else {
        "lapsecam=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lapsecam v{}", env!("CARGO_PKG_VERSION"));

    let settings = cli.camera_settings()?;
    let config = cli.session_config();

    let camera = CameraLink::new(&cli.host, cli.port);
    tracing::info!(camera = %camera.base_url(), "Probing camera");
    if !camera.health_check().await {
        return Err(Error::Unreachable(format!(
            "status probe failed for {}",
            camera.base_url()
        ))
        .into());
    }

    // Push the full settings list; individual failures are logged and skipped
    let outcomes = camera.configure(&settings.to_pairs()).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(
        applied = outcomes.len() - failed,
        failed = failed,
        "Camera configured"
    );

    // Prime the LED and give auto exposure a moment to converge
    camera.set_led(config.led_initial).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current frame");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let store = FrameStore::new(&config.output_dir, &config.basename, config.save_metadata);
    let controller = ExposureController::new(config.tuning);
    let mut session = CaptureSession::new(config);

    if cli.test {
        tracing::info!("Test mode: capturing a single frame");
    }

    let orchestrator = CaptureOrchestrator::new(camera, store, controller, TokioPacer, shutdown);
    let summary = orchestrator.run(&mut session).await;

    tracing::info!(
        captured = summary.captured,
        skipped = summary.skipped,
        interrupted = summary.interrupted,
        "Capture run finished"
    );
    if summary.interrupted {
        if let Some(last) = summary.last_completed {
            tracing::info!(
                "Resume with --start-frame {} to continue this sequence",
                last + 1
            );
        }
    }

    Ok(())
}
