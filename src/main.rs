//! Service entry point: live transcription server.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run), apply
//!    environment overrides, and refuse to start on unusable audio settings.
//! 3. Create the tokio runtime with a bounded blocking pool (the running
//!    inference takes one thread of it).
//! 4. Load the Whisper model once; fall back to [`NoModelStt`] so the server
//!    still starts and clients see the misconfiguration.
//! 5. Build the scoring client and router, bind, and serve until Ctrl-C.

use anyhow::{Context, Result};
use live_transcribe::{
    config::{AppConfig, AppPaths},
    scoring::ScoringClient,
    server::{build_router, AppState},
    stt::{
        resolve_model_path, InferenceDispatcher, NoModelStt, SttEngine, TranscribeParams,
        WhisperEngine,
    },
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("live-transcribe starting up");

    // 2. Configuration
    let config = AppConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })
        .with_env_overrides();
    config.audio.validate().context("invalid audio settings")?;

    // 3. Tokio runtime
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder
        .enable_all()
        .max_blocking_threads(config.server.max_blocking_threads.max(1));
    if let Some(workers) = config.server.worker_threads {
        builder.worker_threads(workers.max(1));
    }
    let rt = builder.build().context("failed to create tokio runtime")?;

    // 4. STT engine (loaded once, shared by every session)
    let model_path = resolve_model_path(&config.stt, &AppPaths::new());
    let engine: Box<dyn SttEngine> =
        match WhisperEngine::load(&model_path, TranscribeParams::from(&config.stt)) {
            Ok(engine) => {
                log::info!("Whisper model loaded: {}", model_path.display());
                Box::new(engine)
            }
            Err(e) => {
                log::warn!(
                    "Could not load Whisper model ({}): {e}. Every window will report an error.",
                    model_path.display()
                );
                Box::new(NoModelStt::new(model_path.display().to_string()))
            }
        };

    // 5. Scoring
    if !config.scoring.is_configured() {
        log::warn!("No scoring API key configured; /ws/debate will return error scores");
    }
    let scoring = ScoringClient::from_config(&config.scoring);

    let addr = config.server.listen_addr();
    let state = AppState::new(InferenceDispatcher::new(engine), scoring, config);

    rt.block_on(serve(addr, state))
}

async fn serve(addr: String, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("Listening on {}", listener.local_addr()?);

    let router = build_router(state.clone());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context("server error")?;

    log::info!("live-transcribe stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested; closing open sessions");
    state.shutdown();
}
