use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voiceprompt::recording::SilenceCapture;
use voiceprompt::{event, AppState, Config, PromptFetcher, RecordingSession, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "voiceprompt", about = "Prompt-and-record session service")]
struct Args {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/voiceprompt")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("voiceprompt v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let api_key = cfg.prompt.api_key()?;
    let fetcher = Arc::new(PromptFetcher::new(
        cfg.prompt.endpoint.clone(),
        api_key,
        cfg.prompt.model.clone(),
    )?);

    let (events, rx) = event::channel();
    let (ui, _dispatcher) = event::spawn_dispatcher(rx);

    // Platform capture is provided by the embedding application; the
    // standalone service records silence into the slot.
    let capture = Box::new(SilenceCapture::new(
        cfg.recording.sample_rate,
        cfg.recording.channels,
    ));

    let session = RecordingSession::new(
        SessionConfig {
            slot_path: cfg.recording.slot_path.clone(),
            countdown_secs: cfg.recording.countdown_secs,
            sample_rate: cfg.recording.sample_rate,
            channels: cfg.recording.channels,
        },
        capture,
        events.clone(),
    );

    let state = AppState {
        session,
        fetcher,
        ui,
        events,
    };

    let app = voiceprompt::create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
