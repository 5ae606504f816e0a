use anyhow::{Context, Result};
use clap::Parser;
use classroom_transcript::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "classroom-transcript", about = "Live classroom transcript service")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/classroom-transcript")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Classroom Transcript v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!("NATS server: {}", cfg.nats.url);

    let state = AppState::new(cfg.nats.url.clone(), cfg.transcript.reveal_chars_per_sec);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
