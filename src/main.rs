use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use footy_quiz::server::{build_router, AppState};
use footy_quiz::{QuizConfig, WikiClient};

#[derive(Debug, Parser)]
#[command(name = "footy-quiz")]
#[command(about = "Serve guess-the-footballer quiz rounds built from Wikipedia")]
struct Args {
    /// Bind address, overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Include error details in API responses, overrides QUIZ_DEBUG.
    #[arg(long)]
    debug: bool,
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("footy_quiz=debug,tower_http=debug"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let args = Args::parse();
    let mut config = QuizConfig::from_env().context("failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.debug |= args.debug;
    tracing::info!(
        host = %config.host,
        port = config.port,
        api_url = %config.api_url,
        debug = config.debug,
        "loaded configuration"
    );

    let client = WikiClient::from_config(&config)?;
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("invalid HOST address {:?}", config.host))?,
        config.port,
    );
    let app = build_router(AppState::new(client, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
