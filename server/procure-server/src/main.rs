use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use procure_server::{config, create_app, Environment, ProcureServer, ServerConfig};

/// OpenProcure HTTP Server
#[derive(Parser, Debug)]
#[command(name = "procure-server")]
#[command(about = "Public procurement platform HTTP API server")]
struct Args {
    /// Server bind address, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    let environment = config::set_runtime_env(config.environment);

    init_tracing(args.verbose, environment);

    info!("Starting OpenProcure server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", environment.as_str());

    let host = config.host.clone();
    let port = config.port;
    let server = ProcureServer::new(config).await?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("listener has no local address")?;

    info!("Server running on http://{addr}");
    info!("Health check available at: http://{addr}/health");
    info!("API v1 available at: http://{addr}/api/v1");
    info!("API docs available at: http://{addr}/swagger-ui");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}

fn init_tracing(verbose: bool, environment: Environment) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    // Bare level first so the workspace crates and the `audit` target are
    // covered; the noisy HTTP internals are capped separately.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},tower_http=info,sqlx=warn,hyper=info").into());

    match environment {
        Environment::Development => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        Environment::Production => {
            // Structured JSON logging for log shippers
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).with_ansi(false).json())
                .init();
        }
    }
}
