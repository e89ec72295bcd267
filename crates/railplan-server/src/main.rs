use anyhow::Result;
use chrono::Utc;
use railplan_notify::channels::email::EmailChannel;
use railplan_notify::NotificationChannel;
use railplan_storage::RailStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use railplan_server::app;
use railplan_server::config::ServerConfig;
use railplan_server::seed;
use railplan_server::state::AppState;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  railplan-server [config.toml]    Start the server (default config/server.toml)");
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install default CryptoProvider: {e:?}"))?;

    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/server.toml");

    let config = ServerConfig::load(config_path)?;

    let default_level = if config.debug {
        "railplan=debug"
    } else {
        "railplan=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();
    tracing::info!(path = config_path, "Configuration loaded");

    run_server(config).await
}

fn build_mailer(config: &ServerConfig) -> Option<Arc<dyn NotificationChannel>> {
    match EmailChannel::new(&config.mail.smtp_settings()) {
        Ok(channel) => {
            tracing::info!(
                server = %config.mail.server,
                port = config.mail.port,
                tls = config.mail.use_tls,
                "SMTP transport configured"
            );
            Some(Arc::new(channel))
        }
        Err(e) => {
            tracing::error!(error = %e, "SMTP transport unavailable, test alerts will fail");
            None
        }
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!(
        http_port = config.http_port,
        locale = %config.locale,
        data_dir = %config.database.data_dir,
        db = %config.database.redacted_url(),
        "railplan-server starting"
    );

    let db_url = config.database.connection_url();
    let store = Arc::new(RailStore::new(&db_url, Path::new(&config.database.data_dir)).await?);

    if config.seed_sample_data {
        if let Err(e) = seed::init_sample_trains(&store).await {
            tracing::error!(error = %e, "Failed to insert sample trains");
        }
    }

    let mailer = build_mailer(&config);
    let http_addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port).parse()?;

    let state = AppState {
        store,
        mailer,
        start_time: Utc::now(),
        config: Arc::new(config),
    };
    let app = app::build_http_app(state);

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(addr = %http_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
