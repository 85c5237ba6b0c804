//! Process entry point: `serve` runs the HTTP API, `seed` fills the
//! database with demo data.
//!
//! Every flag can also be set through the environment variable shown in
//! `--help`.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use roster_server::network::{NetworkConfig, NetworkModule};
use roster_server::service::{seed_demo_data, ServerConfig};
use roster_server::storage::{Database, StorageConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log output format.
    #[arg(long, env = "ROSTER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// `sqlx` database URL.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://roster.db", global = true)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API until Ctrl-C or SIGTERM.
    Serve(ServeArgs),
    /// Insert demo groups, courses, and students, then exit.
    Seed,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "ROSTER_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "ROSTER_PORT", default_value_t = 5000)]
    port: u16,

    /// Comma-separated allowed origins; `*` allows any.
    #[arg(long, env = "ROSTER_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    #[arg(long, env = "ROSTER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Install the Prometheus recorder and expose `GET /metrics`.
    #[arg(long, env = "ROSTER_METRICS")]
    metrics: bool,

    /// Seconds to wait for in-flight requests on shutdown.
    #[arg(long, default_value_t = 30)]
    drain_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(false);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

impl ServeArgs {
    fn into_config(self, database_url: String) -> ServerConfig {
        ServerConfig {
            network: NetworkConfig {
                host: self.host,
                port: self.port,
                cors_origins: self.cors_origins,
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            storage: StorageConfig {
                database_url,
                ..StorageConfig::default()
            },
            metrics_enabled: self.metrics,
            drain_timeout: Duration::from_secs(self.drain_timeout_secs),
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let db = Database::connect(&config.storage)
        .await
        .with_context(|| format!("opening {}", config.storage.database_url))?;
    db.initialize().await.context("applying schema")?;

    let mut module = NetworkModule::new(config.network, db);
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("installing Prometheus recorder")?;
        module = module.with_metrics(handle);
    }

    let port = module.start().await?;
    info!(port, "roster server started");

    module.serve(shutdown_signal(), config.drain_timeout).await?;
    info!("roster server stopped");
    Ok(())
}

async fn seed(database_url: String) -> Result<()> {
    let storage = StorageConfig {
        database_url,
        ..StorageConfig::default()
    };
    let db = Database::connect(&storage)
        .await
        .with_context(|| format!("opening {}", storage.database_url))?;
    db.initialize().await.context("applying schema")?;

    let mut rng = StdRng::from_os_rng();
    let mut session = db.write_session().await?;
    let report = seed_demo_data(&mut session, &mut rng).await?;
    session.commit().await?;

    info!(
        groups = report.groups,
        courses = report.courses,
        students = report.students,
        enrollments = report.enrollments,
        "demo data written"
    );
    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Serve(args) => serve(args.into_config(cli.database_url)).await,
        Command::Seed => seed(cli.database_url).await,
    }
}
