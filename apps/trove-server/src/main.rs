use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::{middleware, Extension, Router};
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tower_http::trace::TraceLayer;

use api_core::{Argon2Hasher, JwtSigner, TokenSigner};
use runtime::{AppConfig, CliArgs};
use store::ConnectOpts;
use users::contract::client::UsersApi;
use users::gateways::local::UsersLocalClient;

/// Trove Server - multi-tenant item API
#[derive(Parser)]
#[command(name = "trove-server")]
#[command(about = "Trove Server - multi-tenant item API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized data_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.data_dir));
    tracing::info!("Trove Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let db_config = config
        .database
        .clone()
        .ok_or_else(|| anyhow!("Database URL not configured"))?;

    let mut dsn = db_config.url.trim().to_owned();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite:") {
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.server.data_dir))?;
    }

    let connect_opts = ConnectOpts {
        max_conns: db_config.max_conns,
        acquire_timeout: db_config.acquire_timeout_ms.map(Duration::from_millis),
    };
    let db = store::connect(&dsn, connect_opts).await?;

    // Users first: items carry an FK into the users table
    users::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .context("Failed to run users migrations")?;
    items::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .context("Failed to run items migrations")?;

    let users_svc = Arc::new(users::domain::service::Service::new(
        db.clone(),
        Arc::new(Argon2Hasher),
    ));
    let items_svc = Arc::new(items::domain::service::Service::new(db));

    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new(
        &config.auth.token_secret,
        config.auth.token_expire_secs,
    ));
    let users_api: Arc<dyn UsersApi> = Arc::new(UsersLocalClient::new(users_svc.clone()));

    let app = build_router(users_svc, items_svc, users_api, signer);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Trove Server stopped");
    Ok(())
}

/// Assemble the full application router: module route trees, identity
/// middleware, and the shared extensions the middleware reads.
fn build_router(
    users_svc: Arc<users::domain::service::Service>,
    items_svc: Arc<items::domain::service::Service>,
    users_api: Arc<dyn UsersApi>,
    signer: Arc<dyn TokenSigner>,
) -> Router {
    users::api::rest::routes::router(users_svc)
        .merge(items::api::rest::routes::router(items_svc))
        .layer(middleware::from_fn(users::api::rest::auth::resolve_identity))
        .layer(Extension(users_api))
        .layer(Extension(signer))
        .layer(TraceLayer::new_for_http())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if config
        .database
        .as_ref()
        .is_none_or(|db| db.url.trim().is_empty())
    {
        return Err(anyhow!("Database URL not configured"));
    }

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::error!(%error, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
