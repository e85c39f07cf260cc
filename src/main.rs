use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weather_lookup::api;
use weather_lookup::config::{Config, DatabaseConfig, DEFAULT_CONFIG_PATH};
use weather_lookup::db::{MemoryStore, Repository, WeatherStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,weather_lookup=debug,sqlx=warn,tower_http=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Weather lookup service starting...");

    let config_path =
        std::env::var("WEATHER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration: {}\n\n\
             Make sure:\n\
             1. {} exists (or point WEATHER_CONFIG at another file)\n\
             2. All required environment variables are set (check .env.example)\n\
             3. Create a .env file if needed",
            e,
            config_path
        )
    })?;
    info!("Configuration loaded from {}", config_path);

    let store: Arc<dyn WeatherStore> = match &config.database {
        Some(database) => Arc::new(connect(database).await?),
        None => {
            warn!("No database configured, observations are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("RPC server listening on {}", addr);

    axum::serve(listener, api::routes(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Weather lookup service shutting down");
    Ok(())
}

async fn connect(database: &DatabaseConfig) -> anyhow::Result<Repository> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.connection_string())
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to connect to database: {}\n\n\
                 Host: {}:{}\n\
                 Database: {}\n\
                 User: {}\n\n\
                 Common fixes:\n\
                 1. Ensure PostgreSQL is running\n\
                 2. Check username/password are correct (DB_USER, DB_PASSWORD)\n\
                 3. Verify database exists: createdb {}\n\
                 4. Check host and port (DB_HOST, DB_PORT)",
                e,
                database.host,
                database.port,
                database.name,
                database.user,
                database.name
            )
        })?;

    info!(
        "Connected to database: {}@{}:{}/{}",
        database.user, database.host, database.port, database.name
    );

    let repository = Repository::new(pool);
    repository.run_migrations().await?;
    Ok(repository)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}
