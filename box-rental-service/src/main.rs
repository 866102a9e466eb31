use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use box_rental_service::{
    config::ServiceConfig,
    driver::DialogueDriver,
    service::{AppState, build_router},
    store::{InMemoryReservationStore, PostgresReservationStore, ReservationStore},
    tasks::BookingDraft,
    workflow::create_flow_runner,
};
use dialogue_flow::{InMemorySessionStorage, SessionStorage};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Initialize structured JSON tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "box_rental_service=debug,dialogue_flow=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

async fn create_reservation_store(
    config: &ServiceConfig,
) -> anyhow::Result<Arc<dyn ReservationStore>> {
    match &config.database_url {
        Some(database_url) => {
            info!("Using PostgreSQL reservation store");
            let store = PostgresReservationStore::connect(database_url)
                .await
                .context("failed to connect to the reservation database")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, reservations are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryReservationStore::new()))
        }
    }
}

/// Periodically drop booking dialogues abandoned halfway.
fn spawn_idle_sweeper(driver: DialogueDriver, max_idle: chrono::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(IDLE_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            match driver.evict_idle(max_idle).await {
                Ok(0) => {}
                Ok(evicted) => info!(evicted, "evicted idle booking sessions"),
                Err(e) => error!(error = %e, "failed to evict idle sessions"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

async fn serve_http(config: &ServiceConfig, driver: DialogueDriver) -> anyhow::Result<()> {
    let app = build_router(AppState { driver });
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    info!(boxes = config.catalog.boxes().len(), "box catalog loaded");

    let store = create_reservation_store(&config).await?;
    let session_storage: Arc<dyn SessionStorage<BookingDraft>> =
        Arc::new(InMemorySessionStorage::new());
    let runner = create_flow_runner(store, Arc::new(config.catalog.clone()), session_storage);
    let driver = DialogueDriver::new(runner);

    if let Some(max_idle) = config.session_idle_timeout {
        spawn_idle_sweeper(driver.clone(), max_idle);
    }

    match config.bot_token.clone() {
        #[cfg(feature = "telegram")]
        Some(bot_token) => {
            let bot = box_rental_service::telegram::run(bot_token, driver.clone());
            tokio::select! {
                result = serve_http(&config, driver) => result,
                () = bot => {
                    info!("Telegram polling stopped");
                    Ok(())
                }
            }
        }
        #[cfg(not(feature = "telegram"))]
        Some(_) => {
            warn!("BOT_TOKEN is set but this build has no Telegram support");
            serve_http(&config, driver).await
        }
        None => serve_http(&config, driver).await,
    }
}
