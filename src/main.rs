use anyhow::Context;
use pethaven::{
    bookings::repository::{InMemoryBookingRepository, MongoBookingRepository},
    routes::{build_router, cors_layer},
    services::repository::{InMemoryServiceRepository, MongoServiceRepository},
    store, AppConfig, AppState, TokenConfig,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pethaven=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pet Haven server");

    let config = AppConfig::from_env().context("invalid configuration")?;

    let token_config = TokenConfig::new(config.token_secret.clone(), config.token_expiration_hours);

    // The store client is created once here and shared by both repositories
    let app_state = match &config.database.uri {
        Some(uri) => {
            let database = store::connect(uri, &config.database.database_name)
                .await
                .context("failed to connect to the document store")?;

            AppState::new(
                Arc::new(MongoServiceRepository::new(
                    database.collection(&config.database.services_collection),
                )),
                Arc::new(MongoBookingRepository::new(
                    database.collection(&config.database.bookings_collection),
                )),
                token_config,
                config.cookie_policy,
            )
        }
        None => {
            warn!("No document store configured, data is kept in memory only");
            AppState::new(
                Arc::new(InMemoryServiceRepository::new()),
                Arc::new(InMemoryBookingRepository::new()),
                token_config,
                config.cookie_policy,
            )
        }
    };

    let app = build_router(app_state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!(port = config.port, "PET HAVEN SERVER IS RUNNING");

    axum::serve(listener, app).await?;
    Ok(())
}
