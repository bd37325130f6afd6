use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod auth;
mod config;
mod domain;
mod http;
mod messaging;
mod metrics;
mod store;

use auth::{Credentials, TokenStore};
use config::Config;
use domain::company::CompanyService;
use messaging::RedpandaPublisher;
use store::memory::MemoryCompanyStore;
use store::{CompanyStore, ScyllaCompanyStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,company_registry=debug")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("starting company registry service");

    // === 1. Record store ===
    let store: Arc<dyn CompanyStore> = match config.store_backend.as_str() {
        "memory" => {
            tracing::warn!("using in-memory store; data will not survive a restart");
            Arc::new(MemoryCompanyStore::new())
        }
        _ => {
            tracing::info!(node = %config.scylla_node, "connecting to ScyllaDB");
            let session: Session = SessionBuilder::new()
                .known_node(&config.scylla_node)
                .build()
                .await?;

            session
                .query_unpaged(
                    format!(
                        "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                         {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
                        config.keyspace
                    ),
                    &[],
                )
                .await?;
            session.use_keyspace(&config.keyspace, false).await?;

            let store = ScyllaCompanyStore::new(Arc::new(session));
            store.ensure_schema().await?;
            Arc::new(store)
        }
    };

    // === 2. Metrics registry and scrape server ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    let registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = metrics::start_metrics_server(registry, metrics_port).await {
            tracing::error!(error = %e, "metrics server error");
        }
    });

    // === 3. Event publisher ===
    tracing::info!(brokers = %config.kafka_brokers, topic = %config.kafka_topic, "creating event publisher");
    let publisher = Arc::new(RedpandaPublisher::new(
        &config.kafka_brokers,
        &config.kafka_topic,
    )?);

    // === 4. Coordinator and auth ===
    let service = web::Data::new(CompanyService::new(store, publisher, metrics));
    let tokens = web::Data::new(TokenStore::new(
        Credentials::new(&config.auth_username, &config.auth_password),
        chrono::Duration::seconds(config.token_ttl_secs),
    ));

    // === 5. HTTP API ===
    tracing::info!(port = config.http_port, "HTTP API listening");
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(tokens.clone())
            .configure(http::configure)
    })
    .bind(("0.0.0.0", config.http_port))?
    .run()
    .await?;

    Ok(())
}
