//! CloudLocker entitlement backend binary.
//!
//! Wires configuration, the Postgres pool, and the provider adapters
//! into the axum application.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cloudlocker::adapters::auth::JwtIdentityVerifier;
use cloudlocker::adapters::fcm::{FcmConfig, FcmPushSender};
use cloudlocker::adapters::fs::FsBlobStore;
use cloudlocker::adapters::http::{router, AppState};
use cloudlocker::adapters::postgres::{PgEntitlementStore, PgFileRecordStore, PgUserDirectory};
use cloudlocker::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use cloudlocker::config::{AppConfig, ServerConfig};
use cloudlocker::ports::{IdentityVerifier, SystemClock};

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        retention_days = config.lifecycle.retention_days,
        "starting cloudlocker entitlement backend"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let mut stripe_config = StripeConfig::new(config.payment.stripe_api_key.clone());
    if let Some(url) = &config.payment.stripe_api_base_url {
        stripe_config = stripe_config.with_base_url(url.clone());
    }
    let mut fcm_config = FcmConfig::new(config.push.fcm_server_key.clone());
    if let Some(url) = &config.push.fcm_api_url {
        fcm_config = fcm_config.with_api_url(url.clone());
    }

    let state = AppState {
        entitlements: Arc::new(PgEntitlementStore::new(pool.clone())),
        users: Arc::new(PgUserDirectory::new(pool.clone())),
        files: Arc::new(PgFileRecordStore::new(pool.clone())),
        blobs: Arc::new(FsBlobStore::new(config.blob.root_dir.clone())),
        payments: Arc::new(StripePaymentAdapter::new(stripe_config)),
        push: Arc::new(FcmPushSender::new(fcm_config)),
        clock: Arc::new(SystemClock),
        retention: config.lifecycle.retention_window(),
    };

    let verifier: Arc<dyn IdentityVerifier> =
        Arc::new(JwtIdentityVerifier::new(config.auth.jwt_secret.as_bytes()));

    let app = router(state, verifier).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id()),
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
