//! Billing service entrypoint.
//!
//! Loads configuration, connects the adapters, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use plan_pilot::adapters::catalog::JsonPlanCatalog;
use plan_pilot::adapters::http::{billing_router, BillingAppState};
use plan_pilot::adapters::postgres::PostgresAccountRepository;
use plan_pilot::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use plan_pilot::config::AppConfig;

/// Billing request bodies are small; anything larger is malformed.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        // Config failures happen before the tracing subscriber is installed.
        eprintln!("plan-pilot exited with error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.server.log_level);
    info!(environment = ?config.server.environment, "Configuration loaded");

    let catalog =
        JsonPlanCatalog::load(&config.catalog.path).context("Failed to load plan catalog")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Database migrations applied");
    }

    let stripe_config = StripeConfig::new(config.payment.stripe_api_key.clone());
    let state = BillingAppState {
        account_repository: Arc::new(PostgresAccountRepository::new(pool)),
        plan_catalog: Arc::new(catalog),
        payment_provider: Arc::new(StripePaymentAdapter::new(stripe_config)),
        default_currency: config.payment.currency.clone(),
    };

    serve(config, state).await
}

fn init_tracing(directives: &str) {
    // RUST_LOG wins over the configured directive when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(config: AppConfig, state: BillingAppState) -> Result<()> {
    let app = Router::new()
        .fallback(not_found)
        .nest("/api", billing_router())
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(build_cors(&config)?)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server is running on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<_>>()?;

    Ok(cors.allow_origin(parsed))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "NOT_FOUND")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
