use crate::config::ReportingConfig;
use crate::handlers;
use crate::services::{Database, EntityAggregator, InvoiceLineResolver, ReportStore, SalesStatistics};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub entities: EntityAggregator,
    pub invoices: InvoiceLineResolver,
    pub statistics: SalesStatistics,
}

impl AppState {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            entities: EntityAggregator::new(store.clone()),
            invoices: InvoiceLineResolver::new(store.clone()),
            statistics: SalesStatistics::new(store.clone()),
            store,
        }
    }
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build against PostgreSQL.
    ///
    /// An unreachable database at startup is not fatal; the first request
    /// retries the bootstrap. Migrations only run once a pool exists.
    pub async fn build(config: ReportingConfig) -> Result<Self, AppError> {
        let db = Database::new(&config.database);

        match db.connect().await {
            Ok(()) if config.database.run_migrations => {
                db.run_migrations().await.map_err(|e| {
                    tracing::error!("Failed to run migrations: {}", e);
                    e
                })?;
            }
            Ok(()) => {}
            Err(e) => tracing::warn!("Database not reachable at startup: {}", e),
        }

        Self::build_with_store(config, Arc::new(db)).await
    }

    /// Build against any store implementation.
    pub async fn build_with_store(
        config: ReportingConfig,
        store: Arc<dyn ReportStore>,
    ) -> Result<Self, AppError> {
        let request_timeout = Duration::from_secs(config.common.request_timeout_secs);
        let state = AppState::new(store);
        let app = router(state, request_timeout);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::new(server),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/entities", get(handlers::list_entities))
        .route("/clients", get(handlers::list_clients))
        .route("/suppliers", get(handlers::list_suppliers))
        .route("/entity-relations", get(handlers::entity_relations))
        .route("/entity-articles", get(handlers::entity_articles))
        .route("/invoice/:id", get(handlers::invoice_lines))
        .route("/sales-statistics", get(handlers::sales_statistics))
        .route(
            "/admin/entities",
            post(handlers::seed_entities).delete(handlers::purge_entities),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
