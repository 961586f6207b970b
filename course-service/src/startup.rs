use crate::config::CourseConfig;
use crate::handlers;
use crate::services::{CourseStore, MongoCourseStore, MongoDb};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/cursos",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/cursos/",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/cursos/:code",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        // Fallback responses are recorded under the "unmatched" path label
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    db: Option<MongoDb>,
}

impl Application {
    /// Create the MongoDB client, start the index bootstrap and bind the HTTP listener.
    pub async fn build(config: CourseConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        // Runs in the background: an unreachable server must not delay binding
        // the listener until the driver's server selection gives up.
        let index_db = db.clone();
        tokio::spawn(async move {
            if let Err(e) = index_db.initialize_indexes().await {
                tracing::warn!("Failed to initialize database indexes: {}", e);
            }
        });

        let store: Arc<dyn CourseStore> = Arc::new(MongoCourseStore::new(db.clone()));
        let mut app = Self::with_store(config, store).await?;
        app.db = Some(db);
        Ok(app)
    }

    /// Bind the HTTP listener over an already constructed store.
    pub async fn with_store(
        config: CourseConfig,
        store: Arc<dyn CourseStore>,
    ) -> Result<Self, AppError> {
        let app = build_router(AppState::new(store));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            db: None,
        })
    }

    /// The MongoDB handle when built against a live database.
    pub fn db(&self) -> Option<&MongoDb> {
        self.db.as_ref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
