use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use derivative::Derivative;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_headers::trace_headers, trace_response_body::trace_response_body,
    },
    openapi::openapi_json,
    route,
    schema::PayloadSchema,
    state::ApiState,
    store::SqliteBookStore,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Derivative, Deserialize)]
#[derivative(Debug)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    error_verbosity: ErrorVerbosity,
    /// SQLite connection string, e.g. `sqlite://bookshelf.db?mode=rwc`.
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    database_url: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    /// JSON Schema document book payloads are validated against.
    /// The schema shipped with the server is used when absent.
    #[serde(default)]
    book_schema_file: Option<PathBuf>,
    /// Log every response body. Expensive.
    #[serde(default)]
    trace_response_body: bool,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Read)?;

        serde_yaml::from_str(&content).map_err(ConfigError::Parse)
    }
}

/// Builds the application router with all middleware applied.
pub fn app(state: ApiState, trace_bodies: bool) -> Router {
    let mut router = Router::new()
        .nest("/books", route::books::app::app())
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found::<ApiState>)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ))
        .layer(middleware::from_fn(trace_headers));

    if trace_bodies {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ));
    }

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            )
            .layer(RequestDecompressionLayer::new())
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive()),
    )
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(config = ?self.config, "Loaded config");

        let book_store =
            SqliteBookStore::connect(&self.config.database_url, self.config.max_connections)
                .await
                .context("Failed to open book store")?;

        let book_schema = match &self.config.book_schema_file {
            Some(path) => PayloadSchema::from_file(path).await,
            None => PayloadSchema::default_book_schema(),
        }
        .context("Failed to load book schema")?;

        let state = ApiState::new(
            self.config.error_verbosity,
            Arc::new(book_store),
            book_schema,
        );

        let app = app(state, self.config.trace_response_body);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for CTRL+C");

            std::future::pending::<()>().await;
        }

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;

                tracing::info!("SIGTERM received");
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");

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

    tracing::info!("Shutting down");
}
