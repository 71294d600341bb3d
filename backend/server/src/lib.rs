//! # Coursework server
//!
//! Every coursework API behind one axum router.
//!
//! ## Routes
//!
//! | method | path | purpose |
//! |--------|------|---------|
//! | GET, POST | `/api/books` | list, create |
//! | GET | `/api/books/pricing` | totals, average, optional `?discount=` |
//! | GET, PUT | `/api/books/{id}` | fetch, patch |
//! | GET, POST | `/api/tasks` | list newest first, create |
//! | GET, PUT, DELETE | `/api/tasks/{id}` | fetch, patch, delete |
//! | GET | `/api/add`, `/api/subtract`, `/api/multiply`, `/api/divide` | `?num1=&num2=` |
//! | POST | `/api/calculate` | `{ num1, num2, operation }` |
//! | GET | `/api/status` | server status and online user count |
//! | GET | `/api/integrity-check42` | liveness, 204 |
//! | GET | `/ws` | presence websocket, see [`presence`] |
//!
//! Anything else falls through to the static directory when one exists, then to a JSON 404.
//!
//! ## Environment
//!
//! - `RUST_PORT`: listen port, default 3000
//! - `STORE_BACKEND`: `memory` or `redis`, default memory
//! - `REDIS_URL`: `/run/secrets/REDIS_URL` first, then the environment
//! - `STATIC_DIR`: frontend files, default `public`
//! - `SEED_ON_START`: fill empty collections with samples, default true
//! - `CORS_MAX_AGE_SECS`: preflight cache, default 3600
//! - `RUST_LOG`: tracing filter
use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{Method, header::CONTENT_TYPE},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod books;
pub mod calculator;
pub mod config;
pub mod database;
pub mod error;
pub mod presence;
pub mod response;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod utils;

#[cfg(test)]
mod test_utils;

use config::Config;
use routes::{api_routes, not_found_handler};
use state::AppState;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(state.config.cors_max_age_secs));

    let static_dir = &state.config.static_dir;
    let router = if Path::new(static_dir).is_dir() {
        info!("Serving static files from {static_dir}");
        api_routes().fallback_service(
            ServeDir::new(static_dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(not_found_handler.into_service()),
        )
    } else {
        api_routes().fallback(not_found_handler)
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
