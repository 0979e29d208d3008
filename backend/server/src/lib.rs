//! Documentation of a per-day leaderboard server.
//!
//!
//!
//! # General Infrastructure
//! - Day files are dropped into the data directory by whoever runs the event
//! - Server loads every day file into memory at startup
//! - Pages and JSON API only ever read the in-memory index
//! - `POST /admin/reload` rebuilds the index after files change on disk
//! - No database, the directory is the source of truth
//!
//!
//!
//! # Data Directory
//!
//! One JSON file per day. The day number comes from the file name, the body maps usernames to records.
//!
//! ```json
//! {
//!     "Alice": { "rank": 1, "power": 1520, "extra": "mvp" },
//!     "Bob": { "rank": null, "power": 980 }
//! }
//! ```
//!
//! - `rank`: integer, missing or null means unranked
//! - `power`: number
//! - `extra`: optional string
//! - Anything else is kept and returned by the search API as is
//! - `index.json` is reserved and never loaded
//!
//!
//!
//! # Routes
//!
//! Pages
//! - `GET /`: known days
//! - `POST /search`, `GET /search?username=`: one user across all days
//! - `GET /leaderboard/{day}`: ranked table for a day
//!
//! API
//! - `GET /api/search?q=`
//! - `GET /api/leaderboard/{day}`
//! - `POST /admin/reload`
//! - `GET /health`
//!
//! The reload endpoint is not authenticated. Keep the server on a private network or put it behind
//! a proxy that guards `/admin`.
//!
//!
//!
//! # Setup
//!
//! Environment variables.
//! - `RUST_PORT`: listen port, default `3000`
//! - `DATA_DIR`: day file directory, default `data`
//! - `RUST_LOG`: log filter, default `info`
//!
//! Run the server.
//! ```sh
//! DATA_DIR=./data cargo run --bin leaderboard-server
//! ```
//!
//! Check a data directory without starting the server.
//! ```sh
//! cargo run --bin inspect -- ./data --day 3
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal, task::spawn_blocking};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod views;

use config::Config;
use error::AppError;
use routes::{
    api_leaderboard_handler, api_search_handler, health_handler, index_handler,
    leaderboard_handler, reload_handler, search_form_handler, search_query_handler,
};
use state::AppState;

pub async fn start_server() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state from {}...", config.data_dir.display());
    let state = spawn_blocking(move || AppState::new(config)).await??;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

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
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/search", get(search_query_handler).post(search_form_handler))
        .route("/leaderboard/{day}", get(leaderboard_handler))
        .route("/api/search", get(api_search_handler))
        .route("/api/leaderboard/{day}", get(api_leaderboard_handler))
        .route("/admin/reload", post(reload_handler))
        .route("/health", get(health_handler))
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
