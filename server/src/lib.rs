//! Contact endpoint for the Arth Communications site.
//!
//! # General Infrastructure
//! - Static site is hosted separately; this service only owns `POST /api/contact`
//! - One invocation per request, no shared mutable state between requests
//! - Accepted submissions become rows in a Supabase `contacts` table
//! - Supabase credentials come from the environment; missing credentials fail
//!   at startup, never mid-request
//!
//! # Request Contract
//!
//! | condition | status | body |
//! |---|---|---|
//! | non-POST method | 405 | `Method Not Allowed` |
//! | unparseable JSON | 400 | `{"error":"Invalid JSON"}` |
//! | honeypot filled | 200 | `{"ok":true}` (nothing stored) |
//! | missing required field | 422 | `{"error":"Missing required fields"}` |
//! | insert failure | 500 | `{"error":"Database insert failed"}` |
//! | success | 200 | `{"ok":true}` |
//!
//! # Setup
//!
//! ```sh
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_SERVICE_ROLE_KEY=<service role key>
//! RUST_LOG=info cargo run -p server
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::any,
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod state;

use routes::submit_contact;
use state::State;

/// Router assembly, separate from [`start_server`] so tests can mount the
/// same routes on a fake store.
pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/contact", any(submit_contact))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
