//! Backend for the Elevate SEO onboarding tool.
//!
//! Clients authenticate with an email/password pair, store a business
//! profile, and request AI-generated SEO recommendations derived from that
//! profile.
//!
//!
//!
//! # General Infrastructure
//! - Single process, single port, JSON over HTTP
//! - Session tokens are signed JWTs; no server-side session table
//! - Profiles and user records live in process memory behind the shared
//!   state, so a restart starts clean. Acceptable for the current
//!   deployment; revisit if profiles ever need to survive a deploy.
//! - The only outbound dependency is the text-generation provider; one
//!   round trip per suggestion request, no retries
//!
//!
//!
//! # Request Flow
//!
//! - `Authorization: Bearer <token>` header is verified per request by the
//!   [`auth::Identity`] extractor on protected routes
//! - Missing credential and invalid/expired credential are distinct
//!   outcomes (401 vs 403) so the frontend can tell "log in" from
//!   "log in again"
//! - Handlers dispatch to the profile store or the suggestion composer and
//!   every outcome maps to a JSON response; nothing here aborts the process
//!
//!
//!
//! # Notes
//!
//! ## Suggestion parsing
//! The provider returns free-form text. We ask it to emit an
//! "Implementation Instructions:" section and split on that marker; both
//! halves get a fixed fallback string when empty so the frontend always
//! has something to render.
use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod error;
pub mod profile;
pub mod routes;
pub mod state;
pub mod suggest;
pub mod users;

use routes::{
    login_handler, not_found_handler, profile_fetch_handler, profile_merge_handler,
    profile_save_handler, register_handler, status_handler, suggestions_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));
    let cors = if state.config.allowed_origin == "*" {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(
            state
                .config
                .allowed_origin
                .parse::<HeaderValue>()
                .expect("Invalid ALLOWED_ORIGIN"),
        )
    };

    let app = Router::new()
        .route("/status", get(status_handler))
        .route("/auth/login", post(login_handler))
        .route("/register", post(register_handler))
        .route(
            "/profile",
            get(profile_fetch_handler)
                .post(profile_save_handler)
                .put(profile_merge_handler),
        )
        .route("/ai-suggestions", post(suggestions_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
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
