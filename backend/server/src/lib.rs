//! Backend of a protective-equipment catalog site.
//!
//!
//!
//! # General Infrastructure
//! - Static frontend serves the catalog pages and talks to this API
//! - One backend container behind the reverse proxy, no state outside the
//!   process apart from the dataset file
//! - Catalog data is a JSON file mounted read-only, loaded once at startup
//! - Form submissions fan out to the shop email and WhatsApp, nothing is
//!   persisted server-side
//!
//!
//!
//! # Dataset
//!
//! `data/catalog.json` is hand-edited and normalized with the `process`
//! tool before deployment:
//!
//! ```sh
//! cargo run -p process -- data/catalog.json
//! ```
//!
//! The loader refuses a dataset with two current catalogs, so a bad edit
//! fails at startup rather than serving an arbitrary catalog.
//!
//!
//!
//! # Configuration
//!
//! Environment variables, secrets via `/run/secrets`:
//! - `RUST_PORT`, `GEAR_DATA_PATH`
//! - `EMAIL_API_URL`, `EMAIL_API_KEY`, `EMAIL_FROM`, `EMAIL_TO`
//! - `WHATSAPP_API_URL`, `WHATSAPP_PHONE_ID`, `WHATSAPP_RECIPIENT`,
//!   `WHATSAPP_TOKEN`
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD`
//!
//! Missing notification or admin secrets disable the feature with a
//! warning instead of refusing to boot, the catalog pages keep working.
//!
//!
//!
//! # Smoke Test
//!
//! With a server running locally:
//!
//! ```sh
//! cargo run -p tester
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;

use routes::{
    admin_stats_handler, categories_handler, chat_handler, current_catalog_handler, login_handler,
    logout_handler, me_handler, newsletter_handler, products_handler, quotes_handler,
    sub_categories_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/catalogs/current", get(current_catalog_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/subcategories", get(sub_categories_handler))
        .route("/api/products", get(products_handler))
        .route("/api/quotes", post(quotes_handler))
        .route("/api/newsletter", post(newsletter_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/admin/stats", get(admin_stats_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    let app = router(state.clone());

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
