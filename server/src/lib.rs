//! HTTP surface for recipebox.
//!
//! Every `/api/recipes` route resolves the bearer token to an owner before
//! touching that owner's saved list, and every mutation answers with the full
//! updated list so clients can re-render without a second fetch.
//!
//! | Route | Operation |
//! |---|---|
//! | `GET /api/recipes/saved` | list saved recipes in position order |
//! | `GET /api/recipes/favorites` | list favorites in position order |
//! | `POST /api/recipes/saved` | save (201) or update an existing save (200) |
//! | `PUT /api/recipes/saved/{recipe_id}/favorite` | set the favorite flag |
//! | `DELETE /api/recipes/saved/{recipe_id}` | remove and close the gap |
//! | `PUT /api/recipes/saved/reorder` | move one entry between indices |
//! | `DELETE /api/recipes/saved/reorder` | remove the recipe saved as `reorder` |
use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, put},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{
    list_favorites_handler, list_saved_handler, remove_handler, remove_reorder_handler,
    reorder_handler, root_handler, save_handler, toggle_favorite_handler,
};
use state::AppState;

/// Install the global tracing subscriber, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/", get(root_handler))
        .route("/api/recipes/favorites", get(list_favorites_handler))
        .route(
            "/api/recipes/saved",
            get(list_saved_handler).post(save_handler),
        )
        .route(
            "/api/recipes/saved/reorder",
            put(reorder_handler).delete(remove_reorder_handler),
        )
        .route(
            "/api/recipes/saved/{recipe_id}/favorite",
            put(toggle_favorite_handler),
        )
        .route("/api/recipes/saved/{recipe_id}", delete(remove_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Invalid CORS origin, allowing any: {e}");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Opening database at {}", config.database_path.display());
    let state = AppState::new(config)?;

    let app = router(state.clone());

    let address = state.config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => warn!("Failed to install Ctrl+C handler: {e}"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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
