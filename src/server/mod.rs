//! HTTP server exposing the menu flow

pub mod routes;

use crate::core::context::AppContext;
use crate::core::flow::FLOW_NAME;
use crate::core::CompletionClient;
use crate::utils::error::Result;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router<C: CompletionClient + 'static>(context: Arc<AppContext<C>>) -> Router {
    let cors = cors_layer(&context.config.server.cors_origins);

    Router::new()
        .route(&format!("/{}", FLOW_NAME), post(routes::menu_question::<C>))
        .route("/health", get(routes::health::<C>))
        .with_state(context)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// `*` allows every origin, method and header.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
pub async fn run<C: CompletionClient + 'static>(context: Arc<AppContext<C>>) -> Result<()> {
    let addr = context.config.bind_address();
    let app = router(context);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🍔 Listening on http://{} (POST /{})", addr, FLOW_NAME);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
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
                warn!("Cannot listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
