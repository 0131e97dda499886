use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vizier_api::config::ServerConfig;
use vizier_api::context::ContextCache;
use vizier_api::router::build_app_router;
use vizier_api::state::AppState;
use vizier_llm::{HttpLanguageModel, LanguageModel};
use vizier_query::{HttpQueryEngine, QueryEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vizier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Collaborators ---
    let query: Arc<dyn QueryEngine> = Arc::new(HttpQueryEngine::new(
        config.query.api_url.clone(),
        config.query.api_token.clone(),
    ));
    tracing::info!(url = %config.query.api_url, "Query engine client created");

    let llm: Arc<dyn LanguageModel> = Arc::new(HttpLanguageModel::new(
        config.llm.api_url.clone(),
        config.llm.api_key.clone(),
        config.llm.model.clone(),
    ));
    tracing::info!(model = %config.llm.model, "Language model client created");

    let context = ContextCache::new(
        Arc::clone(&query),
        Duration::from_secs(config.context_ttl_secs),
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        query,
        llm,
        context,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
