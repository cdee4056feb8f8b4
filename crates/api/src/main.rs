use std::net::SocketAddr;
use std::sync::Arc;

use cardsmith_inference::{FlashcardGenerator, GroqClient};
use cardsmith_store::{FirestoreStore, FlashcardStore, MemoryStore, UserStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardsmith_api::config::AppConfig;
use cardsmith_api::router::build_app_router;
use cardsmith_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing (before config so config warnings are visible) ---
    let debug = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let default_filter = if debug {
        "cardsmith_api=debug,cardsmith_inference=debug,cardsmith_store=debug,tower_http=debug"
    } else {
        "cardsmith_api=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Document store ---
    // A missing project id or unusable credentials file degrades to the
    // in-memory store instead of refusing to start.
    let (users, sets, store_label): (Arc<dyn UserStore>, Arc<dyn FlashcardStore>, &'static str) =
        match FirestoreStore::connect(&config.firestore) {
            Ok(store) => {
                tracing::info!("Firestore adapter initialized");
                let store = Arc::new(store);
                (store.clone(), store, "firestore")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Firestore unavailable, using the in-memory store");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store, "memory")
            }
        };

    // --- Flashcard generator ---
    // No usable API key leaves the service up with generation disabled.
    let generator = if config.groq.enabled() {
        match GroqClient::new(&config.groq) {
            Ok(client) => {
                tracing::info!(model = %config.groq.model, "Flashcard generation enabled");
                Some(Arc::new(FlashcardGenerator::new(Arc::new(client))))
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not build the inference client; generation disabled");
                None
            }
        }
    } else {
        tracing::warn!("No inference API key configured; generation disabled");
        None
    };

    // --- App state & router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        users,
        sets,
        generator,
        store_label,
    };
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
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
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
