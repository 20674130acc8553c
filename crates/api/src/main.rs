use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrina_api::config::ServerConfig;
use vitrina_api::router::build_app_router;
use vitrina_api::state::AppState;
use vitrina_bot::{HttpCatalogGateway, SubmissionMachine, TelegramApi, TelegramClient};
use vitrina_store::{ImageStore, JsonStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrina_api=debug,vitrina_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");
    std::fs::create_dir_all(&config.image_dir).expect("Failed to create image directory");
    let store = Arc::new(JsonStore::new(&config.data_dir));
    let images = Arc::new(ImageStore::new(&config.image_dir));
    tracing::info!(data_dir = %config.data_dir.display(), "Collection store ready");

    // --- Bot ---
    let bot = match config.bot_token.clone() {
        Some(token) => Some(
            start_bot(&config, token, Arc::clone(&store), Arc::clone(&images)).await,
        ),
        None => {
            tracing::info!("BOT_TOKEN not set, bot disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        images,
        bot,
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

/// Build the submission machine and register the webhook.
///
/// Webhook registration failure is logged but not fatal: the API surface
/// still works, and the webhook endpoint stays live for when Telegram
/// reaches it.
async fn start_bot(
    config: &ServerConfig,
    token: String,
    store: Arc<JsonStore>,
    images: Arc<ImageStore>,
) -> Arc<SubmissionMachine> {
    let telegram =
        Arc::new(TelegramClient::new(token).expect("Failed to build Telegram client"));
    let catalog = Arc::new(
        HttpCatalogGateway::new(
            config.add_product_url(),
            Duration::from_secs(config.forward_timeout_secs),
        )
        .expect("Failed to build catalog gateway"),
    );

    let webhook_url = config.webhook_url();
    if let Err(error) = telegram.delete_webhook().await {
        tracing::warn!(%error, "Failed to remove previous webhook");
    }
    match telegram.set_webhook(&webhook_url).await {
        Ok(()) => tracing::info!(url = %webhook_url, "Webhook registered"),
        Err(error) => tracing::error!(%error, "Failed to register webhook, continuing anyway"),
    }

    Arc::new(SubmissionMachine::new(
        telegram,
        catalog,
        store,
        images,
        config.pending_ttl(),
    ))
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
