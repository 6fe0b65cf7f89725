//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    domain::{EventStore, SessionRegistry},
    usecase::{
        ConnectPeerUseCase, DisconnectPeerUseCase, GetEventUseCase, GetSessionsUseCase,
        IMAGE_URL_PREFIX, IngestUploadUseCase, RegisterEventUseCase, RelayMessageUseCase,
    },
};

use super::{
    handler::{
        create_event, debug_sessions, get_event, health_check, kiosk_ws_handler,
        mobile_ws_handler, only_stored_images, upload_image,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Kiosk pairing broker
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, event_store, registry);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Wire every use case on top of the given storage and registry
    pub fn new(
        config: ServerConfig,
        event_store: Arc<dyn EventStore>,
        registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        let state = Arc::new(AppState {
            connect_peer_usecase: Arc::new(ConnectPeerUseCase::new(
                event_store.clone(),
                registry.clone(),
            )),
            disconnect_peer_usecase: Arc::new(DisconnectPeerUseCase::new(registry.clone())),
            relay_message_usecase: Arc::new(RelayMessageUseCase::new(registry.clone())),
            ingest_upload_usecase: Arc::new(IngestUploadUseCase::new(
                event_store.clone(),
                registry.clone(),
            )),
            register_event_usecase: Arc::new(RegisterEventUseCase::new(
                event_store.clone(),
                config.public_url.clone(),
            )),
            get_event_usecase: Arc::new(GetEventUseCase::new(event_store)),
            get_sessions_usecase: Arc::new(GetSessionsUseCase::new(registry)),
            heartbeat: config.heartbeat,
        });

        Self { config, state }
    }

    /// Build the application router
    pub fn router(&self) -> Router {
        let stored_images = Router::new()
            .fallback_service(ServeDir::new(&self.config.data_dir))
            .layer(middleware::from_fn(only_stored_images));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/kiosk/{event_id}", get(kiosk_ws_handler))
            .route("/ws/mobile/{client_id}/{event_id}", get(mobile_ws_handler))
            // HTTP エンドポイント
            .route("/events", post(create_event))
            .route("/events/{event_id}", get(get_event))
            .route(
                "/images/upload/{event_id}/{client_id}",
                post(upload_image).layer(DefaultBodyLimit::max(self.config.max_upload_bytes)),
            )
            .route("/debug/sessions", get(debug_sessions))
            .route("/api/health", get(health_check))
            // 保存済み画像の配信
            .nest(IMAGE_URL_PREFIX, stored_images)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Kiosk bridge listening on {}", listener.local_addr()?);
        tracing::info!("Kiosks connect to: ws://{}/ws/kiosk/{{event_id}}", bind_addr);
        tracing::info!("Storing events under {}", self.config.data_dir.display());
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
