use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::protocol::{
    load_fallback_data, timestamp_now, HealthResponse, LoadFailure, SaveFailure, SaveResponse,
};
use crate::storage::SaveStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<SaveStore>,
}

impl AppState {
    pub fn new(store: SaveStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// API routes, with CORS open to any origin. When `static_dir` is given,
/// everything outside `/api` is served from it.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/load", get(load))
        .route("/api/save", post(save))
        .route("/api/health", get(health))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };
    app.layer(CorsLayer::permissive())
}

async fn load(State(state): State<AppState>) -> Response {
    match state.store.load().await {
        Ok(doc) => (StatusCode::OK, Json(doc)).into_response(),
        Err(e) => {
            error!("Load error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoadFailure {
                    error: "Load failed".to_string(),
                    fallback_data: load_fallback_data(),
                }),
            )
                .into_response()
        }
    }
}

async fn save(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match state.store.save(body).await {
        Ok(data) => (
            StatusCode::OK,
            Json(SaveResponse {
                status: "success".to_string(),
                data,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Save error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveFailure {
                    error: "Save failed".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp_now(),
    })
}

/// Bootstraps the save file, binds, and serves until the process exits.
pub async fn start(config: ServiceConfig) -> std::io::Result<()> {
    let store = SaveStore::new(&config.save_file);
    if let Err(e) = store.bootstrap().await {
        // Loads self-heal later; the service stays up.
        error!("Initialization error: {}", e);
    }

    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    let app = router(AppState::new(store), static_dir);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    info!("Save location: {}", config.save_file.display());
    if let Some(dir) = static_dir {
        info!("Serving static files from {}", dir.display());
    }

    axum::serve(listener, app).await
}
