pub mod api;
pub mod client;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::event_service::EventService;
use crate::services::file_service::FileService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::list_files,
        api::handlers::files::upload_file,
        api::handlers::files::clear_files,
        api::handlers::files::delete_file,
        api::handlers::events::list_events,
        api::handlers::events::create_event,
        api::handlers::events::update_event,
        api::handlers::events::delete_event,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::FileRecord,
            models::Event,
            models::NewEvent,
            models::EventPatch,
            models::ClearReport,
            models::UnlinkResult,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "PDF upload and management endpoints"),
        (name = "events", description = "Calendar event endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub file_service: Arc<FileService>,
    pub event_service: Arc<EventService>,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the services around an already opened store handle
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let file_service = Arc::new(FileService::new(db.clone(), storage.clone(), config.clone()));
        let event_service = Arc::new(EventService::new(db.clone()));

        Self {
            db,
            storage,
            file_service,
            event_service,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::health::root))
        .route("/health", get(api::handlers::health::health_check))
        .route("/pdfs", get(api::handlers::files::list_files))
        .route(
            "/upload",
            post(api::handlers::files::upload_file).layer(axum::extract::DefaultBodyLimit::max(
                state.config.max_file_size + 1024 * 1024, // Add 1MB buffer for multipart overhead
            )),
        )
        .route("/pdfs/clear", delete(api::handlers::files::clear_files))
        .route("/pdfs/:id/delete", delete(api::handlers::files::delete_file))
        .route(
            "/events",
            get(api::handlers::events::list_events).post(api::handlers::events::create_event),
        )
        .route(
            "/events/:id",
            put(api::handlers::events::update_event).delete(api::handlers::events::delete_event),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// CORS for the configured origins. A wildcard cannot be combined with
/// credentials, so credentials are only allowed for explicit origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
