/*!
 * stashr — a small file upload and serving backend
 *
 * Binary payloads arrive over multipart HTTP, get classified into an images
 * or documents subtree by declared MIME type, and are persisted under
 * sanitized, collision-resistant names. Images are re-encoded to lossy WebP;
 * everything is served back as static files under `/uploads`.
 */

pub mod auth;
pub mod config;
pub mod ingestion;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use ingestion::FileIngestionService;
use storage::LocalStorage;

/// Shared application state handed to every route handler.
pub struct AppState {
    pub config: Config,
    pub ingestion: FileIngestionService,
}

impl AppState {
    pub fn new(config: Config, storage: LocalStorage) -> Self {
        Self {
            config,
            ingestion: FileIngestionService::new(storage),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        routes::uploads::upload_file,
        routes::uploads::upload_files,
        routes::uploads::delete_file,
    ),
    components(schemas(models::UploadedFile)),
    modifiers(&SecurityAddon),
    tags(
        (name = "uploads", description = "File upload and deletion"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Assemble the application router around a shared state.
///
/// The transport body cap is sized for a full batch; the per-file and
/// per-batch bounds are enforced in the handlers with their own error
/// contract.
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_body_bytes();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(routes::health))
        .nest(
            "/api/uploads",
            routes::uploads::router().layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest_service("/uploads", ServeDir::new(state.config.upload_path.as_str()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
