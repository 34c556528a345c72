//! Route assembly
//!
//! Entity routers live in their own modules and are nested here, together
//! with the welcome endpoint, the OpenAPI document, request tracing, and
//! the CORS layer.

pub mod cat;
pub mod health;
pub mod mission;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::openapi::ApiDoc;
use crate::services::BreedValidator;
use crate::types::WelcomeResponse;

// ============================================================================
// ROOT ENDPOINTS
// ============================================================================

/// GET / - welcome message pointing at the interactive docs
#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses(
        (status = 200, description = "Service welcome message", body = WelcomeResponse),
    ),
)]
pub async fn welcome() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to the Clowder Spy Cat Agency API".to_string(),
        docs: "/swagger-ui".to_string(),
    })
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Assemble the full application router.
///
/// CORS sits outermost so preflights never reach the handlers; tracing
/// wraps everything below it.
pub fn create_api_router(
    db: DbClient,
    breeds: Arc<BreedValidator>,
    config: &ApiConfig,
) -> Router {
    let router = Router::new()
        .nest("/cats", cat::create_router(db.clone(), breeds))
        .nest("/missions", mission::create_router(db.clone()))
        .nest("/health", health::create_router(db))
        .route("/", get(welcome))
        .route("/openapi.json", get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    };

    let cors = build_cors_layer(config);

    router.layer(TraceLayer::new_for_http()).layer(cors)
}

// ============================================================================
// CORS
// ============================================================================

/// Translate `ApiConfig` into a CORS layer: every origin in development,
/// the configured list (optionally with credentials) in production.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: no origin list configured, allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricting to configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}
