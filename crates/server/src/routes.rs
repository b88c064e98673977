use axum::{
    http::HeaderValue,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{env::spa_index, types::Health};
use service::pagination::Pagination;

use crate::{metrics, openapi::ApiDoc, state::AppState};

pub mod locations;
pub mod organizations;
pub mod resources;
pub mod services;
pub mod settings;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `page`/`perPage` query values to service pagination.
pub(crate) fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    Pagination::new(page, per_page)
}

/// Permissive when no origin is configured.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router: health, metrics, docs and the
/// organization API. `static_dir`, when given, serves a SPA for every
/// unmatched path.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: Option<&str>) -> Router {
    let organizations = Router::new()
        .route("/organizations", get(organizations::list).post(organizations::create))
        .route("/organizations/slug/:slug", get(organizations::get_by_slug))
        .route(
            "/organizations/:org_id",
            get(organizations::get).patch(organizations::update).delete(organizations::delete),
        )
        .route("/organizations/:org_id/locations", get(locations::list).post(locations::create))
        .route(
            "/organizations/:org_id/locations/:id",
            get(locations::get).patch(locations::update).delete(locations::delete),
        )
        .route("/organizations/:org_id/resources", get(resources::list).post(resources::create))
        .route(
            "/organizations/:org_id/resources/:id",
            get(resources::get).patch(resources::update).delete(resources::delete),
        )
        .route("/organizations/:org_id/services", get(services::list).post(services::create))
        .route(
            "/organizations/:org_id/services/:id",
            get(services::get).patch(services::update).delete(services::delete),
        )
        .route(
            "/organizations/:org_id/settings",
            get(settings::get).put(settings::upsert).patch(settings::upsert),
        );

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .merge(organizations)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(spa_index(dir))));
    }

    app.layer(middleware::from_fn(metrics::track))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
