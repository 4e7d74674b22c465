use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::shared::{AppError, AppState};
use crate::{auth, bookings, services};

pub const LIVENESS_MESSAGE: &str = "Pet Haven Server is Running";

/// Builds the full HTTP surface: liveness at `/`, everything else under `/api/v1`
pub fn build_router(state: AppState) -> Router {
    let require_token = middleware::from_fn_with_state(state.clone(), auth::require_token);

    let api = Router::new()
        .route("/auth/access-token", post(auth::issue_access_token))
        .route("/logout", post(auth::logout))
        .route("/popularServices", get(services::popular_services))
        .route("/services", get(services::list_services))
        .route("/services/:id", get(services::get_service))
        .route("/user/services", get(services::provider_services))
        .route("/user/create-service", post(services::create_service))
        .route(
            "/user/service/:id",
            put(services::update_service).delete(services::delete_service),
        )
        // Only the listing is protected: route_layer wraps the methods registered before it
        .route(
            "/user/bookings",
            get(bookings::list_bookings)
                .route_layer(require_token)
                .post(bookings::create_booking),
        )
        .route(
            "/user/cancel-booking/:id",
            delete(bookings::cancel_booking),
        );

    Router::new()
        .route("/", get(|| async { LIVENESS_MESSAGE }))
        .nest("/api/v1", api)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// CORS for the browser client: listed origins only, with credentials so the cookie travels
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
