use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::token::TOKEN_COOKIE;
use crate::shared::{AppError, AppState};

/// Cookie authentication middleware - validates the `token` cookie and adds TokenClaims to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::require_token))
/// Handlers can then extract Extension(claims): Extension<TokenClaims>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(req.headers());

    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            warn!("Missing token cookie in request");
            AppError::Unauthorized("Unauthorized".to_string())
        })?;

    let claims = match state.token_config.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Token authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(email = %claims.email, "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
