use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar},
    WithRejection,
};
use tracing::{debug, info, instrument};

use super::{
    token::TOKEN_COOKIE,
    types::{AccessTokenRequest, AuthResponse},
};
use crate::config::CookiePolicy;
use crate::shared::{AppError, AppState};

fn token_cookie(value: String, policy: CookiePolicy) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site())
        .build()
}

/// HTTP handler for issuing an access token
///
/// POST /api/v1/auth/access-token
/// Signs the posted user object and sets it as an httpOnly `token` cookie
#[instrument(name = "issue_access_token", skip(state, jar, request))]
pub async fn issue_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<AccessTokenRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    info!(email = %request.email, "Issuing access token");

    let token = state.token_config.create_token(&request)?;
    let jar = jar.add(token_cookie(token, state.cookie_policy));

    info!(
        email = %request.email,
        expiration_hours = state.token_config.expiration_hours,
        "Access token issued"
    );

    Ok((jar, Json(AuthResponse::ok())))
}

/// HTTP handler for logging out
///
/// POST /api/v1/logout
/// Clears the `token` cookie; succeeds whether or not one was present
#[instrument(name = "logout", skip(state, jar, body))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> (CookieJar, Json<AuthResponse>) {
    if !body.is_empty() {
        debug!(body = %String::from_utf8_lossy(&body), "Logout requested");
    }

    let had_token = jar.get(TOKEN_COOKIE).is_some();

    // An expired empty cookie is sent even when the request carried none
    let mut removal = token_cookie(String::new(), state.cookie_policy);
    removal.make_removal();
    let jar = jar.add(removal);

    info!(had_token, "Token cookie cleared");

    (jar, Json(AuthResponse::ok()))
}
