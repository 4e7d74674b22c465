use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use pethaven::{
    bookings::repository::{BookingRepository, InMemoryBookingRepository},
    build_router,
    services::repository::InMemoryServiceRepository,
    AppState, CookiePolicy, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `token` cookie set by this response, if any
    pub fn token_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("token="))
            .map(|value| {
                value
                    .trim_start_matches("token=")
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

pub struct TestApp {
    pub router: Router,
    pub token_config: TokenConfig,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> TestResponse {
        let request = Request::get(uri)
            .header(header::COOKIE, format!("token={}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(json_request("PUT", uri, body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Signs in through the API and returns the issued token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/auth/access-token",
                serde_json::json!({ "email": email }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.token_cookie().expect("token cookie")
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub struct TestAppBuilder {
    booking_repository: Option<Arc<dyn BookingRepository + Send + Sync>>,
    expiration_hours: i64,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            booking_repository: None,
            expiration_hours: 24,
        }
    }

    #[allow(dead_code)]
    pub fn with_booking_repository(
        mut self,
        repo: Arc<dyn BookingRepository + Send + Sync>,
    ) -> Self {
        self.booking_repository = Some(repo);
        self
    }

    #[allow(dead_code)]
    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    pub fn build(self) -> TestApp {
        let token_config = TokenConfig::new(TEST_SECRET, self.expiration_hours);
        let state = AppState::new(
            Arc::new(InMemoryServiceRepository::new()),
            self.booking_repository
                .unwrap_or_else(|| Arc::new(InMemoryBookingRepository::new())),
            token_config.clone(),
            CookiePolicy::default(),
        );

        TestApp {
            router: build_router(state),
            token_config,
        }
    }
}
