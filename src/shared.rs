use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::TokenConfig;
use crate::bookings::repository::BookingRepository;
use crate::config::CookiePolicy;
use crate::services::repository::ServiceRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub service_repository: Arc<dyn ServiceRepository + Send + Sync>,
    pub booking_repository: Arc<dyn BookingRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub cookie_policy: CookiePolicy,
}

impl AppState {
    pub fn new(
        service_repository: Arc<dyn ServiceRepository + Send + Sync>,
        booking_repository: Arc<dyn BookingRepository + Send + Sync>,
        token_config: TokenConfig,
        cookie_policy: CookiePolicy,
    ) -> Self {
        Self {
            service_repository,
            booking_repository,
            token_config,
            cookie_policy,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InvalidId(id) => (StatusCode::BAD_REQUEST, format!("Invalid id: {}", id)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::JwtError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", msg),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), message = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), message = %message, "Request rejected");
        }

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::bookings::models::BookingModel;
    use crate::bookings::repository::InMemoryBookingRepository;
    use crate::services::models::{ServiceFields, ServiceModel};
    use crate::services::repository::InMemoryServiceRepository;
    use crate::store::{DeleteAck, InsertAck, ServiceQuery, UpdateAck};
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;

    pub const TEST_SECRET: &str = "test-secret";

    /// Service repository whose every call fails like an unreachable store
    pub struct FailingServiceRepository;

    #[async_trait]
    impl ServiceRepository for FailingServiceRepository {
        async fn list_services(&self, _query: &ServiceQuery) -> Result<Vec<ServiceModel>, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn list_by_provider(&self, _email: &str) -> Result<Vec<ServiceModel>, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn get_service(&self, _id: &ObjectId) -> Result<Option<ServiceModel>, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn insert_service(&self, _service: &ServiceModel) -> Result<InsertAck, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn upsert_service(
            &self,
            _id: &ObjectId,
            _fields: &ServiceFields,
        ) -> Result<UpdateAck, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn delete_service(&self, _id: &ObjectId) -> Result<DeleteAck, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
    }

    /// Booking repository whose every call fails like an unreachable store
    pub struct FailingBookingRepository;

    #[async_trait]
    impl BookingRepository for FailingBookingRepository {
        async fn list_by_customer(&self, _email: &str) -> Result<Vec<BookingModel>, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn insert_booking(&self, _booking: &BookingModel) -> Result<InsertAck, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
        async fn delete_booking(&self, _id: &ObjectId) -> Result<DeleteAck, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        service_repository: Option<Arc<dyn ServiceRepository + Send + Sync>>,
        booking_repository: Option<Arc<dyn BookingRepository + Send + Sync>>,
        token_config: Option<TokenConfig>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                service_repository: None,
                booking_repository: None,
                token_config: None,
            }
        }

        pub fn with_service_repository(
            mut self,
            repo: Arc<dyn ServiceRepository + Send + Sync>,
        ) -> Self {
            self.service_repository = Some(repo);
            self
        }

        pub fn with_booking_repository(
            mut self,
            repo: Arc<dyn BookingRepository + Send + Sync>,
        ) -> Self {
            self.booking_repository = Some(repo);
            self
        }

        pub fn with_token_config(mut self, token_config: TokenConfig) -> Self {
            self.token_config = Some(token_config);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                service_repository: self
                    .service_repository
                    .unwrap_or_else(|| Arc::new(InMemoryServiceRepository::new())),
                booking_repository: self
                    .booking_repository
                    .unwrap_or_else(|| Arc::new(InMemoryBookingRepository::new())),
                token_config: self
                    .token_config
                    .unwrap_or_else(|| TokenConfig::new(TEST_SECRET, 24)),
                cookie_policy: CookiePolicy::default(),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
