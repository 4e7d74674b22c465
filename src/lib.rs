// Library crate for the Pet Haven marketplace server
// This file exposes the public API for integration tests

pub mod auth;
pub mod bookings;
pub mod config;
pub mod routes;
pub mod services;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use auth::{TokenClaims, TokenConfig};
pub use config::{AppConfig, CookiePolicy};
pub use routes::build_router;
pub use shared::{AppError, AppState};
