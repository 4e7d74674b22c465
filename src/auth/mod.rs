// Public API - what other modules can use
pub use handlers::{issue_access_token, logout};
pub use middleware::require_token;
pub use token::{TokenConfig, TOKEN_COOKIE};
pub use types::{AccessTokenRequest, AuthResponse, TokenClaims};

// Internal modules
mod handlers;
mod middleware;
mod token;
mod types;
