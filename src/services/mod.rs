// Public API - what other modules can use
pub use handlers::{
    create_service, delete_service, get_service, list_services, popular_services,
    provider_services, update_service,
};
pub use types::{CreateServiceRequest, ServiceResponse};

// Internal modules
mod catalog;
mod handlers;
pub mod models;
pub mod repository;
mod types;
