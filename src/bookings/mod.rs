// Public API - what other modules can use
pub use handlers::{cancel_booking, create_booking, list_bookings};
pub use types::{BookingResponse, CreateBookingRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
