use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::BookingModel,
    repository::BookingRepository,
    types::{BookingResponse, CreateBookingRequest},
};
use crate::auth::TokenClaims;
use crate::shared::AppError;
use crate::store::{parse_object_id, DeleteAck, InsertAck};

/// Service for handling booking business logic
pub struct BookingService {
    repository: Arc<dyn BookingRepository + Send + Sync>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn BookingRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists the caller's bookings.
    ///
    /// The filter always uses the verified token email; a requested email that
    /// differs from it is Forbidden and the store is not queried.
    #[instrument(skip(self, claims), fields(caller = %claims.email))]
    pub async fn list_for_caller(
        &self,
        claims: &TokenClaims,
        requested_email: Option<&str>,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let requested = requested_email.map(str::trim).filter(|e| !e.is_empty());

        if let Some(requested) = requested {
            if requested != claims.email {
                warn!(requested = %requested, "Booking query email does not match token");
                return Err(AppError::Forbidden("Forbidden".to_string()));
            }
        }

        let bookings = self.repository.list_by_customer(&claims.email).await?;
        info!(count = bookings.len(), "Bookings listed");

        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<InsertAck, AppError> {
        let booking = BookingModel::try_from(request)?;
        let ack = self.repository.insert_booking(&booking).await?;

        info!(id = %ack.inserted_id, customer = %booking.customer_email, "Booking created");
        Ok(ack)
    }

    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, raw_id: &str) -> Result<DeleteAck, AppError> {
        let id = parse_object_id(raw_id)?;
        let ack = self.repository.delete_booking(&id).await?;

        info!(deleted = ack.deleted_count, "Booking cancellation processed");
        Ok(ack)
    }
}
