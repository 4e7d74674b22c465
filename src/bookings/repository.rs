use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection,
};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::BookingModel;
use crate::shared::AppError;
use crate::store::{DeleteAck, InsertAck};

/// Trait for booking repository operations
#[async_trait]
pub trait BookingRepository {
    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingModel>, AppError>;
    async fn insert_booking(&self, booking: &BookingModel) -> Result<InsertAck, AppError>;
    async fn delete_booking(&self, id: &ObjectId) -> Result<DeleteAck, AppError>;
}

/// In-memory implementation of BookingRepository for development and testing
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<BookingModel>>,
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn booking_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BookingModel>> {
        self.bookings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    #[instrument(skip(self))]
    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingModel>, AppError> {
        debug!("Listing bookings from memory");

        let bookings = self.lock();
        Ok(bookings
            .iter()
            .filter(|booking| booking.customer_email == email)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, booking))]
    async fn insert_booking(&self, booking: &BookingModel) -> Result<InsertAck, AppError> {
        let mut bookings = self.lock();

        let id = booking.id.unwrap_or_else(ObjectId::new);
        if bookings.iter().any(|b| b.id == Some(id)) {
            warn!(id = %id, "Booking already exists in memory");
            return Err(AppError::DatabaseError("Duplicate key _id".to_string()));
        }

        let mut stored = booking.clone();
        stored.id = Some(id);
        bookings.push(stored);

        debug!(id = %id, "Booking inserted in memory");
        Ok(InsertAck::new(id))
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: &ObjectId) -> Result<DeleteAck, AppError> {
        let mut bookings = self.lock();

        let before = bookings.len();
        bookings.retain(|b| b.id.as_ref() != Some(id));

        Ok(DeleteAck::new((before - bookings.len()) as u64))
    }
}

/// Owner filter: `customerEmail` when present, the older `email` field otherwise.
/// Matches the same documents `BookingModel` resolves to `email`.
fn customer_filter(email: &str) -> Document {
    doc! {
        "$or": [
            { "customerEmail": email },
            { "customerEmail": { "$exists": false }, "email": email },
        ]
    }
}

/// MongoDB implementation of the booking repository
pub struct MongoBookingRepository {
    collection: Collection<BookingModel>,
}

impl MongoBookingRepository {
    pub fn new(collection: Collection<BookingModel>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    #[instrument(skip(self))]
    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingModel>, AppError> {
        debug!("Listing bookings from store");

        let cursor = self.collection.find(customer_filter(email), None).await.map_err(|e| {
            warn!(error = %e, "Failed to list bookings");
            AppError::from(e)
        })?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, booking))]
    async fn insert_booking(&self, booking: &BookingModel) -> Result<InsertAck, AppError> {
        let result = self
            .collection
            .insert_one(booking, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to insert booking");
                AppError::from(e)
            })?;

        InsertAck::try_from(result)
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: &ObjectId) -> Result<DeleteAck, AppError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete booking");
                AppError::from(e)
            })?;

        Ok(DeleteAck::from(result))
    }
}
