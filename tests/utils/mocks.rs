use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicUsize, Ordering};

use pethaven::{
    bookings::{
        models::BookingModel,
        repository::{BookingRepository, InMemoryBookingRepository},
    },
    store::{DeleteAck, InsertAck},
    AppError,
};

/// In-memory booking repository that counts every store call
#[derive(Default)]
pub struct RecordingBookingRepository {
    inner: InMemoryBookingRepository,
    calls: AtomicUsize,
}

impl RecordingBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingRepository for RecordingBookingRepository {
    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingModel>, AppError> {
        self.record();
        self.inner.list_by_customer(email).await
    }

    async fn insert_booking(&self, booking: &BookingModel) -> Result<InsertAck, AppError> {
        self.record();
        self.inner.insert_booking(booking).await
    }

    async fn delete_booking(&self, id: &ObjectId) -> Result<DeleteAck, AppError> {
        self.record();
        self.inner.delete_booking(id).await
    }
}
