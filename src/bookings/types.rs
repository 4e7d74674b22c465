use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::models::{legacy_email, BookingModel};
use crate::shared::AppError;

/// Request payload for booking a service.
/// The owner is `customerEmail`, or the older `email` when that is absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBookingRequest {
    #[serde(rename = "customerEmail", default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateBookingRequest {
    pub fn owner_email(&self) -> Option<String> {
        self.customer_email
            .clone()
            .or_else(|| legacy_email(&self.extra))
            .filter(|email| !email.trim().is_empty())
    }
}

impl TryFrom<CreateBookingRequest> for BookingModel {
    type Error = AppError;

    fn try_from(request: CreateBookingRequest) -> Result<Self, Self::Error> {
        let customer_email = request
            .owner_email()
            .ok_or_else(|| AppError::BadRequest("customerEmail is required".to_string()))?;

        let mut extra = request.extra;
        extra.remove("_id");

        Ok(BookingModel {
            id: None,
            customer_email,
            extra,
        })
    }
}

/// Query string of the booking listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub email: Option<String>,
}

/// Booking as returned to clients, with `_id` as a hex string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "customerEmail")]
    pub customer_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<BookingModel> for BookingResponse {
    fn from(model: BookingModel) -> Self {
        Self {
            id: model.id.map(|id| id.to_hex()).unwrap_or_default(),
            customer_email: model.customer_email,
            extra: model.extra,
        }
    }
}
