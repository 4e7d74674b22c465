use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored booking. The booked service is embedded as a snapshot
/// (serviceId, serviceName, price, date, ...) in the flattened fields.
///
/// Older documents carry the owner as `email`; it stays in `extra` as stored
/// and fills `customer_email` only when `customerEmail` is absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredBooking")]
pub struct BookingModel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "customerEmail")]
    pub customer_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct StoredBooking {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(rename = "customerEmail")]
    customer_email: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredBooking> for BookingModel {
    fn from(stored: StoredBooking) -> Self {
        let customer_email = stored
            .customer_email
            .or_else(|| legacy_email(&stored.extra))
            .unwrap_or_default();

        Self {
            id: stored.id,
            customer_email,
            extra: stored.extra,
        }
    }
}

/// The pre-`customerEmail` owner field, if it holds a string
pub(super) fn legacy_email(extra: &Map<String, Value>) -> Option<String> {
    extra.get("email").and_then(Value::as_str).map(str::to_string)
}

impl BookingModel {
    pub fn new(customer_email: impl Into<String>) -> Self {
        Self {
            id: None,
            customer_email: customer_email.into(),
            extra: Map::new(),
        }
    }
}
