use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::AppError;

/// Stored service listing. Provider-supplied fields beyond the name and
/// provider email (price, description, image, ...) are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceModel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "serviceName", default)]
    pub service_name: String,
    #[serde(rename = "providerEmail", default)]
    pub provider_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceModel {
    pub fn new(service_name: impl Into<String>, provider_email: impl Into<String>) -> Self {
        Self {
            id: None,
            service_name: service_name.into(),
            provider_email: provider_email.into(),
            extra: Map::new(),
        }
    }

    /// Value of a top-level field by its stored name, used for in-memory sorting
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "_id" => self.id.map(|id| Value::String(id.to_hex())),
            "serviceName" => Some(Value::String(self.service_name.clone())),
            "providerEmail" => Some(Value::String(self.provider_email.clone())),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Merges the given fields into this listing; returns whether anything changed
    pub fn apply(&mut self, fields: &ServiceFields) -> bool {
        let before = self.clone();

        if let Some(name) = &fields.service_name {
            self.service_name = name.clone();
        }
        if let Some(email) = &fields.provider_email {
            self.provider_email = email.clone();
        }
        for (key, value) in &fields.extra {
            self.extra.insert(key.clone(), value.clone());
        }

        *self != before
    }
}

/// A partial set of listing fields, as sent by a provider editing a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceFields {
    #[serde(rename = "serviceName", default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(rename = "providerEmail", default, skip_serializing_if = "Option::is_none")]
    pub provider_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceFields {
    /// Drops the identifier, which is never writable
    pub fn without_id(mut self) -> Self {
        self.extra.remove("_id");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.service_name.is_none() && self.provider_email.is_none() && self.extra.is_empty()
    }

    /// `$set` operand for the store
    pub fn to_set_document(&self) -> Result<Document, AppError> {
        bson::to_document(self).map_err(|e| AppError::BadRequest(e.to_string()))
    }

    /// Upsert operand. A listing created by the upsert gets empty `serviceName`
    /// and `providerEmail` when the update leaves them out, the same record the
    /// in-memory repository creates.
    pub fn to_update_document(&self) -> Result<Document, AppError> {
        let mut update = doc! { "$set": self.to_set_document()? };

        let mut on_insert = Document::new();
        if self.service_name.is_none() {
            on_insert.insert("serviceName", "");
        }
        if self.provider_email.is_none() {
            on_insert.insert("providerEmail", "");
        }
        if !on_insert.is_empty() {
            update.insert("$setOnInsert", on_insert);
        }

        Ok(update)
    }
}
