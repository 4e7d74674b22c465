use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::models::ServiceModel;

/// Request payload for creating a new service listing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateServiceRequest {
    #[serde(rename = "serviceName")]
    pub service_name: String,
    #[serde(rename = "providerEmail")]
    pub provider_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<CreateServiceRequest> for ServiceModel {
    fn from(request: CreateServiceRequest) -> Self {
        let mut extra = request.extra;
        extra.remove("_id");

        ServiceModel {
            id: None,
            service_name: request.service_name,
            provider_email: request.provider_email,
            extra,
        }
    }
}

/// Query string of the service listing endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListParams {
    pub service_name: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

/// Query string of the provider listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ProviderParams {
    pub email: Option<String>,
}

/// Service listing as returned to clients, with `_id` as a hex string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "serviceName")]
    pub service_name: String,
    #[serde(rename = "providerEmail")]
    pub provider_email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<ServiceModel> for ServiceResponse {
    fn from(model: ServiceModel) -> Self {
        Self {
            id: model.id.map(|id| id.to_hex()).unwrap_or_default(),
            service_name: model.service_name,
            provider_email: model.provider_email,
            extra: model.extra,
        }
    }
}
