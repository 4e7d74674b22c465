use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{ServiceFields, ServiceModel},
    repository::ServiceRepository,
    types::{CreateServiceRequest, ServiceListParams, ServiceResponse},
};
use crate::shared::AppError;
use crate::store::{parse_object_id, DeleteAck, InsertAck, ServiceQuery, SortSpec, UpdateAck};

/// Service for handling the service-listing catalog
pub struct CatalogService {
    repository: Arc<dyn ServiceRepository + Send + Sync>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ServiceRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// First listings in natural order
    #[instrument(skip(self))]
    pub async fn popular_services(&self) -> Result<Vec<ServiceResponse>, AppError> {
        let services = self.repository.list_services(&ServiceQuery::popular()).await?;
        Ok(into_responses(services))
    }

    /// All listings, optionally filtered by name and sorted
    #[instrument(skip(self))]
    pub async fn list_services(
        &self,
        params: ServiceListParams,
    ) -> Result<Vec<ServiceResponse>, AppError> {
        let query = ServiceQuery {
            name_contains: params
                .service_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            sort: SortSpec::from_params(params.sort_field.as_deref(), params.sort_order.as_deref())?,
            limit: None,
        };
        debug!(?query, "Built service query");

        let services = self.repository.list_services(&query).await?;
        info!(count = services.len(), "Services listed");
        Ok(into_responses(services))
    }

    /// Listings of one provider; no email means no listings
    #[instrument(skip(self))]
    pub async fn provider_services(
        &self,
        email: Option<String>,
    ) -> Result<Vec<ServiceResponse>, AppError> {
        let email = match email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
            Some(email) => email,
            None => {
                debug!("No provider email given, returning empty listing");
                return Ok(Vec::new());
            }
        };

        let services = self.repository.list_by_provider(&email).await?;
        info!(count = services.len(), "Provider services listed");
        Ok(into_responses(services))
    }

    #[instrument(skip(self))]
    pub async fn get_service(&self, raw_id: &str) -> Result<ServiceResponse, AppError> {
        let id = parse_object_id(raw_id)?;

        self.repository
            .get_service(&id)
            .await?
            .map(ServiceResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    #[instrument(skip(self, request), fields(provider = %request.provider_email))]
    pub async fn create_service(&self, request: CreateServiceRequest) -> Result<InsertAck, AppError> {
        let service = ServiceModel::from(request);
        let ack = self.repository.insert_service(&service).await?;

        info!(id = %ack.inserted_id, "Service created");
        Ok(ack)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_service(
        &self,
        raw_id: &str,
        fields: ServiceFields,
    ) -> Result<UpdateAck, AppError> {
        let id = parse_object_id(raw_id)?;
        let fields = fields.without_id();
        if fields.is_empty() {
            return Err(AppError::BadRequest(
                "Update must contain at least one field".to_string(),
            ));
        }

        let ack = self.repository.upsert_service(&id, &fields).await?;
        info!(
            matched = ack.matched_count,
            modified = ack.modified_count,
            upserted = ack.upserted_count,
            "Service updated"
        );
        Ok(ack)
    }

    #[instrument(skip(self))]
    pub async fn delete_service(&self, raw_id: &str) -> Result<DeleteAck, AppError> {
        let id = parse_object_id(raw_id)?;
        let ack = self.repository.delete_service(&id).await?;

        info!(deleted = ack.deleted_count, "Service delete processed");
        Ok(ack)
    }
}

fn into_responses(services: Vec<ServiceModel>) -> Vec<ServiceResponse> {
    services.into_iter().map(ServiceResponse::from).collect()
}
