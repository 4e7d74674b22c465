use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Collection,
};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{ServiceFields, ServiceModel};
use crate::shared::AppError;
use crate::store::{compare_json, DeleteAck, InsertAck, ServiceQuery, SortOrder, UpdateAck};

/// Trait for service listing repository operations
#[async_trait]
pub trait ServiceRepository {
    async fn list_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceModel>, AppError>;
    async fn list_by_provider(&self, email: &str) -> Result<Vec<ServiceModel>, AppError>;
    async fn get_service(&self, id: &ObjectId) -> Result<Option<ServiceModel>, AppError>;
    async fn insert_service(&self, service: &ServiceModel) -> Result<InsertAck, AppError>;

    /// Sets the given fields on the listing, creating it under `id` when absent
    async fn upsert_service(
        &self,
        id: &ObjectId,
        fields: &ServiceFields,
    ) -> Result<UpdateAck, AppError>;

    async fn delete_service(&self, id: &ObjectId) -> Result<DeleteAck, AppError>;
}

/// In-memory implementation of ServiceRepository for development and testing
///
/// Listings are kept in insertion order, which serves as the natural order
/// for unsorted listings. Data is lost when the application restarts.
pub struct InMemoryServiceRepository {
    services: Mutex<Vec<ServiceModel>>,
}

impl Default for InMemoryServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self {
            services: Mutex::new(Vec::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated listings, assigning ids where missing
    pub fn with_services(services: Vec<ServiceModel>) -> Self {
        let services = services
            .into_iter()
            .map(|mut service| {
                service.id.get_or_insert_with(ObjectId::new);
                service
            })
            .collect();

        Self {
            services: Mutex::new(services),
        }
    }

    pub fn service_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ServiceModel>> {
        // Every write leaves the Vec consistent, so a poisoned lock is still usable
        self.services
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    #[instrument(skip(self))]
    async fn list_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceModel>, AppError> {
        debug!("Listing services from memory");

        let services = self.lock();
        let mut matching: Vec<ServiceModel> = services
            .iter()
            .filter(|service| query.matches_name(&service.service_name))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            matching.sort_by(|a, b| {
                let ordering = compare_json(
                    a.field(&sort.field).as_ref(),
                    b.field(&sort.field).as_ref(),
                );
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            matching.truncate(limit.max(0) as usize);
        }

        debug!(count = matching.len(), "Services listed from memory");
        Ok(matching)
    }

    #[instrument(skip(self))]
    async fn list_by_provider(&self, email: &str) -> Result<Vec<ServiceModel>, AppError> {
        debug!("Listing provider services from memory");

        let services = self.lock();
        Ok(services
            .iter()
            .filter(|service| service.provider_email == email)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_service(&self, id: &ObjectId) -> Result<Option<ServiceModel>, AppError> {
        debug!("Fetching service from memory");

        let services = self.lock();
        let service = services.iter().find(|s| s.id.as_ref() == Some(id)).cloned();

        if service.is_none() {
            debug!("Service not found in memory");
        }
        Ok(service)
    }

    #[instrument(skip(self, service))]
    async fn insert_service(&self, service: &ServiceModel) -> Result<InsertAck, AppError> {
        let mut services = self.lock();

        let id = service.id.unwrap_or_else(ObjectId::new);
        if services.iter().any(|s| s.id == Some(id)) {
            warn!(id = %id, "Service already exists in memory");
            return Err(AppError::DatabaseError("Duplicate key _id".to_string()));
        }

        let mut stored = service.clone();
        stored.id = Some(id);
        services.push(stored);

        debug!(id = %id, "Service inserted in memory");
        Ok(InsertAck::new(id))
    }

    #[instrument(skip(self, fields))]
    async fn upsert_service(
        &self,
        id: &ObjectId,
        fields: &ServiceFields,
    ) -> Result<UpdateAck, AppError> {
        let mut services = self.lock();

        if let Some(existing) = services.iter_mut().find(|s| s.id.as_ref() == Some(id)) {
            let modified = existing.apply(fields);
            debug!(modified, "Service updated in memory");
            return Ok(UpdateAck::matched(modified));
        }

        let mut created = ServiceModel::new("", "");
        created.id = Some(*id);
        created.apply(fields);
        services.push(created);

        debug!("Service upserted in memory");
        Ok(UpdateAck::upserted(*id))
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: &ObjectId) -> Result<DeleteAck, AppError> {
        let mut services = self.lock();

        let before = services.len();
        services.retain(|s| s.id.as_ref() != Some(id));
        let deleted = (before - services.len()) as u64;

        debug!(deleted, "Service delete applied in memory");
        Ok(DeleteAck::new(deleted))
    }
}

/// MongoDB implementation of the service listing repository
pub struct MongoServiceRepository {
    collection: Collection<ServiceModel>,
}

impl MongoServiceRepository {
    pub fn new(collection: Collection<ServiceModel>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl ServiceRepository for MongoServiceRepository {
    #[instrument(skip(self))]
    async fn list_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceModel>, AppError> {
        debug!("Listing services from store");

        let cursor = self
            .collection
            .find(query.to_filter(), query.to_find_options())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list services");
                AppError::from(e)
            })?;

        let services: Vec<ServiceModel> = cursor.try_collect().await?;
        debug!(count = services.len(), "Services listed from store");
        Ok(services)
    }

    #[instrument(skip(self))]
    async fn list_by_provider(&self, email: &str) -> Result<Vec<ServiceModel>, AppError> {
        debug!("Listing provider services from store");

        let cursor = self
            .collection
            .find(doc! { "providerEmail": email }, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list provider services");
                AppError::from(e)
            })?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_service(&self, id: &ObjectId) -> Result<Option<ServiceModel>, AppError> {
        debug!("Fetching service from store");

        self.collection
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch service");
                AppError::from(e)
            })
    }

    #[instrument(skip(self, service))]
    async fn insert_service(&self, service: &ServiceModel) -> Result<InsertAck, AppError> {
        let result = self
            .collection
            .insert_one(service, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to insert service");
                AppError::from(e)
            })?;

        InsertAck::try_from(result)
    }

    #[instrument(skip(self, fields))]
    async fn upsert_service(
        &self,
        id: &ObjectId,
        fields: &ServiceFields,
    ) -> Result<UpdateAck, AppError> {
        let update = fields.to_update_document()?;
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(doc! { "_id": *id }, update, options)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to upsert service");
                AppError::from(e)
            })?;

        Ok(UpdateAck::from(result))
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: &ObjectId) -> Result<DeleteAck, AppError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete service");
                AppError::from(e)
            })?;

        Ok(DeleteAck::from(result))
    }
}
