use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    catalog::CatalogService,
    models::ServiceFields,
    types::{CreateServiceRequest, ProviderParams, ServiceListParams, ServiceResponse},
};
use crate::shared::{AppError, AppState};
use crate::store::{DeleteAck, InsertAck, UpdateAck};

fn catalog(state: &AppState) -> CatalogService {
    CatalogService::new(Arc::clone(&state.service_repository))
}

/// GET /api/v1/popularServices
#[instrument(name = "popular_services", skip(state))]
pub async fn popular_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services = catalog(&state).popular_services().await?;
    info!(count = services.len(), "Popular services listed");
    Ok(Json(services))
}

/// GET /api/v1/services?serviceName=&sortField=&sortOrder=
#[instrument(name = "list_services", skip(state))]
pub async fn list_services(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ServiceListParams>, AppError>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    Ok(Json(catalog(&state).list_services(params).await?))
}

/// GET /api/v1/user/services?email=
#[instrument(name = "provider_services", skip(state))]
pub async fn provider_services(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ProviderParams>, AppError>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    Ok(Json(catalog(&state).provider_services(params.email).await?))
}

/// GET /api/v1/services/:id
#[instrument(name = "get_service", skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, AppError> {
    Ok(Json(catalog(&state).get_service(&id).await?))
}

/// POST /api/v1/user/create-service
#[instrument(name = "create_service", skip(state, request))]
pub async fn create_service(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateServiceRequest>, AppError>,
) -> Result<Json<InsertAck>, AppError> {
    info!(service_name = %request.service_name, "Creating new service");
    Ok(Json(catalog(&state).create_service(request).await?))
}

/// PUT /api/v1/user/service/:id
///
/// Upserts: an unknown id creates a new listing under that id
#[instrument(name = "update_service", skip(state, fields))]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(fields), _): WithRejection<Json<ServiceFields>, AppError>,
) -> Result<Json<UpdateAck>, AppError> {
    Ok(Json(catalog(&state).update_service(&id, fields).await?))
}

/// DELETE /api/v1/user/service/:id
#[instrument(name = "delete_service", skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(catalog(&state).delete_service(&id).await?))
}
