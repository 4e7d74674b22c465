use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::BookingService,
    types::{BookingListParams, BookingResponse, CreateBookingRequest},
};
use crate::auth::TokenClaims;
use crate::shared::{AppError, AppState};
use crate::store::{DeleteAck, InsertAck};

/// HTTP handler for listing the caller's bookings
///
/// GET /api/v1/user/bookings?email=
/// Requires the `require_token` middleware to have verified the cookie
#[instrument(name = "list_bookings", skip(state, claims))]
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    WithRejection(Query(params), _): WithRejection<Query<BookingListParams>, AppError>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let service = BookingService::new(Arc::clone(&state.booking_repository));
    let bookings = service
        .list_for_caller(&claims, params.email.as_deref())
        .await?;

    Ok(Json(bookings))
}

/// POST /api/v1/user/bookings
#[instrument(name = "create_booking", skip(state, request))]
pub async fn create_booking(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateBookingRequest>, AppError>,
) -> Result<Json<InsertAck>, AppError> {
    let service = BookingService::new(Arc::clone(&state.booking_repository));
    Ok(Json(service.create_booking(request).await?))
}

/// DELETE /api/v1/user/cancel-booking/:id
#[instrument(name = "cancel_booking", skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let service = BookingService::new(Arc::clone(&state.booking_repository));
    Ok(Json(service.cancel_booking(&id).await?))
}
