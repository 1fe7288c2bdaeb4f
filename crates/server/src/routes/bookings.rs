use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::booking::BookingStatus;
use service::booking::{BookingFilter, BookingPatch, BookingView};

use crate::errors::JsonApiError;
use crate::extract::Caller;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingInput {
    pub service_id: Uuid,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingInput {
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListMineQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<BookingStatus>,
    pub start_from: Option<DateTime<FixedOffset>>,
    pub end_to: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListAllQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<BookingStatus>,
    pub start_from: Option<DateTime<FixedOffset>>,
    pub end_to: Option<DateTime<FixedOffset>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn page_of(page: Option<u32>, per_page: Option<u32>) -> Option<Pagination> {
    if page.is_none() && per_page.is_none() {
        return None;
    }
    Some(Pagination { page: page.unwrap_or(1), per_page: per_page.unwrap_or(20) })
}

#[utoipa::path(
    post, path = "/bookings", tag = "bookings",
    request_body = crate::openapi::CreateBookingInputDoc,
    responses(
        (status = 201, description = "Created, status starts at pending"),
        (status = 400, description = "Invalid interval"),
        (status = 401, description = "Missing identity headers"),
        (status = 404, description = "Service or user not found"),
        (status = 409, description = "Slot already booked")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Json(input): Json<CreateBookingInput>,
) -> Result<(StatusCode, Json<BookingView>), JsonApiError> {
    let view = state
        .bookings
        .create(actor, input.service_id, input.start_time, input.end_time)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get, path = "/bookings/me", tag = "bookings",
    params(ListMineQuery),
    responses(
        (status = 200, description = "The caller's bookings"),
        (status = 401, description = "Missing identity headers")
    )
)]
pub async fn list_mine(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Query(q): Query<ListMineQuery>,
) -> Result<Json<Vec<BookingView>>, JsonApiError> {
    let filter = BookingFilter {
        user_id: None,
        status: q.status,
        start_from: q.start_from,
        end_to: q.end_to,
    };
    let rows = state.bookings.list_mine(actor, filter, None).await?;
    info!(count = rows.len(), "list own bookings");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/bookings", tag = "bookings",
    params(ListAllQuery),
    responses(
        (status = 200, description = "All bookings"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_all(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Query(q): Query<ListAllQuery>,
) -> Result<Json<Vec<BookingView>>, JsonApiError> {
    let filter = BookingFilter {
        user_id: None,
        status: q.status,
        start_from: q.start_from,
        end_to: q.end_to,
    };
    let rows = state
        .bookings
        .list_all(actor, filter, page_of(q.page, q.per_page))
        .await?;
    info!(count = rows.len(), "list all bookings");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, JsonApiError> {
    Ok(Json(state.bookings.get(actor, id).await?))
}

#[utoipa::path(
    patch, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = crate::openapi::UpdateBookingInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Invalid patch for the caller's role"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Reschedule collides with another booking")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateBookingInput>,
) -> Result<Json<BookingView>, JsonApiError> {
    let patch = BookingPatch {
        start_time: input.start_time,
        end_time: input.end_time,
        status: input.status,
    };
    Ok(Json(state.bookings.update(actor, id, patch).await?))
}

#[utoipa::path(
    delete, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Booking already started"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Caller(actor): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.bookings.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
