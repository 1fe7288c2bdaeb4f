use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use service::db::catalog_service::{self, ServiceFilter};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::extract::Caller;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListServicesQuery {
    /// Substring match against name or description
    pub q: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn admin_only(caller: &Caller) -> Result<(), JsonApiError> {
    if caller.0.is_admin() {
        Ok(())
    } else {
        Err(JsonApiError::from(ServiceError::Forbidden))
    }
}

#[utoipa::path(
    post, path = "/services", tag = "services",
    request_body = crate::openapi::CreateServiceInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    caller: Caller,
    Json(input): Json<CreateServiceInput>,
) -> Result<(StatusCode, Json<models::service::Model>), JsonApiError> {
    admin_only(&caller)?;
    let created = catalog_service::create_service(
        &state.db,
        &input.name,
        &input.description,
        input.price,
        input.duration_minutes,
    )
    .await?;
    info!(id = %created.id, name = %created.name, "created service");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/services", tag = "services",
    params(ListServicesQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListServicesQuery>,
) -> Result<Json<Vec<models::service::Model>>, JsonApiError> {
    let filter = ServiceFilter {
        q: q.q,
        price_min: q.price_min,
        price_max: q.price_max,
        active: q.active,
    };
    let page = if q.page.is_none() && q.per_page.is_none() {
        None
    } else {
        Some(Pagination { page: q.page.unwrap_or(1), per_page: q.per_page.unwrap_or(20) })
    };
    let rows = catalog_service::list_services(&state.db, &filter, page).await?;
    info!(count = rows.len(), "list services");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::service::Model>, JsonApiError> {
    match catalog_service::get_service(&state.db, id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::from(ServiceError::not_found("service"))),
    }
}

#[utoipa::path(
    patch, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = crate::openapi::UpdateServiceInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<models::service::Model>, JsonApiError> {
    admin_only(&caller)?;
    let updated = catalog_service::update_service(
        &state.db,
        id,
        input.name,
        input.description,
        input.price,
        input.duration_minutes,
        input.is_active,
    )
    .await?;
    info!(id = %updated.id, "updated service");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    admin_only(&caller)?;
    if catalog_service::delete_service(&state.db, id).await? {
        info!(id = %id, "deleted service");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::from(ServiceError::not_found("service")))
    }
}
