use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use common::pagination::Pagination;
use models::service;

use crate::errors::ServiceError;

/// Catalog listing filters, AND-combined when present.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Substring match against name or description
    pub q: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub active: Option<bool>,
}

/// Create a catalog service. New services start out active.
pub async fn create_service(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    price: f64,
    duration_minutes: i32,
) -> Result<service::Model, ServiceError> {
    Ok(service::create(db, name, description, price, duration_minutes).await?)
}

/// Get a catalog service by id, active or not.
pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<service::Model>, ServiceError> {
    Ok(service::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Storage(e.to_string()))?)
}

/// List catalog services, name-ordered, optionally paginated.
pub async fn list_services(
    db: &DatabaseConnection,
    filter: &ServiceFilter,
    page: Option<Pagination>,
) -> Result<Vec<service::Model>, ServiceError> {
    let mut query = service::Entity::find().order_by_asc(service::Column::Name);
    if let Some(q) = &filter.q {
        query = query.filter(
            Condition::any()
                .add(service::Column::Name.contains(q))
                .add(service::Column::Description.contains(q)),
        );
    }
    if let Some(min) = filter.price_min {
        query = query.filter(service::Column::Price.gte(min));
    }
    if let Some(max) = filter.price_max {
        query = query.filter(service::Column::Price.lte(max));
    }
    if let Some(active) = filter.active {
        query = query.filter(service::Column::IsActive.eq(active));
    }
    let rows = match page {
        Some(p) => {
            let (page_idx, per_page) = p.normalize();
            query.paginate(db, per_page).fetch_page(page_idx).await
        }
        None => query.all(db).await,
    }
    .map_err(|e| ServiceError::Storage(e.to_string()))?;
    Ok(rows)
}

/// Patch a catalog service. Absent fields are left untouched.
pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    duration_minutes: Option<i32>,
    is_active: Option<bool>,
) -> Result<service::Model, ServiceError> {
    let found = service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    if name.is_none() && description.is_none() && price.is_none() && duration_minutes.is_none() && is_active.is_none() {
        return Ok(found);
    }

    let mut am: service::ActiveModel = found.into();
    if let Some(n) = name {
        if n.trim().is_empty() {
            return Err(ServiceError::bad_request("name must not be empty"));
        }
        am.name = Set(n);
    }
    if let Some(d) = description {
        am.description = Set(d);
    }
    if let Some(p) = price {
        if !p.is_finite() || p < 0.0 {
            return Err(ServiceError::bad_request("price must be a non-negative number"));
        }
        am.price = Set(p);
    }
    if let Some(m) = duration_minutes {
        if m <= 0 {
            return Err(ServiceError::bad_request("duration_minutes must be positive"));
        }
        am.duration_minutes = Set(m);
    }
    if let Some(a) = is_active {
        am.is_active = Set(a);
    }
    Ok(am.update(db).await.map_err(|e| ServiceError::Storage(e.to_string()))?)
}

/// Hard delete a catalog service; its bookings go with it. Returns
/// whether a row was removed.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = service::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
