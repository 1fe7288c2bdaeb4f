use chrono::{DateTime, FixedOffset};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct CreateBookingInputDoc {
    pub service_id: Uuid,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateBookingInputDoc {
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    /// One of pending, confirmed, cancelled, completed
    pub status: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct CreateServiceInputDoc {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: i32,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateServiceInputDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::bookings::create,
        crate::routes::bookings::list_mine,
        crate::routes::bookings::list_all,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::delete,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::update,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreateBookingInputDoc,
            UpdateBookingInputDoc,
            CreateServiceInputDoc,
            UpdateServiceInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "bookings"),
        (name = "services")
    )
)]
pub struct ApiDoc;
