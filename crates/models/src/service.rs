use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// A bookable offering in the catalog. Inactive rows stay visible to
/// admins but cannot receive new bookings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Booking => Entity::has_many(crate::booking::Entity).into() }
    }
}

impl Related<crate::booking::Entity> for Entity {
    fn to() -> RelationDef { Relation::Booking.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    price: f64,
    duration_minutes: i32,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if !price.is_finite() || price < 0.0 { return Err(errors::ModelError::Validation("price must be >= 0".into())); }
    if duration_minutes <= 0 { return Err(errors::ModelError::Validation("duration_minutes must be positive".into())); }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        description: Set(description.to_string()),
        price: Set(price),
        duration_minutes: Set(duration_minutes),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
