use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Read-side view of the catalog used by the booking engine. Only
/// active services are visible here; existing bookings keep their
/// service regardless of later deactivation.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn active_service(&self, id: Uuid) -> Result<Option<models::service::Model>, ServiceError>;
}

/// Simple in-memory mock catalog for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockServiceCatalog {
        services: Mutex<HashMap<Uuid, models::service::Model>>,
    }

    impl MockServiceCatalog {
        /// Register an active service and return its id.
        pub fn add_active(&self, name: &str, duration_minutes: i32) -> Uuid {
            let id = Uuid::new_v4();
            let svc = models::service::Model {
                id,
                name: name.to_string(),
                description: String::new(),
                price: 50.0,
                duration_minutes,
                is_active: true,
                created_at: Utc::now().into(),
            };
            self.services.lock().unwrap().insert(id, svc);
            id
        }

        pub fn deactivate(&self, id: Uuid) {
            if let Some(svc) = self.services.lock().unwrap().get_mut(&id) {
                svc.is_active = false;
            }
        }

        /// Fetch regardless of the active flag, for attaching to views.
        pub fn get(&self, id: Uuid) -> Option<models::service::Model> {
            self.services.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl ServiceCatalog for MockServiceCatalog {
        async fn active_service(&self, id: Uuid) -> Result<Option<models::service::Model>, ServiceError> {
            let services = self.services.lock().unwrap();
            Ok(services.get(&id).filter(|s| s.is_active).cloned())
        }
    }
}

/// SeaORM-backed catalog over the `service` table.
pub struct SeaOrmServiceCatalog {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ServiceCatalog for SeaOrmServiceCatalog {
    async fn active_service(&self, id: Uuid) -> Result<Option<models::service::Model>, ServiceError> {
        let found = models::service::Entity::find_by_id(id)
            .filter(models::service::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(found)
    }
}
