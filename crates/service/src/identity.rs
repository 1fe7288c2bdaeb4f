use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::errors::ServiceError;

pub use models::user::Role;

/// Caller identity resolved once at the transport boundary. The engine
/// trusts it completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self { Self { id, role } }

    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// Existence lookups over user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock directory for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserDirectory {
        known: Mutex<HashSet<Uuid>>,
    }

    impl MockUserDirectory {
        pub fn with_users(ids: &[Uuid]) -> Self {
            Self { known: Mutex::new(ids.iter().copied().collect()) }
        }

        pub fn add(&self, id: Uuid) {
            self.known.lock().unwrap().insert(id);
        }
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn user_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.known.lock().unwrap().contains(&id))
        }
    }
}

/// SeaORM-backed directory over the `user` table.
pub struct SeaOrmUserDirectory {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserDirectory for SeaOrmUserDirectory {
    async fn user_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let found = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(found.is_some())
    }
}
