use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use common::pagination::Pagination;
use models::booking::{self, BookingStatus};

use crate::booking::domain::{BookingFilter, BookingPatch, BookingView, NewBooking, OverlapProbe};
use crate::booking::repository::BookingStore;
use crate::errors::ServiceError;

/// SeaORM-backed store over the `booking` table.
///
/// Guarded writes serialize per service through a Postgres advisory
/// transaction lock, so the conflict re-check and the write are atomic
/// even across processes.
pub struct SeaOrmBookingStore {
    pub db: DatabaseConnection,
}

/// Fold a service UUID into the signed 64-bit key space of
/// `pg_advisory_xact_lock`.
fn advisory_key(service_id: Uuid) -> i64 {
    let bits = service_id.as_u128();
    (bits as i64) ^ ((bits >> 64) as i64)
}

async fn lock_service_slot<C: ConnectionTrait>(conn: &C, service_id: Uuid) -> Result<(), ServiceError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock($1)",
        [advisory_key(service_id).into()],
    );
    conn.execute(stmt)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
    Ok(())
}

/// Half-open overlap: `[s1,e1)` and `[s2,e2)` collide iff `s1 < e2 && s2 < e1`.
fn overlap_condition(probe: &OverlapProbe) -> Condition {
    let mut cond = Condition::all()
        .add(booking::Column::ServiceId.eq(probe.service_id))
        .add(booking::Column::Status.is_in(probe.statuses.clone()))
        .add(booking::Column::StartTime.lt(probe.end))
        .add(booking::Column::EndTime.gt(probe.start));
    if let Some(id) = probe.exclude {
        cond = cond.add(booking::Column::Id.ne(id));
    }
    cond
}

#[async_trait::async_trait]
impl BookingStore for SeaOrmBookingStore {
    async fn insert(&self, new: NewBooking, guard: &OverlapProbe) -> Result<models::booking::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        if self.db.get_database_backend() == DbBackend::Postgres {
            lock_service_slot(&txn, guard.service_id).await?;
        }
        let clash = booking::Entity::find()
            .filter(overlap_condition(guard))
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if clash.is_some() {
            let _ = txn.rollback().await;
            return Err(ServiceError::Conflict);
        }

        let am = booking::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            service_id: Set(new.service_id),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            status: Set(BookingStatus::Pending),
            created_at: Set(Utc::now().into()),
        };
        let created = am.insert(&txn).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        txn.commit().await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(created)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<models::booking::Model>, ServiceError> {
        booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn fetch_with_service(&self, id: Uuid) -> Result<Option<BookingView>, ServiceError> {
        let row = booking::Entity::find_by_id(id)
            .find_also_related(models::service::Entity)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(row.map(|(b, s)| BookingView { booking: b, service: s }))
    }

    async fn list(&self, filter: &BookingFilter, page: Option<Pagination>) -> Result<Vec<BookingView>, ServiceError> {
        let mut finder = booking::Entity::find().find_also_related(models::service::Entity);
        if let Some(uid) = filter.user_id { finder = finder.filter(booking::Column::UserId.eq(uid)); }
        if let Some(status) = filter.status { finder = finder.filter(booking::Column::Status.eq(status)); }
        if let Some(from) = filter.start_from { finder = finder.filter(booking::Column::StartTime.gte(from)); }
        if let Some(to) = filter.end_to { finder = finder.filter(booking::Column::EndTime.lte(to)); }
        let finder = finder.order_by_asc(booking::Column::StartTime);

        let rows = match page {
            Some(p) => {
                let (page_idx, per_page) = p.normalize();
                finder.paginate(&self.db, per_page).fetch_page(page_idx).await
            }
            None => finder.all(&self.db).await,
        }
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows.into_iter().map(|(b, s)| BookingView { booking: b, service: s }).collect())
    }

    async fn conflicts(&self, probe: &OverlapProbe) -> Result<bool, ServiceError> {
        let clash = booking::Entity::find()
            .filter(overlap_condition(probe))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(clash.is_some())
    }

    async fn apply(&self, id: Uuid, patch: &BookingPatch, guard: Option<&OverlapProbe>) -> Result<models::booking::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        if let Some(probe) = guard {
            if self.db.get_database_backend() == DbBackend::Postgres {
                lock_service_slot(&txn, probe.service_id).await?;
            }
            let clash = booking::Entity::find()
                .filter(overlap_condition(probe))
                .one(&txn)
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
            if clash.is_some() {
                let _ = txn.rollback().await;
                return Err(ServiceError::Conflict);
            }
        }

        let current = booking::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let Some(existing) = current else {
            let _ = txn.rollback().await;
            return Err(ServiceError::not_found("booking"));
        };
        if patch.is_empty() {
            let _ = txn.rollback().await;
            return Ok(existing);
        }

        let mut am: booking::ActiveModel = existing.into();
        if let Some(t) = patch.start_time { am.start_time = Set(t); }
        if let Some(t) = patch.end_time { am.end_time = Set(t); }
        if let Some(s) = patch.status { am.status = Set(s); }
        let updated = am.update(&txn).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        txn.commit().await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = booking::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }
}
