use async_trait::async_trait;
use uuid::Uuid;

use common::pagination::Pagination;

use super::domain::{BookingFilter, BookingPatch, BookingView, NewBooking, OverlapProbe};
use crate::errors::ServiceError;

/// Durable-store abstraction for bookings. Writes that could collide
/// with another slot take a probe and re-assert it atomically with the
/// write, so two racers cannot both land.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert as `pending`; fails with `Conflict` if the guard matches.
    async fn insert(&self, new: NewBooking, guard: &OverlapProbe) -> Result<models::booking::Model, ServiceError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<models::booking::Model>, ServiceError>;

    /// Fetch with the booked service attached.
    async fn fetch_with_service(&self, id: Uuid) -> Result<Option<BookingView>, ServiceError>;

    async fn list(&self, filter: &BookingFilter, page: Option<Pagination>) -> Result<Vec<BookingView>, ServiceError>;

    /// True if any stored booking overlaps the probe.
    async fn conflicts(&self, probe: &OverlapProbe) -> Result<bool, ServiceError>;

    /// Patch a row in place. With a guard, the conflict re-check and the
    /// write happen atomically.
    async fn apply(&self, id: Uuid, patch: &BookingPatch, guard: Option<&OverlapProbe>) -> Result<models::booking::Model, ServiceError>;

    /// Hard delete; true if a row went away.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use crate::catalog::mock::MockServiceCatalog;
    use chrono::Utc;
    use models::booking::BookingStatus;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mutex-backed store. Guarded writes re-check their probe under the
    /// same lock, mirroring the transactional store's atomicity.
    pub struct MockBookingStore {
        bookings: Mutex<HashMap<Uuid, models::booking::Model>>,
        catalog: Arc<MockServiceCatalog>,
    }

    impl MockBookingStore {
        pub fn new(catalog: Arc<MockServiceCatalog>) -> Self {
            Self { bookings: Mutex::new(HashMap::new()), catalog }
        }

        fn overlaps(bookings: &HashMap<Uuid, models::booking::Model>, probe: &OverlapProbe) -> bool {
            bookings.values().any(|b| {
                b.service_id == probe.service_id
                    && Some(b.id) != probe.exclude
                    && probe.statuses.contains(&b.status)
                    && b.start_time < probe.end
                    && b.end_time > probe.start
            })
        }

        fn attach(&self, b: models::booking::Model) -> BookingView {
            let service = self.catalog.get(b.service_id);
            BookingView { booking: b, service }
        }
    }

    #[async_trait]
    impl BookingStore for MockBookingStore {
        async fn insert(&self, new: NewBooking, guard: &OverlapProbe) -> Result<models::booking::Model, ServiceError> {
            let mut bookings = self.bookings.lock().unwrap();
            if Self::overlaps(&bookings, guard) {
                return Err(ServiceError::Conflict);
            }
            let model = models::booking::Model {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                service_id: new.service_id,
                start_time: new.start_time,
                end_time: new.end_time,
                status: BookingStatus::Pending,
                created_at: Utc::now().into(),
            };
            bookings.insert(model.id, model.clone());
            Ok(model)
        }

        async fn fetch(&self, id: Uuid) -> Result<Option<models::booking::Model>, ServiceError> {
            Ok(self.bookings.lock().unwrap().get(&id).cloned())
        }

        async fn fetch_with_service(&self, id: Uuid) -> Result<Option<BookingView>, ServiceError> {
            let found = self.bookings.lock().unwrap().get(&id).cloned();
            Ok(found.map(|b| self.attach(b)))
        }

        async fn list(&self, filter: &BookingFilter, page: Option<Pagination>) -> Result<Vec<BookingView>, ServiceError> {
            let mut rows: Vec<_> = {
                let bookings = self.bookings.lock().unwrap();
                bookings
                    .values()
                    .filter(|b| filter.user_id.map_or(true, |u| b.user_id == u))
                    .filter(|b| filter.status.map_or(true, |s| b.status == s))
                    .filter(|b| filter.start_from.map_or(true, |t| b.start_time >= t))
                    .filter(|b| filter.end_to.map_or(true, |t| b.end_time <= t))
                    .cloned()
                    .collect()
            };
            rows.sort_by_key(|b| b.start_time);
            if let Some(p) = page {
                let (page_idx, per_page) = p.normalize();
                rows = rows
                    .into_iter()
                    .skip((page_idx * per_page) as usize)
                    .take(per_page as usize)
                    .collect();
            }
            Ok(rows.into_iter().map(|b| self.attach(b)).collect())
        }

        async fn conflicts(&self, probe: &OverlapProbe) -> Result<bool, ServiceError> {
            Ok(Self::overlaps(&self.bookings.lock().unwrap(), probe))
        }

        async fn apply(&self, id: Uuid, patch: &BookingPatch, guard: Option<&OverlapProbe>) -> Result<models::booking::Model, ServiceError> {
            let mut bookings = self.bookings.lock().unwrap();
            if let Some(probe) = guard {
                if Self::overlaps(&bookings, probe) {
                    return Err(ServiceError::Conflict);
                }
            }
            let Some(existing) = bookings.get_mut(&id) else {
                return Err(ServiceError::not_found("booking"));
            };
            if let Some(t) = patch.start_time { existing.start_time = t; }
            if let Some(t) = patch.end_time { existing.end_time = t; }
            if let Some(s) = patch.status { existing.status = s; }
            Ok(existing.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.bookings.lock().unwrap().remove(&id).is_some())
        }
    }
}
