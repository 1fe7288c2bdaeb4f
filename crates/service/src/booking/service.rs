use std::sync::Arc;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;
use models::booking::BookingStatus;

use super::domain::{BookingFilter, BookingPatch, BookingView, NewBooking, OverlapProbe};
use super::lifecycle;
use super::repository::BookingStore;
use crate::catalog::ServiceCatalog;
use crate::errors::ServiceError;
use crate::identity::{Actor, UserDirectory};

/// Booking orchestrator: composes the catalog lookup, the overlap check
/// and the lifecycle rules. All booking mutation goes through here.
pub struct BookingService<S: BookingStore, C: ServiceCatalog, U: UserDirectory> {
    store: Arc<S>,
    catalog: Arc<C>,
    users: Arc<U>,
}

impl<S: BookingStore, C: ServiceCatalog, U: UserDirectory> BookingService<S, C, U> {
    pub fn new(store: Arc<S>, catalog: Arc<C>, users: Arc<U>) -> Self {
        Self { store, catalog, users }
    }

    /// Book a slot for the calling actor. The booking starts out `pending`.
    ///
    /// # Examples
    /// ```
    /// use service::booking::{BookingService, repository::mock::MockBookingStore};
    /// use service::catalog::mock::MockServiceCatalog;
    /// use service::identity::{mock::MockUserDirectory, Actor, Role};
    /// use chrono::{Duration, Utc};
    /// use std::sync::Arc;
    ///
    /// let catalog = Arc::new(MockServiceCatalog::default());
    /// let service_id = catalog.add_active("Haircut", 30);
    /// let store = Arc::new(MockBookingStore::new(catalog.clone()));
    /// let actor = Actor::new(uuid::Uuid::new_v4(), Role::User);
    /// let users = Arc::new(MockUserDirectory::with_users(&[actor.id]));
    /// let svc = BookingService::new(store, catalog, users);
    ///
    /// let start = Utc::now() + Duration::days(1);
    /// let view = tokio_test::block_on(svc.create(
    ///     actor,
    ///     service_id,
    ///     start.into(),
    ///     (start + Duration::minutes(30)).into(),
    /// ))
    /// .unwrap();
    /// assert_eq!(view.booking.user_id, actor.id);
    /// ```
    #[instrument(skip(self), fields(actor_id = %actor.id, service_id = %service_id))]
    pub async fn create(
        &self,
        actor: Actor,
        service_id: Uuid,
        start_time: DateTimeWithTimeZone,
        end_time: DateTimeWithTimeZone,
    ) -> Result<BookingView, ServiceError> {
        if self.catalog.active_service(service_id).await?.is_none() {
            debug!("service missing or inactive");
            return Err(ServiceError::not_found("service"));
        }
        if !self.users.user_exists(actor.id).await? {
            return Err(ServiceError::not_found("user"));
        }
        if end_time <= start_time {
            return Err(ServiceError::InvalidInterval);
        }

        let probe = OverlapProbe::active(service_id, start_time, end_time);
        if self.store.conflicts(&probe).await? {
            return Err(ServiceError::Conflict);
        }

        let created = self
            .store
            .insert(NewBooking { user_id: actor.id, service_id, start_time, end_time }, &probe)
            .await?;
        info!(booking_id = %created.id, "booking_created");

        self.store
            .fetch_with_service(created.id)
            .await?
            .ok_or_else(|| ServiceError::Storage("booking missing after insert".into()))
    }

    /// Fetch one booking; owners and admins only.
    pub async fn get(&self, actor: Actor, booking_id: Uuid) -> Result<BookingView, ServiceError> {
        let view = self
            .store
            .fetch_with_service(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if view.booking.user_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::Forbidden);
        }
        Ok(view)
    }

    /// The actor's own bookings; the owner filter is forced.
    pub async fn list_mine(
        &self,
        actor: Actor,
        mut filter: BookingFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<BookingView>, ServiceError> {
        filter.user_id = Some(actor.id);
        self.store.list(&filter, page).await
    }

    /// Every booking in the system; admin only.
    pub async fn list_all(
        &self,
        actor: Actor,
        filter: BookingFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<BookingView>, ServiceError> {
        if !actor.is_admin() {
            return Err(ServiceError::Forbidden);
        }
        self.store.list(&filter, page).await
    }

    /// Patch a booking under the role-specific lifecycle rules. All
    /// validated fields land in one write, or none do.
    #[instrument(skip(self, patch), fields(actor_id = %actor.id, booking_id = %booking_id))]
    pub async fn update(
        &self,
        actor: Actor,
        booking_id: Uuid,
        patch: BookingPatch,
    ) -> Result<BookingView, ServiceError> {
        let current = self
            .store
            .fetch(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;

        if !actor.is_admin() && current.user_id != actor.id {
            return Err(ServiceError::Forbidden);
        }

        let applied = if actor.is_admin() {
            self.admin_patch(&current, patch).await?
        } else {
            self.user_patch(&current, patch).await?
        };
        info!(status = ?applied.status, "booking_updated");

        self.store
            .fetch_with_service(applied.id)
            .await?
            .ok_or_else(|| ServiceError::Storage("booking missing after update".into()))
    }

    /// Remove a booking. Users may only remove their own, and only
    /// before it has started; admins are unrestricted.
    #[instrument(skip(self), fields(actor_id = %actor.id, booking_id = %booking_id))]
    pub async fn delete(&self, actor: Actor, booking_id: Uuid) -> Result<(), ServiceError> {
        let current = self
            .store
            .fetch(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;

        if !actor.is_admin() {
            if current.user_id != actor.id {
                return Err(ServiceError::Forbidden);
            }
            if current.start_time <= Utc::now() {
                return Err(ServiceError::invalid_state("cannot delete a booking that has started"));
            }
        }

        let removed = self.store.delete(booking_id).await?;
        if !removed {
            return Err(ServiceError::not_found("booking"));
        }
        info!("booking_deleted");
        Ok(())
    }

    /// Owner rules: live bookings only, reschedules are conflict-checked
    /// with the booking itself excluded, and the only status a user may
    /// request is `cancelled`.
    async fn user_patch(
        &self,
        current: &models::booking::Model,
        patch: BookingPatch,
    ) -> Result<models::booking::Model, ServiceError> {
        if lifecycle::is_terminal(current.status) {
            return Err(ServiceError::invalid_state("cannot modify a completed or cancelled booking"));
        }

        let mut validated = BookingPatch::default();
        let mut guard = None;

        if patch.start_time.is_some() || patch.end_time.is_some() {
            let (Some(start), Some(end)) = (patch.start_time, patch.end_time) else {
                return Err(ServiceError::bad_request("start_time and end_time must be provided together"));
            };
            if end <= start {
                return Err(ServiceError::InvalidInterval);
            }
            let probe = OverlapProbe::active(current.service_id, start, end).excluding(current.id);
            if self.store.conflicts(&probe).await? {
                return Err(ServiceError::Conflict);
            }
            validated.start_time = Some(start);
            validated.end_time = Some(end);
            guard = Some(probe);
        }

        if let Some(requested) = patch.status {
            if requested != BookingStatus::Cancelled {
                return Err(ServiceError::bad_request("users can only change status to cancelled"));
            }
            validated.status = Some(BookingStatus::Cancelled);
        }

        if validated.is_empty() {
            return Ok(current.clone());
        }
        self.store.apply(current.id, &validated, guard.as_ref()).await
    }

    /// Admin rules: any status lands unconditionally, reschedules skip
    /// the conflict check, and a one-sided time is ignored.
    async fn admin_patch(
        &self,
        current: &models::booking::Model,
        patch: BookingPatch,
    ) -> Result<models::booking::Model, ServiceError> {
        let mut validated = BookingPatch::default();

        if let Some(to) = patch.status {
            if !lifecycle::can_transition(current.status, to) {
                debug!(from = ?current.status, to = ?to, "admin_status_override");
            }
            validated.status = Some(to);
        }

        if let (Some(start), Some(end)) = (patch.start_time, patch.end_time) {
            if end <= start {
                return Err(ServiceError::InvalidInterval);
            }
            validated.start_time = Some(start);
            validated.end_time = Some(end);
        }

        if validated.is_empty() {
            return Ok(current.clone());
        }
        self.store.apply(current.id, &validated, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::repository::mock::MockBookingStore;
    use crate::catalog::mock::MockServiceCatalog;
    use crate::identity::{mock::MockUserDirectory, Role};
    use chrono::{Duration, TimeZone};

    struct Fixture {
        svc: BookingService<MockBookingStore, MockServiceCatalog, MockUserDirectory>,
        catalog: Arc<MockServiceCatalog>,
        service_id: Uuid,
        owner: Actor,
        admin: Actor,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(MockServiceCatalog::default());
        let service_id = catalog.add_active("Haircut", 60);
        let store = Arc::new(MockBookingStore::new(catalog.clone()));
        let owner = Actor::new(Uuid::new_v4(), Role::User);
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let users = Arc::new(MockUserDirectory::with_users(&[owner.id, admin.id]));
        let svc = BookingService::new(store, catalog.clone(), users);
        Fixture { svc, catalog, service_id, owner, admin }
    }

    // Fixed date so repeated calls compare equal.
    fn future(hours: i64) -> DateTimeWithTimeZone {
        (Utc.with_ymd_and_hms(2031, 1, 5, 9, 0, 0).unwrap() + Duration::hours(hours)).into()
    }

    fn past(hours: i64) -> DateTimeWithTimeZone {
        (Utc::now() - Duration::hours(hours)).into()
    }

    #[tokio::test]
    async fn create_starts_pending_with_service_attached() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        assert_eq!(view.booking.status, BookingStatus::Pending);
        assert_eq!(view.booking.user_id, fx.owner.id);
        assert_eq!(view.service.as_ref().map(|s| s.id), Some(fx.service_id));
    }

    #[tokio::test]
    async fn create_rejects_unknown_or_inactive_service() {
        let fx = fixture();
        let err = fx.svc.create(fx.owner, Uuid::new_v4(), future(0), future(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        fx.catalog.deactivate(fx.service_id);
        let err = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_user() {
        let fx = fixture();
        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        let err = fx.svc.create(stranger, fx.service_id, future(0), future(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_reversed_or_empty_interval() {
        let fx = fixture();
        let err = fx.svc.create(fx.owner, fx.service_id, future(1), future(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval));

        let t = future(0);
        let err = fx.svc.create(fx.owner, fx.service_id, t, t).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval));
    }

    #[tokio::test]
    async fn create_rejects_overlap_but_allows_adjacency() {
        let fx = fixture();
        fx.svc.create(fx.owner, fx.service_id, future(0), future(2)).await.unwrap();

        // Overlaps the middle of the existing slot
        let err = fx.svc.create(fx.admin, fx.service_id, future(1), future(3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));

        // Starts exactly where the other ends
        fx.svc.create(fx.admin, fx.service_id, future(2), future(3)).await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_block_the_slot() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let patch = BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() };
        fx.svc.update(fx.owner, view.booking.id, patch).await.unwrap();

        fx.svc.create(fx.admin, fx.service_id, future(0), future(1)).await.unwrap();
    }

    #[tokio::test]
    async fn overlap_on_other_service_is_fine() {
        let fx = fixture();
        let other = fx.catalog.add_active("Massage", 60);
        fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        fx.svc.create(fx.admin, other, future(0), future(1)).await.unwrap();
    }

    #[tokio::test]
    async fn get_enforces_ownership() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let id = view.booking.id;

        assert!(fx.svc.get(fx.owner, id).await.is_ok());
        assert!(fx.svc.get(fx.admin, id).await.is_ok());

        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        let err = fx.svc.get(stranger, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = fx.svc.get(fx.owner, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_mine_returns_only_own_bookings() {
        let fx = fixture();
        fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        fx.svc.create(fx.admin, fx.service_id, future(1), future(2)).await.unwrap();

        let mine = fx.svc.list_mine(fx.owner, BookingFilter::default(), None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].booking.user_id, fx.owner.id);
    }

    #[tokio::test]
    async fn list_all_is_admin_only_and_filters() {
        let fx = fixture();
        let a = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        fx.svc.create(fx.admin, fx.service_id, future(2), future(3)).await.unwrap();

        let err = fx.svc.list_all(fx.owner, BookingFilter::default(), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let all = fx.svc.list_all(fx.admin, BookingFilter::default(), None).await.unwrap();
        assert_eq!(all.len(), 2);

        // Confirm one, then filter by status
        let patch = BookingPatch { status: Some(BookingStatus::Confirmed), ..Default::default() };
        fx.svc.update(fx.admin, a.booking.id, patch).await.unwrap();
        let confirmed = fx.svc
            .list_all(fx.admin, BookingFilter { status: Some(BookingStatus::Confirmed), ..Default::default() }, None)
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].booking.id, a.booking.id);

        // Time-window filters
        let windowed = fx.svc
            .list_all(
                fx.admin,
                BookingFilter { start_from: Some(future(2)), end_to: Some(future(3)), ..Default::default() },
                None,
            )
            .await
            .unwrap();
        assert_eq!(windowed.len(), 1);
    }

    #[tokio::test]
    async fn list_all_paginates_in_start_order() {
        let fx = fixture();
        for i in 0..5 {
            fx.svc.create(fx.owner, fx.service_id, future(i), future(i + 1)).await.unwrap();
        }
        let page = fx.svc
            .list_all(fx.admin, BookingFilter::default(), Some(Pagination { page: 2, per_page: 2 }))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].booking.start_time < page[1].booking.start_time);
        assert_eq!(page[0].booking.start_time, future(2));
    }

    #[tokio::test]
    async fn user_can_cancel_but_not_confirm() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let id = view.booking.id;

        let err = fx.svc
            .update(fx.owner, id, BookingPatch { status: Some(BookingStatus::Confirmed), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let updated = fx.svc
            .update(fx.owner, id, BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn user_cannot_touch_terminal_bookings() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let id = view.booking.id;
        fx.svc
            .update(fx.admin, id, BookingPatch { status: Some(BookingStatus::Completed), ..Default::default() })
            .await
            .unwrap();

        // Even an empty patch is rejected once the booking is terminal
        let err = fx.svc.update(fx.owner, id, BookingPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = fx.svc
            .update(fx.owner, id, BookingPatch { start_time: Some(future(4)), end_time: Some(future(5)), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn update_is_owner_or_admin_only() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();

        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        let err = fx.svc
            .update(stranger, view.booking.id, BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = fx.svc.update(fx.owner, Uuid::new_v4(), BookingPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_reschedule_needs_both_ends() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let id = view.booking.id;

        let err = fx.svc
            .update(fx.owner, id, BookingPatch { start_time: Some(future(2)), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = fx.svc
            .update(fx.owner, id, BookingPatch { end_time: Some(future(2)), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = fx.svc
            .update(fx.owner, id, BookingPatch { start_time: Some(future(3)), end_time: Some(future(2)), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval));

        let moved = fx.svc
            .update(fx.owner, id, BookingPatch { start_time: Some(future(2)), end_time: Some(future(3)), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(moved.booking.start_time, future(2));
        // A reschedule alone never touches the status
        assert_eq!(moved.booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn user_reschedule_is_conflict_checked_excluding_self() {
        let fx = fixture();
        let first = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        fx.svc.create(fx.admin, fx.service_id, future(2), future(3)).await.unwrap();

        // Onto the other booking: conflict
        let err = fx.svc
            .update(
                fx.owner,
                first.booking.id,
                BookingPatch { start_time: Some(future(2)), end_time: Some(future(3)), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));

        // Sliding within its own old window only collides with itself
        let moved = fx.svc
            .update(
                fx.owner,
                first.booking.id,
                BookingPatch { start_time: Some(future(1)), end_time: Some(future(2)), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(moved.booking.end_time, future(2));
    }

    #[tokio::test]
    async fn user_reschedule_and_cancel_land_together() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();

        let updated = fx.svc
            .update(
                fx.owner,
                view.booking.id,
                BookingPatch {
                    start_time: Some(future(4)),
                    end_time: Some(future(5)),
                    status: Some(BookingStatus::Cancelled),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.booking.start_time, future(4));
        assert_eq!(updated.booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op_on_live_bookings() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let updated = fx.svc.update(fx.owner, view.booking.id, BookingPatch::default()).await.unwrap();
        assert_eq!(updated.booking.status, BookingStatus::Pending);
        assert_eq!(updated.booking.start_time, view.booking.start_time);
    }

    #[tokio::test]
    async fn admin_status_override_skips_the_transition_gate() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let id = view.booking.id;

        // pending -> completed is not a declared transition
        let updated = fx.svc
            .update(fx.admin, id, BookingPatch { status: Some(BookingStatus::Completed), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.booking.status, BookingStatus::Completed);

        // and admins may even resurrect a terminal booking
        let updated = fx.svc
            .update(fx.admin, id, BookingPatch { status: Some(BookingStatus::Pending), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn admin_reschedule_skips_conflicts_but_not_interval_order() {
        let fx = fixture();
        fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        let second = fx.svc.create(fx.admin, fx.service_id, future(2), future(3)).await.unwrap();

        // Admin may move onto an occupied slot
        let moved = fx.svc
            .update(
                fx.admin,
                second.booking.id,
                BookingPatch { start_time: Some(future(0)), end_time: Some(future(1)), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(moved.booking.start_time, future(0));

        let err = fx.svc
            .update(
                fx.admin,
                second.booking.id,
                BookingPatch { start_time: Some(future(5)), end_time: Some(future(4)), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval));
    }

    #[tokio::test]
    async fn admin_one_sided_time_is_ignored_but_status_lands() {
        let fx = fixture();
        let view = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();

        let updated = fx.svc
            .update(
                fx.admin,
                view.booking.id,
                BookingPatch { start_time: Some(future(9)), status: Some(BookingStatus::Confirmed), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.booking.start_time, view.booking.start_time);
        assert_eq!(updated.booking.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn delete_rules_differ_by_role() {
        let fx = fixture();

        // Owner deletes an upcoming booking
        let upcoming = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        fx.svc.delete(fx.owner, upcoming.booking.id).await.unwrap();
        let err = fx.svc.get(fx.owner, upcoming.booking.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // A started booking is locked for its owner but not for admins
        let started = fx.svc.create(fx.owner, fx.service_id, past(2), past(1)).await.unwrap();
        let err = fx.svc.delete(fx.owner, started.booking.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        fx.svc.delete(fx.admin, started.booking.id).await.unwrap();

        // Strangers cannot delete someone else's booking
        let other = fx.svc.create(fx.owner, fx.service_id, future(2), future(3)).await.unwrap();
        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        let err = fx.svc.delete(stranger, other.booking.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = fx.svc.delete(fx.admin, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    /// End-to-end walk: book, fail a conflicting book, admin confirms,
    /// and a reversed-interval reschedule bounces.
    #[tokio::test]
    async fn booking_lifecycle_walkthrough() {
        let fx = fixture();

        let booked = fx.svc.create(fx.owner, fx.service_id, future(0), future(1)).await.unwrap();
        assert_eq!(booked.booking.status, BookingStatus::Pending);

        let err = fx.svc.create(fx.admin, fx.service_id, future(0), future(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));

        let confirmed = fx.svc
            .update(fx.admin, booked.booking.id, BookingPatch { status: Some(BookingStatus::Confirmed), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(confirmed.booking.status, BookingStatus::Confirmed);

        let err = fx.svc
            .update(
                fx.owner,
                booked.booking.id,
                BookingPatch { start_time: Some(future(3)), end_time: Some(future(2)), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval));

        // The booking is untouched by the failed reschedule
        let after = fx.svc.get(fx.owner, booked.booking.id).await.unwrap();
        assert_eq!(after.booking.start_time, future(0));
        assert_eq!(after.booking.status, BookingStatus::Confirmed);
    }
}
