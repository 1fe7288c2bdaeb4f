use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::booking::BookingStatus;

use super::lifecycle;

/// Input for creating a booking. The owner is always the calling actor.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
}

/// Sparse update: only the present fields are touched.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub start_time: Option<DateTimeWithTimeZone>,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none() && self.status.is_none()
    }
}

/// Listing filters, AND-combined when present.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub start_from: Option<DateTimeWithTimeZone>,
    pub end_to: Option<DateTimeWithTimeZone>,
}

/// A booking with its service eagerly attached, the shape every read
/// operation returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: models::booking::Model,
    pub service: Option<models::service::Model>,
}

/// Probe for the overlap predicate over the half-open slot `[start, end)`.
#[derive(Debug, Clone)]
pub struct OverlapProbe {
    pub service_id: Uuid,
    pub start: DateTimeWithTimeZone,
    pub end: DateTimeWithTimeZone,
    /// Booking to leave out of the scan, set when rescheduling it.
    pub exclude: Option<Uuid>,
    pub statuses: Vec<BookingStatus>,
}

impl OverlapProbe {
    /// Probe against the slot-blocking statuses (pending, confirmed).
    pub fn active(service_id: Uuid, start: DateTimeWithTimeZone, end: DateTimeWithTimeZone) -> Self {
        Self { service_id, start, end, exclude: None, statuses: lifecycle::BLOCKING.to_vec() }
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude = Some(id);
        self
    }
}
