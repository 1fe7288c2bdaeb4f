//! Booking state machine.
//!
//! `pending -> {confirmed, cancelled}`, `confirmed -> {cancelled, completed}`;
//! `cancelled` and `completed` are terminal. Admin status writes may step
//! outside the declared transitions; the orchestrator logs those instead of
//! rejecting them.

use models::booking::BookingStatus;

/// Statuses that occupy a time slot for conflict purposes.
pub const BLOCKING: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

/// Whether a booking in `status` admits no further change.
pub fn is_terminal(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Cancelled | BookingStatus::Completed)
}

/// Whether `from -> to` is a declared transition.
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
    )
}
