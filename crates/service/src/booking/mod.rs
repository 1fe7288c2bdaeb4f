//! Booking lifecycle and slot-conflict engine.
//!
//! `BookingService` drives creation, reads, role-gated updates and
//! deletion over a [`repository::BookingStore`]. Slots are half-open
//! `[start, end)` intervals per service; `pending` and `confirmed`
//! bookings block a slot, terminal ones free it.

pub mod domain;
pub mod lifecycle;
pub mod repo;
pub mod repository;
pub mod service;

pub use domain::{BookingFilter, BookingPatch, BookingView, NewBooking, OverlapProbe};
pub use repo::seaorm::SeaOrmBookingStore;
pub use repository::BookingStore;
pub use service::BookingService;
