//! Service layer providing booking and catalog operations on top of models.
//! - Separates business rules from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod booking;
pub mod catalog;
pub mod identity;
#[cfg(test)]
pub mod test_support;
pub mod db;
