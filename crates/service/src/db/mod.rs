//! Table-oriented CRUD services without cross-entity orchestration.

pub mod catalog_service;
