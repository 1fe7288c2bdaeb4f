pub mod booking;
pub mod db;
pub mod errors;
pub mod service;
pub mod user;
