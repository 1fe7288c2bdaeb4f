use thiserror::Error;

/// Business errors for booking and catalog workflows. Domain failures
/// stay distinct from storage failures so the transport layer can map
/// them to 4xx vs 5xx.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("end time must be after start time")]
    InvalidInterval,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not authorized")]
    Forbidden,
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("service already booked for this time slot")]
    Conflict,
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(subject: &str) -> Self { Self::NotFound(subject.to_string()) }

    pub fn bad_request(msg: &str) -> Self { Self::BadRequest(msg.to_string()) }

    pub fn invalid_state(msg: &str) -> Self { Self::InvalidState(msg.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 2001,
            ServiceError::InvalidInterval => 2002,
            ServiceError::BadRequest(_) => 2003,
            ServiceError::Forbidden => 2004,
            ServiceError::InvalidState(_) => 2005,
            ServiceError::Conflict => 2006,
            ServiceError::Storage(_) => 2100,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::BadRequest(msg),
            models::errors::ModelError::Db(msg) => ServiceError::Storage(msg),
        }
    }
}
