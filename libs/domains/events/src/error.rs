use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use validator::ValidationErrors;

/// MongoDB server code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    #[error("Event not found")]
    EventNotFound,

    /// Carries the lookup-specific message shown to the client
    #[error("{0}")]
    RegistrationNotFound(String),

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Event is full")]
    EventFull,

    #[error("Database error: {0}")]
    Database(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::EventNotFound => AppError::NotFound(err.to_string()),
            EventError::RegistrationNotFound(msg) => AppError::NotFound(msg),
            EventError::AlreadyRegistered => AppError::Conflict(err.to_string()),
            EventError::EventFull => AppError::CapacityExceeded(err.to_string()),
            EventError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            // registrations.(name, eventTitle) is the only unique index
            return EventError::AlreadyRegistered;
        }
        EventError::Database(err.to_string())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Picks one message out of the validator output.
///
/// Missing required fields win over other failures, then fields are taken in name order.
impl From<ValidationErrors> for EventError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let all = || fields.iter().flat_map(|(_, errs)| errs.iter());
        let message = all()
            .find(|e| e.code == "required")
            .or_else(|| all().next())
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());

        EventError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateEvent;
    use axum::http::StatusCode;
    use validator::Validate;

    #[test]
    fn test_missing_title_reported_before_bad_capacity() {
        let update = UpdateEvent {
            capacity: Some(-5),
            ..Default::default()
        };
        let err: EventError = update.validate().unwrap_err().into();

        assert_eq!(err.to_string(), "Please provide an event title");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EventError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (EventError::EventNotFound, StatusCode::NOT_FOUND),
            (
                EventError::RegistrationNotFound("Registration not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (EventError::AlreadyRegistered, StatusCode::CONFLICT),
            (EventError::EventFull, StatusCode::BAD_REQUEST),
            (
                EventError::Database("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
