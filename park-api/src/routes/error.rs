use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::{BookingError, CatalogError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidDate,
    ParkClosed,
    TermsNotAccepted,
    InvalidVisitor,
    ActivityNotFound,
    TimeSlotNotFound,
    ScheduleUnavailable,
    CapacityExhausted,
    SizeRequired,
    DuplicateBooking,
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_code(ErrorCode::Internal)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::InvalidInput | ErrorKind::PreconditionFailed => Self::bad_request(message),
            ErrorKind::Unavailable => Self::not_found(message),
            ErrorKind::Conflict => Self::conflict(message),
            ErrorKind::Internal => Self::internal(message),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let code = match &err {
            BookingError::InvalidDate(_) => ErrorCode::InvalidDate,
            BookingError::ParkClosed { .. } => ErrorCode::ParkClosed,
            BookingError::TermsNotAccepted => ErrorCode::TermsNotAccepted,
            BookingError::InvalidVisitor(_) => ErrorCode::InvalidVisitor,
            BookingError::ActivityNotFound(_) => ErrorCode::ActivityNotFound,
            BookingError::TimeSlotNotFound(_) => ErrorCode::TimeSlotNotFound,
            BookingError::ScheduleUnavailable { .. } => ErrorCode::ScheduleUnavailable,
            BookingError::CapacityExhausted { .. } => ErrorCode::CapacityExhausted,
            BookingError::SizeRequired(_) => ErrorCode::SizeRequired,
            BookingError::DuplicateBooking(_) => ErrorCode::DuplicateBooking,
            BookingError::Internal(_) => ErrorCode::Internal,
        };

        let api_error = match err {
            // Park closure is reported as a bad request rather than a missing resource.
            BookingError::ParkClosed { .. } => Self::bad_request(err.to_string()),
            BookingError::Internal(message) => {
                tracing::error!("Booking failed: {}", message);
                Self::internal("booking could not be completed")
            }
            _ => Self::from_kind(err.kind(), err.to_string()),
        };
        api_error.with_code(code)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ActivityNotFound(_) => Self::from_kind(err.kind(), err.to_string())
                .with_code(ErrorCode::ActivityNotFound),
            CatalogError::Store(message) => {
                tracing::error!("Catalog read failed: {}", message);
                Self::internal("catalog unavailable")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text()).with_code(ErrorCode::InvalidRequest)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text()).with_code(ErrorCode::InvalidRequest)
    }
}
