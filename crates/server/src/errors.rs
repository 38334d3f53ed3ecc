use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use tracing::{error, warn};

/// Text sent for every failure whose cause stays in the server log.
pub const SERVER_ERROR: &str = "Server error";

/// JSON error reply: `{"message": ...}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(err = %cause, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UnknownEmail | AuthError::InvalidCredentials => {
                Self::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AuthError::MissingToken => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            AuthError::TokenRejected(ref reason) => {
                warn!(reason = %reason, "bearer token rejected");
                Self::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, e.to_string()),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                Self::internal(e)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(_) | ServiceError::Model(_) => Self::internal(e),
        }
    }
}

/// Malformed query strings answer 400 with the extractor's explanation.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(reason = %rejection.body_text(), "query string rejected");
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_status() {
        assert_eq!(ApiError::from(AuthError::UnknownEmail).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::MissingToken).status, StatusCode::UNAUTHORIZED);
        let rejected = ApiError::from(AuthError::TokenRejected("ExpiredSignature".into()));
        assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
        assert_eq!(rejected.message, "Not authorized, token failed");
    }

    #[test]
    fn internal_causes_are_not_echoed() {
        let e = ApiError::from(AuthError::Repository("connection refused".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, SERVER_ERROR);
        let e = ApiError::from(ServiceError::Db("socket closed".into()));
        assert_eq!(e.message, SERVER_ERROR);
    }

    #[test]
    fn service_errors_keep_their_text() {
        let e = ApiError::from(ServiceError::not_found("Customer", "abc"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "Customer with id abc not found");
        let e = ApiError::from(ServiceError::Validation("Invalid filter".into()));
        assert_eq!((e.status, e.message.as_str()), (StatusCode::BAD_REQUEST, "Invalid filter"));
    }
}
