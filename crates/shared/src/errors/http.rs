use crate::errors::{
    error::ErrorResponse, repository::RepositoryError, service::ServiceError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid credentials".to_string())
            }

            ServiceError::NotVerified => {
                HttpError::Forbidden("Account not verified".to_string())
            }

            ServiceError::DuplicateEmail => {
                HttpError::Conflict("Email already registered".to_string())
            }

            ServiceError::InvalidVerification => {
                HttpError::BadRequest("Invalid verification token".to_string())
            }

            ServiceError::VerificationExpired => {
                HttpError::BadRequest("Verification token has expired".to_string())
            }

            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {errors:?}"))
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                // Sqlx and Custom carry driver detail that stays in the logs.
                _ => HttpError::Internal("Repository error".into()),
            },

            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::Jwt(_) | ServiceError::TokenMalformed => {
                HttpError::Unauthorized("Invalid token".into())
            }

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::Bcrypt(_) => {
                HttpError::Internal("Internal authentication error".into())
            }

            ServiceError::Storage(_) => {
                HttpError::ServiceUnavailable("Storage upstream unavailable".into())
            }

            ServiceError::Mail(_) => {
                HttpError::ServiceUnavailable("Mail upstream unavailable".into())
            }

            // Never echo internal causes back to the client.
            ServiceError::Internal(_) | ServiceError::Custom(_) => {
                HttpError::Internal("Internal server error".into())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;

    fn status_of(err: ServiceError) -> StatusCode {
        HttpError::from(err).into_response().status()
    }

    #[test]
    fn credential_failures_are_unauthorized() {
        assert_eq!(status_of(ServiceError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::TokenMalformed), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unverified_account_is_forbidden() {
        assert_eq!(status_of(ServiceError::NotVerified), StatusCode::FORBIDDEN);
    }

    #[test]
    fn duplicate_email_is_conflict() {
        assert_eq!(status_of(ServiceError::DuplicateEmail), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_verification_tokens_are_bad_requests() {
        assert_eq!(status_of(ServiceError::InvalidVerification), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::VerificationExpired), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_rows_are_not_found() {
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upstream_failures_are_service_unavailable() {
        assert_eq!(
            status_of(ServiceError::Storage(StorageError::Request("down".into()))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ServiceError::Mail("relay refused".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn internal_detail_is_not_echoed() {
        let response = HttpError::from(ServiceError::Internal("pg password leaked".into()));
        match response {
            HttpError::Internal(msg) => assert_eq!(msg, "Internal server error"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
