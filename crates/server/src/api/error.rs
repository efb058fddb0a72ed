//! Mapping of domain errors to HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use popflix_core::{AccountError, CatalogError, StoreError, ValidationError};

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned by handlers.
///
/// `Internal` details are logged and replaced by a generic message.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m.clone(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "Request failed");
        }
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.message)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::Conflict(what) => ApiError::Conflict(what),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidPage(_) | CatalogError::InvalidQuery(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CatalogError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            CatalogError::Store(e) => e.into(),
            CatalogError::Provider(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Validation(e) => e.into(),
            AccountError::EmailTaken => ApiError::Conflict(e.to_string()),
            AccountError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            AccountError::Password(e) => ApiError::Internal(e.to_string()),
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", e.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", e.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popflix_core::ProviderError;

    #[test]
    fn test_catalog_error_mapping() {
        assert_eq!(
            ApiError::from(CatalogError::InvalidPage(0)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CatalogError::NotFound("movie 1".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CatalogError::Store(StoreError::NotFound("User 3".to_string())))
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::from(CatalogError::Provider(ProviderError::ApiError {
            status: 503,
            message: "upstream secret".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_account_error_mapping() {
        assert_eq!(
            ApiError::from(AccountError::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        let err = ApiError::from(AccountError::Validation(ValidationError::new(
            "email",
            "Invalid email",
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Invalid email");
    }
}
