use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    /// Authentication is a hard gate: the response carries the resource to
    /// redirect to when one applies.
    #[error("Authentication required")]
    Unauthorized { redirect: Option<&'static str> },

    /// One message for both unknown email and wrong password, so responses
    /// cannot be used to enumerate accounts.
    #[error("Incorrect credentials")]
    Credentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Unauthenticated => AppError::Unauthorized {
                redirect: Some("/auth/login"),
            },
            DomainError::AdminRequired => AppError::Unauthorized { redirect: None },
            DomainError::Credentials => AppError::Credentials,
            DomainError::InvalidInput(msg) => AppError::Validation(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Storage(msg) | DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(json!({
                "error": self.to_string()
            })),
            AppError::Unauthorized { redirect } => {
                let mut body = json!({ "error": self.to_string() });
                if let Some(redirect) = redirect {
                    body["redirect"] = json!(redirect);
                }
                HttpResponse::Unauthorized().json(body)
            }
            AppError::Credentials => HttpResponse::Unauthorized().json(json!({
                "error": self.to_string()
            })),
            AppError::Validation(_) => HttpResponse::BadRequest().json(json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn not_found_returns_404() {
        assert_eq!(AppError::NotFound.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_returns_401() {
        let err = AppError::Unauthorized {
            redirect: Some("/auth/login"),
        };
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn credentials_error_returns_401_with_a_generic_message() {
        let err = AppError::Credentials;
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Incorrect credentials");
    }

    #[test]
    fn validation_returns_400() {
        let err = AppError::Validation("quantity must be at least 1".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_returns_409() {
        let err = AppError::Conflict("an account with this email already exists".to_string());
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500_without_leaking_the_message() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_unauthenticated_maps_to_the_login_redirect() {
        let err: AppError = DomainError::Unauthenticated.into();
        assert!(matches!(
            err,
            AppError::Unauthorized {
                redirect: Some("/auth/login")
            }
        ));
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let err: AppError = DomainError::NotFound.into();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn domain_storage_maps_to_internal() {
        let err: AppError = DomainError::Storage("disk full".to_string()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
