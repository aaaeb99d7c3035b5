use actix_web::HttpResponse;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Scheduling conflict")]
    Conflict(Vec<Uuid>),

    #[error("Not allowed")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Conflict { colliding } => AppError::Conflict(colliding),
            DomainError::Authorization => AppError::Forbidden,
            DomainError::InvalidState(msg) => AppError::Unprocessable(msg),
            DomainError::EmptyCart => AppError::Unprocessable("cart is empty".to_string()),
            DomainError::NotFound => AppError::NotFound,
            DomainError::Store(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(_) | AppError::Unprocessable(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::Conflict(colliding) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string(),
                "colliding": colliding
            })),
            AppError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn validation_returns_422() {
        let resp = AppError::Validation("bad range".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_returns_409() {
        let resp = AppError::Conflict(vec![Uuid::new_v4()]).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn forbidden_returns_403() {
        let resp = AppError::Forbidden.error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn forbidden_display_is_generic() {
        assert_eq!(AppError::Forbidden.to_string(), "Not allowed");
    }

    #[test]
    fn empty_cart_maps_to_unprocessable() {
        let app_err: AppError = DomainError::EmptyCart.into();
        assert!(matches!(app_err, AppError::Unprocessable(_)));
    }

    #[test]
    fn domain_conflict_keeps_colliding_ids() {
        let id = Uuid::new_v4();
        let app_err: AppError = DomainError::Conflict { colliding: vec![id] }.into();
        match app_err {
            AppError::Conflict(ids) => assert_eq!(ids, vec![id]),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn domain_store_maps_to_internal() {
        let app_err: AppError = DomainError::Store("connection lost".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
