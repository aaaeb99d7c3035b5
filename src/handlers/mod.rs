pub mod orders;
pub mod sessions;

use actix_web::HttpRequest;
use uuid::Uuid;

use crate::domain::auth::{Actor, Role};
use crate::errors::AppError;

/// The identity provider sits in front of this service and forwards the
/// authenticated caller as headers. Anything missing or malformed is a
/// generic denial.
pub fn actor_from(req: &HttpRequest) -> Result<Actor, AppError> {
    let id = req
        .headers()
        .get("X-Actor-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());
    let role = req
        .headers()
        .get("X-Actor-Role")
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse);
    match (id, role) {
        (Some(id), Some(role)) => Ok(Actor { id, role }),
        _ => Err(AppError::Forbidden),
    }
}
