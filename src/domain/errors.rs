use thiserror::Error;
use uuid::Uuid;

/// Error kinds surfaced by the scheduling and order-lifecycle cores.
///
/// Expected kinds (Validation, Conflict, Authorization, InvalidState,
/// EmptyCart) are checked before any mutation where possible; `Store` is a
/// transient store/transaction failure surfaced after rollback and is never
/// retried internally.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Scheduling conflict with {} existing session(s)", colliding.len())]
    Conflict { colliding: Vec<Uuid> },

    // The denial carries no detail about the target resource.
    #[error("Not allowed")]
    Authorization,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(String),
}
