use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{OrderSummary, OrderView, ProductRef};
use super::session::{NewSession, SessionFilter, SessionPatch, SessionView};

/// Persistence port for learning sessions. Every mutating method runs as a
/// single transaction; conflict checks are linearized per teacher inside it.
pub trait SessionRepository: Send + Sync + 'static {
    fn list(&self, teacher_id: Uuid, filter: SessionFilter)
        -> Result<Vec<SessionView>, DomainError>;

    /// Insert with status `Scheduled` after checking the teacher's other
    /// non-cancelled sessions for overlap. No partial writes on conflict.
    fn insert(&self, session: NewSession) -> Result<SessionView, DomainError>;

    /// Apply a partial update; when the patch touches the interval, re-run
    /// the overlap check against the teacher's other sessions using the
    /// effective (patched-or-stored) bounds.
    fn update(
        &self,
        session_id: Uuid,
        actor_teacher_id: Uuid,
        patch: SessionPatch,
    ) -> Result<SessionView, DomainError>;

    /// Mark a future session cancelled, recording the reason. The row is
    /// kept for the audit trail.
    fn cancel(
        &self,
        session_id: Uuid,
        actor_teacher_id: Uuid,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}

/// Persistence port for orders. Mutating methods lock the order row for the
/// duration of the transaction and recompute `total_amount` from the items.
pub trait OrderRepository: Send + Sync + 'static {
    fn find_or_create_cart(&self, owner_id: Uuid) -> Result<OrderView, DomainError>;

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Unlocked read used for pre-transaction checks.
    fn summary(&self, order_id: Uuid) -> Result<OrderSummary, DomainError>;

    /// Add the product if absent (quantity 1), remove it if present.
    fn toggle_item(&self, order_id: Uuid, product: ProductRef) -> Result<OrderView, DomainError>;

    fn remove_item(&self, order_id: Uuid, product_id: Uuid) -> Result<OrderView, DomainError>;

    fn trash_cart(&self, order_id: Uuid) -> Result<OrderView, DomainError>;

    /// Cart → Placed transition: re-checks Cart status and non-emptiness
    /// under the row lock, then appends the status log entry.
    fn mark_placed(&self, order_id: Uuid) -> Result<OrderView, DomainError>;

    /// Move one step forward, appending a status log entry. Refuses Cart
    /// (orders leave Cart only via `mark_placed`) and the terminal status.
    fn advance(&self, order_id: Uuid) -> Result<OrderView, DomainError>;
}

/// External payment collaborator, invoked synchronously by `place_order`.
/// Implementations apply their own timeout; a timeout is a failure.
pub trait PaymentAuthorizer: Send + Sync + 'static {
    fn authorize(&self, card_token: &str, amount: &BigDecimal) -> Result<(), DomainError>;
}
