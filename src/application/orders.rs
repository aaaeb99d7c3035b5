use uuid::Uuid;

use crate::domain::auth::{can_modify, Actor};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, OrderSummary, OrderView, ProductRef};
use crate::domain::ports::{OrderRepository, PaymentAuthorizer};

/// Cart-to-order state machine. Ownership is checked up front; the
/// repository serializes concurrent mutations per order and keeps
/// `total_amount` equal to the sum of the item line totals.
pub struct OrderLifecycle<R, P> {
    repo: R,
    payments: P,
}

impl<R: OrderRepository, P: PaymentAuthorizer> OrderLifecycle<R, P> {
    pub fn new(repo: R, payments: P) -> Self {
        Self { repo, payments }
    }

    /// The actor's cart, created on first touch.
    pub fn current_cart(&self, actor: &Actor) -> Result<OrderView, DomainError> {
        self.repo.find_or_create_cart(actor.id)
    }

    pub fn get_order(&self, order_id: Uuid, actor: &Actor) -> Result<OrderView, DomainError> {
        let order = self.repo.find_by_id(order_id)?.ok_or(DomainError::NotFound)?;
        if !can_modify(actor, order.owner_id) {
            return Err(DomainError::Authorization);
        }
        Ok(order)
    }

    /// Add-if-absent / remove-if-present against the actor's cart.
    pub fn toggle_item(&self, actor: &Actor, product: ProductRef) -> Result<OrderView, DomainError> {
        if product.price < bigdecimal::BigDecimal::from(0) {
            return Err(DomainError::Validation("product price must not be negative".into()));
        }
        let cart = self.repo.find_or_create_cart(actor.id)?;
        self.repo.toggle_item(cart.id, product)
    }

    pub fn remove_item(
        &self,
        order_id: Uuid,
        actor: &Actor,
        product_id: Uuid,
    ) -> Result<OrderView, DomainError> {
        self.owned_summary(order_id, actor)?;
        self.repo.remove_item(order_id, product_id)
    }

    pub fn trash_cart(&self, order_id: Uuid, actor: &Actor) -> Result<OrderView, DomainError> {
        self.owned_summary(order_id, actor)?;
        self.repo.trash_cart(order_id)
    }

    /// Cart → Placed. Payment is authorized before the row lock is taken;
    /// on authorization failure nothing becomes visible.
    pub fn place_order(
        &self,
        order_id: Uuid,
        actor: &Actor,
        payment_token: &str,
    ) -> Result<OrderView, DomainError> {
        let summary = self.owned_summary(order_id, actor)?;
        if summary.status != OrderStatus::Cart {
            return Err(DomainError::InvalidState("order has already been placed".into()));
        }
        if summary.item_count == 0 {
            return Err(DomainError::EmptyCart);
        }
        self.payments.authorize(payment_token, &summary.total_amount)?;
        let placed = self.repo.mark_placed(order_id)?;
        log::info!("order {} placed, total {}", placed.id, placed.total_amount);
        Ok(placed)
    }

    /// One step forward through the status enumeration.
    pub fn advance_status(&self, order_id: Uuid, actor: &Actor) -> Result<OrderView, DomainError> {
        self.owned_summary(order_id, actor)?;
        let advanced = self.repo.advance(order_id)?;
        log::info!("order {} advanced to {:?}", advanced.id, advanced.status);
        Ok(advanced)
    }

    fn owned_summary(&self, order_id: Uuid, actor: &Actor) -> Result<OrderSummary, DomainError> {
        let summary = self.repo.summary(order_id)?;
        if !can_modify(actor, summary.owner_id) {
            return Err(DomainError::Authorization);
        }
        Ok(summary)
    }
}
