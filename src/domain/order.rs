use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Ordered, closed set of order stages. An order starts life as a `Cart`;
/// `place_order` is the only Cart exit, after which the status only moves
/// forward one step at a time. `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum OrderStatus {
    Cart = 0,
    Placed = 1,
    Processing = 2,
    Shipped = 3,
    Delivered = 4,
}

impl OrderStatus {
    pub fn from_i32(v: i32) -> Option<OrderStatus> {
        match v {
            0 => Some(OrderStatus::Cart),
            1 => Some(OrderStatus::Placed),
            2 => Some(OrderStatus::Processing),
            3 => Some(OrderStatus::Shipped),
            4 => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// The next stage, or `None` at the terminal status.
    pub fn next(&self) -> Option<OrderStatus> {
        OrderStatus::from_i32(*self as i32 + 1)
    }

    pub fn is_terminal(&self) -> bool {
        *self == OrderStatus::Delivered
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLogView {
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub logs: Vec<OrderLogView>,
}

/// Product reference handed to `toggle_item`; the catalogue itself lives
/// outside the core.
#[derive(Debug, Clone)]
pub struct ProductRef {
    pub id: Uuid,
    pub price: BigDecimal,
}

/// Cheap pre-check view of an order, read without locking.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: OrderStatus,
    pub item_count: i64,
    pub total_amount: BigDecimal,
}
