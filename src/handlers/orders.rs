use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::orders::OrderLifecycle;
use crate::db::DbPool;
use crate::domain::order::{OrderView, ProductRef};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::payment::{PaymentConfig, SimulatedAuthorizer};

use super::actor_from;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleItemRequest {
    pub product_id: Uuid,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub payment_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLogResponse {
    pub status: i32,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: i32,
    pub total_amount: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub logs: Vec<OrderLogResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        OrderResponse {
            id: o.id,
            owner_id: o.owner_id,
            status: o.status as i32,
            total_amount: o.total_amount.to_string(),
            created_at: o.created_at.to_rfc3339(),
            items: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    quantity: i.quantity,
                    unit_price: i.unit_price.to_string(),
                    line_total: i.line_total.to_string(),
                })
                .collect(),
            logs: o
                .logs
                .into_iter()
                .map(|l| OrderLogResponse {
                    status: l.status as i32,
                    created_at: l.created_at.to_rfc3339(),
                })
                .collect(),
        }
    }
}

fn lifecycle(
    pool: DbPool,
    cfg: &PaymentConfig,
) -> OrderLifecycle<DieselOrderRepository, SimulatedAuthorizer> {
    OrderLifecycle::new(
        DieselOrderRepository::new(pool),
        SimulatedAuthorizer::new(cfg.timeout),
    )
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders/cart
///
/// The actor's cart, created on first touch.
#[utoipa::path(
    get,
    path = "/orders/cart",
    responses(
        (status = 200, description = "The actor's cart", body = OrderResponse),
        (status = 403, description = "Missing or malformed actor identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn current_cart(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let pool = pool.get_ref().clone();
    let cart = web::block(move || {
        lifecycle(pool, &cfg)
            .current_cart(&actor)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(cart)))
}

/// GET /orders/{id}
///
/// The order with its items and status timeline. Owner only.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Actor does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let order_id = path.into_inner();
    let pool = pool.get_ref().clone();
    let order = web::block(move || {
        lifecycle(pool, &cfg)
            .get_order(order_id, &actor)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/cart/items/toggle
///
/// Add the product to the actor's cart if absent, remove it if present.
#[utoipa::path(
    post,
    path = "/orders/cart/items/toggle",
    request_body = ToggleItemRequest,
    responses(
        (status = 200, description = "Cart after the toggle", body = OrderResponse),
        (status = 403, description = "Missing or malformed actor identity"),
        (status = 422, description = "Malformed price"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn toggle_item(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    body: web::Json<ToggleItemRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let body = body.into_inner();
    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::Validation(format!("Invalid price '{}': {}", body.price, e)))?;

    let pool = pool.get_ref().clone();
    let cart = web::block(move || {
        let product = ProductRef {
            id: body.product_id,
            price,
        };
        lifecycle(pool, &cfg)
            .toggle_item(&actor, product)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(cart)))
}

/// DELETE /orders/{id}/items/{product_id}
#[utoipa::path(
    delete,
    path = "/orders/{id}/items/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Cart after the removal", body = OrderResponse),
        (status = 403, description = "Actor does not own the order"),
        (status = 404, description = "Order or item not found"),
        (status = 422, description = "Order is no longer a cart"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn remove_item(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let (order_id, product_id) = path.into_inner();
    let pool = pool.get_ref().clone();
    let cart = web::block(move || {
        lifecycle(pool, &cfg)
            .remove_item(order_id, &actor, product_id)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(cart)))
}

/// DELETE /orders/{id}/items
///
/// Empty the cart; the total drops to zero.
#[utoipa::path(
    delete,
    path = "/orders/{id}/items",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Emptied cart", body = OrderResponse),
        (status = 403, description = "Actor does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order is no longer a cart"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn trash_cart(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let order_id = path.into_inner();
    let pool = pool.get_ref().clone();
    let cart = web::block(move || {
        lifecycle(pool, &cfg)
            .trash_cart(order_id, &actor)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(cart)))
}

/// POST /orders/{id}/place
///
/// Cart → Placed: authorizes payment, then commits the transition and the
/// first timeline entry atomically. Empty carts are rejected untouched.
#[utoipa::path(
    post,
    path = "/orders/{id}/place",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Placed order", body = OrderResponse),
        (status = 403, description = "Actor does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Empty cart, already placed, or payment declined"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    path: web::Path<Uuid>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let order_id = path.into_inner();
    let token = body.into_inner().payment_token;
    let pool = pool.get_ref().clone();
    let placed = web::block(move || {
        lifecycle(pool, &cfg)
            .place_order(order_id, &actor, &token)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(placed)))
}

/// POST /orders/{id}/advance
///
/// Move the order one stage forward, appending a timeline entry. Refused for
/// carts and for delivered orders.
#[utoipa::path(
    post,
    path = "/orders/{id}/advance",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Advanced order", body = OrderResponse),
        (status = 403, description = "Actor does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order is a cart or already delivered"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn advance_status(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    cfg: web::Data<PaymentConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let order_id = path.into_inner();
    let pool = pool.get_ref().clone();
    let advanced = web::block(move || {
        lifecycle(pool, &cfg)
            .advance_status(order_id, &actor)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(advanced)))
}
