use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout::CheckoutInput;
use crate::domain::order::OrderView;
use crate::errors::AppError;
use crate::CheckoutSvc;

use super::blocking;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub total_price: String,
    pub status: String,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            address: order.address,
            city: order.city,
            total_price: order.total_price.to_string(),
            status: order.status.as_str().to_string(),
            created_at: order.created_at.to_rfc3339(),
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub items: Vec<OrderResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Snapshots the cart into an order plus order lines (one transaction) and
/// clears the cart. Requires a logged-in user; an unauthenticated attempt is
/// answered with 401 and a redirect to the login resource, and nothing is
/// written. On a failed write the cart is left untouched for a manual retry.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created", body = PlaceOrderResponse),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "Not logged in"),
    ),
    tag = "checkout"
)]
pub async fn place_order(
    checkout: web::Data<CheckoutSvc>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = CheckoutInput {
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        city: body.city,
    };
    let svc = checkout.into_inner();
    let id = blocking(move || svc.place_order(input)).await?;
    Ok(HttpResponse::Created().json(PlaceOrderResponse { id }))
}

/// GET /orders
///
/// The logged-in customer's orders, newest first, with their lines.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The customer's orders", body = OrderListResponse),
        (status = 401, description = "Not logged in"),
    ),
    tag = "checkout"
)]
pub async fn my_orders(checkout: web::Data<CheckoutSvc>) -> Result<HttpResponse, AppError> {
    let svc = checkout.into_inner();
    let orders = blocking(move || svc.my_orders()).await?;
    Ok(HttpResponse::Ok().json(OrderListResponse {
        items: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}
