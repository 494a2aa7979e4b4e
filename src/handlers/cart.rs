use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart::CartView;
use crate::errors::AppError;
use crate::CartSvc;

use super::blocking;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    /// Distinct lines, for the cart badge — not total units.
    pub line_count: usize,
    pub subtotal: String,
    pub shipping: String,
    pub discount: String,
    pub total: String,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        CartResponse {
            lines: view
                .lines
                .into_iter()
                .map(|l| CartLineResponse {
                    product_id: l.product_id,
                    name: l.name,
                    image_url: l.image_url,
                    unit_price: l.unit_price.to_string(),
                    quantity: l.quantity,
                })
                .collect(),
            line_count: view.line_count,
            subtotal: view.subtotal.to_string(),
            shipping: view.shipping.to_string(),
            discount: view.discount.to_string(),
            total: view.total.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddItemResponse {
    pub line_count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CouponRequest {
    pub code: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Cart contents and totals", body = CartResponse)),
    tag = "cart"
)]
pub async fn view_cart(cart: web::Data<CartSvc>) -> Result<HttpResponse, AppError> {
    let svc = cart.into_inner();
    let view = blocking(move || svc.view()).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// POST /cart/items
///
/// Adds a product to the cart, snapshotting its current effective price.
/// Adding a product that is already present merges into the existing line.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated distinct line count", body = AddItemResponse),
        (status = 400, description = "Product unavailable or quantity invalid"),
        (status = 404, description = "Product does not exist"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    cart: web::Data<CartSvc>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let quantity = body.quantity.unwrap_or(1);
    let svc = cart.into_inner();
    let line_count = blocking(move || svc.add(body.product_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(AddItemResponse { line_count }))
}

/// PUT /cart/items/{product_id}
///
/// Sets a line's quantity; zero or less removes the line.
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product UUID")),
    request_body = SetQuantityRequest,
    responses((status = 200, description = "Updated cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn set_quantity(
    cart: web::Data<CartSvc>,
    path: web::Path<Uuid>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let svc = cart.into_inner();
    let view = blocking(move || svc.set_quantity(product_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// DELETE /cart/items/{product_id}
///
/// Removes a line; removing an absent product is not an error.
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product UUID")),
    responses((status = 200, description = "Updated cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn remove_item(
    cart: web::Data<CartSvc>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let svc = cart.into_inner();
    let view = blocking(move || svc.remove(product_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// POST /cart/coupon
///
/// Accepts a coupon code. No coupon store exists yet, so the discount always
/// comes back zero.
#[utoipa::path(
    post,
    path = "/cart/coupon",
    request_body = CouponRequest,
    responses((status = 200, description = "Cart with the (unchanged) discount", body = CartResponse)),
    tag = "cart"
)]
pub async fn apply_coupon(
    cart: web::Data<CartSvc>,
    body: web::Json<CouponRequest>,
) -> Result<HttpResponse, AppError> {
    let code = body.into_inner().code;
    let svc = cart.into_inner();
    let view = blocking(move || svc.apply_coupon(&code)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}
