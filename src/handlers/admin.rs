use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::ProductInput;
use crate::domain::order::OrderStatus;
use crate::domain::user::User;
use crate::errors::AppError;
use crate::AdminSvc;

use super::blocking;
use super::catalog::{ProductListResponse, ProductResponse};
use super::checkout::{OrderListResponse, OrderResponse};

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: String,
    pub pending_orders: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "1250.00"
    pub price: String,
    pub promo_price: Option<String>,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub out_of_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, AppError> {
        let price = BigDecimal::from_str(&self.price)
            .map_err(|e| AppError::Validation(format!("invalid price '{}': {}", self.price, e)))?;
        let promo_price = match &self.promo_price {
            Some(raw) => Some(BigDecimal::from_str(raw).map_err(|e| {
                AppError::Validation(format!("invalid promo_price '{}': {}", raw, e))
            })?),
            None => None,
        };
        Ok(ProductInput {
            name: self.name,
            description: self.description,
            price,
            promo_price,
            reduction: self.reduction,
            image_url: self.image_url,
            animal: self.animal,
            product_type: self.product_type,
            subtype: self.subtype,
            brand: self.brand,
            stock: self.stock,
            out_of_stock: self.out_of_stock,
            featured: self.featured,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of "pending", "confirmed", "shipped", "delivered".
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

// ── Session ──────────────────────────────────────────────────────────────────

/// POST /admin/login
///
/// Compares against the environment-provided shared secret. Success sets the
/// admin flag; there is no expiry and no session token.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin flag set"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "ADMIN_PASSWORD not configured"),
    ),
    tag = "admin"
)]
pub async fn login(
    admin: web::Data<AdminSvc>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let password = body.into_inner().password;
    let svc = admin.into_inner();
    blocking(move || svc.login(&password)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// POST /admin/logout
#[utoipa::path(
    post,
    path = "/admin/logout",
    responses((status = 200, description = "Admin flag cleared")),
    tag = "admin"
)]
pub async fn logout(admin: web::Data<AdminSvc>) -> Result<HttpResponse, AppError> {
    let svc = admin.into_inner();
    blocking(move || svc.logout()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

// ── Dashboard ────────────────────────────────────────────────────────────────

/// GET /admin/stats
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Dashboard aggregates", body = StatsResponse),
        (status = 401, description = "Admin flag not set"),
    ),
    tag = "admin"
)]
pub async fn stats(admin: web::Data<AdminSvc>) -> Result<HttpResponse, AppError> {
    let svc = admin.into_inner();
    let stats = blocking(move || svc.stats()).await?;
    Ok(HttpResponse::Ok().json(StatsResponse {
        total_products: stats.total_products,
        total_orders: stats.total_orders,
        total_revenue: stats.total_revenue.to_string(),
        pending_orders: stats.pending_orders,
    }))
}

// ── Products ─────────────────────────────────────────────────────────────────

/// GET /admin/products
#[utoipa::path(
    get,
    path = "/admin/products",
    responses((status = 200, description = "Every product", body = ProductListResponse)),
    tag = "admin"
)]
pub async fn list_products(admin: web::Data<AdminSvc>) -> Result<HttpResponse, AppError> {
    let svc = admin.into_inner();
    let items = blocking(move || svc.list_products()).await?;
    Ok(HttpResponse::Ok().json(ProductListResponse {
        total: items.len(),
        items: items.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// POST /admin/products
#[utoipa::path(
    post,
    path = "/admin/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Validation failed"),
    ),
    tag = "admin"
)]
pub async fn create_product(
    admin: web::Data<AdminSvc>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;
    let svc = admin.into_inner();
    let id = blocking(move || svc.create_product(input)).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// PUT /admin/products/{id}
#[utoipa::path(
    put,
    path = "/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product replaced"),
        (status = 404, description = "Product does not exist"),
    ),
    tag = "admin"
)]
pub async fn update_product(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;
    let svc = admin.into_inner();
    blocking(move || svc.update_product(id, input)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// DELETE /admin/products/{id}
#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product does not exist"),
    ),
    tag = "admin"
)]
pub async fn delete_product(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let svc = admin.into_inner();
    blocking(move || svc.delete_product(id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

// ── Orders ───────────────────────────────────────────────────────────────────

/// GET /admin/orders
#[utoipa::path(
    get,
    path = "/admin/orders",
    responses((status = 200, description = "Every order, newest first", body = OrderListResponse)),
    tag = "admin"
)]
pub async fn list_orders(admin: web::Data<AdminSvc>) -> Result<HttpResponse, AppError> {
    let svc = admin.into_inner();
    let orders = blocking(move || svc.list_orders()).await?;
    Ok(HttpResponse::Ok().json(OrderListResponse {
        items: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

/// GET /admin/orders/{id}
#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order with its lines", body = OrderResponse),
        (status = 404, description = "Order does not exist"),
    ),
    tag = "admin"
)]
pub async fn get_order(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let svc = admin.into_inner();
    let order = blocking(move || svc.order(id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /admin/orders/{id}/status
///
/// Single-step status write; skipping states is accepted.
#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status written"),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order does not exist"),
    ),
    tag = "admin"
)]
pub async fn update_order_status(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let raw = body.into_inner().status;
    let status = OrderStatus::parse(&raw)
        .ok_or_else(|| AppError::Validation(format!("unknown status '{}'", raw)))?;
    let svc = admin.into_inner();
    blocking(move || svc.update_order_status(id, status)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// DELETE /admin/orders/{id}
///
/// Removes the order lines, then the order.
#[utoipa::path(
    delete,
    path = "/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order and its lines deleted"),
        (status = 404, description = "Order does not exist"),
    ),
    tag = "admin"
)]
pub async fn delete_order(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let svc = admin.into_inner();
    blocking(move || svc.delete_order(id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

// ── Users ────────────────────────────────────────────────────────────────────

/// GET /admin/users
#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "Every user, newest first", body = [UserResponse])),
    tag = "admin"
)]
pub async fn list_users(admin: web::Data<AdminSvc>) -> Result<HttpResponse, AppError> {
    let svc = admin.into_inner();
    let users = blocking(move || svc.list_users()).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /admin/users/{id}
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User does not exist"),
    ),
    tag = "admin"
)]
pub async fn delete_user(
    admin: web::Data<AdminSvc>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let svc = admin.into_inner();
    blocking(move || svc.delete_user(id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

// ── Images ───────────────────────────────────────────────────────────────────

/// POST /admin/images?filename=photo.jpg
///
/// Raw image bytes in, public URL out. The URL string is what gets stored on
/// the product record.
#[utoipa::path(
    post,
    path = "/admin/images",
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "application/octet-stream"),
    params(("filename" = String, Query, description = "Original file name")),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Empty payload"),
    ),
    tag = "admin"
)]
pub async fn upload_image(
    admin: web::Data<AdminSvc>,
    query: web::Query<UploadParams>,
    bytes: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let filename = query.into_inner().filename;
    let svc = admin.into_inner();
    let url = blocking(move || svc.upload_image(&filename, &bytes)).await?;
    Ok(HttpResponse::Created().json(UploadResponse { url }))
}
