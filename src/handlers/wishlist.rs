use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::wishlist::WishlistService;
use crate::errors::AppError;

use super::blocking;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistResponse {
    pub product_ids: Vec<Uuid>,
}

/// GET /wishlist
#[utoipa::path(
    get,
    path = "/wishlist",
    responses((status = 200, description = "Wishlisted product ids, oldest first", body = WishlistResponse)),
    tag = "wishlist"
)]
pub async fn view_wishlist(
    wishlist: web::Data<WishlistService>,
) -> Result<HttpResponse, AppError> {
    let svc = wishlist.into_inner();
    let product_ids = blocking(move || svc.list()).await?;
    Ok(HttpResponse::Ok().json(WishlistResponse { product_ids }))
}

/// POST /wishlist/toggle
///
/// Adds the product if absent, removes it if present.
#[utoipa::path(
    post,
    path = "/wishlist/toggle",
    request_body = ToggleRequest,
    responses((status = 200, description = "Updated wishlist", body = WishlistResponse)),
    tag = "wishlist"
)]
pub async fn toggle_wishlist(
    wishlist: web::Data<WishlistService>,
    body: web::Json<ToggleRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body.into_inner().product_id;
    let svc = wishlist.into_inner();
    let product_ids = blocking(move || svc.toggle(product_id)).await?;
    Ok(HttpResponse::Ok().json(WishlistResponse { product_ids }))
}
