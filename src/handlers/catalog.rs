use std::str::FromStr;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::landing;
use crate::config::Config;
use crate::domain::catalog::{
    Animal, FilterConfig, Product, ProductPage, SortKey, DEFAULT_PAGE_SIZE, PRODUCT_TYPES,
};
use crate::errors::AppError;
use crate::Catalog;

use super::blocking;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Decimal prices travel as strings to avoid floating-point issues.
    pub price: String,
    pub promo_price: Option<String>,
    pub effective_price: String,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    pub available: bool,
    pub featured: bool,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            effective_price: p.effective_price().to_string(),
            available: p.is_available(),
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            promo_price: p.promo_price.map(|v| v.to_string()),
            reduction: p.reduction,
            image_url: p.image_url,
            animal: p.animal,
            product_type: p.product_type,
            subtype: p.subtype,
            brand: p.brand,
            stock: p.stock,
            featured: p.featured,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub total: usize,
    pub items: Vec<ProductResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPageResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl From<ProductPage> for ProductPageResponse {
    fn from(page: ProductPage) -> Self {
        ProductPageResponse {
            items: page.items.into_iter().map(ProductResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaxonomyGroup {
    pub name: String,
    pub subtypes: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LandingResponse {
    pub animal: String,
    /// The full catalog taxonomy, for the filter sidebar.
    pub taxonomy: Vec<TaxonomyGroup>,
    /// Product types actually observed in this category.
    pub types: Vec<String>,
    /// Brands actually carried in this category.
    pub brands: Vec<String>,
    pub featured: Vec<ProductResponse>,
    pub products: ProductPageResponse,
}

fn taxonomy() -> Vec<TaxonomyGroup> {
    PRODUCT_TYPES
        .iter()
        .map(|(name, subtypes)| TaxonomyGroup {
            name: (*name).to_string(),
            subtypes: subtypes.iter().map(|s| (*s).to_string()).collect(),
        })
        .collect()
}

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    /// Free-text search over name, description, and brand.
    pub q: Option<String>,
    pub animal: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub subtype: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// One of "newest", "price-low", "price-high". Defaults to "newest".
    pub sort: Option<String>,
}

fn parse_price(raw: &Option<String>, field: &str) -> Result<Option<BigDecimal>, AppError> {
    match raw {
        Some(s) => BigDecimal::from_str(s)
            .map(Some)
            .map_err(|e| AppError::Validation(format!("invalid {} '{}': {}", field, s, e))),
        None => Ok(None),
    }
}

fn filter_from(params: &BrowseParams, ceiling: &BigDecimal) -> Result<FilterConfig, AppError> {
    let mut filter = FilterConfig::any(ceiling.clone());
    filter.search_text = params.q.clone().filter(|s| !s.is_empty());
    filter.product_type = params.product_type.clone();
    filter.subtype = params.subtype.clone();
    filter.brand = params.brand.clone();
    if let Some(min) = parse_price(&params.price_min, "price_min")? {
        filter.price_min = min;
    }
    if let Some(max) = parse_price(&params.price_max, "price_max")? {
        filter.price_max = max;
    }
    Ok(filter)
}

fn sort_from(params: &BrowseParams) -> Result<SortKey, AppError> {
    match &params.sort {
        Some(raw) => {
            SortKey::parse(raw).ok_or_else(|| AppError::Validation(format!("unknown sort '{}'", raw)))
        }
        None => Ok(SortKey::Newest),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Filtered, sorted product listing. Without an `animal` parameter this is
/// the global search across every category.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("q" = Option<String>, Query, description = "Free-text search"),
        ("animal" = Option<String>, Query, description = "cats | dogs | birds | other"),
        ("type" = Option<String>, Query, description = "Exact product type"),
        ("subtype" = Option<String>, Query, description = "Exact sub-category"),
        ("brand" = Option<String>, Query, description = "Exact brand"),
        ("price_min" = Option<String>, Query, description = "Inclusive lower bound on the effective price"),
        ("price_max" = Option<String>, Query, description = "Inclusive upper bound on the effective price"),
        ("sort" = Option<String>, Query, description = "newest | price-low | price-high"),
    ),
    responses(
        (status = 200, description = "Filtered product list", body = ProductListResponse),
        (status = 400, description = "Invalid filter parameter"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    catalog: web::Data<Catalog>,
    config: web::Data<Config>,
    query: web::Query<BrowseParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = filter_from(&params, &config.price_ceiling)?;
    let sort = sort_from(&params)?;
    let animal = match &params.animal {
        Some(raw) => Some(
            Animal::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown animal category '{}'", raw)))?,
        ),
        None => None,
    };

    let svc = catalog.into_inner();
    let items = blocking(move || match animal {
        Some(animal) => svc.browse(animal, &filter, sort),
        None => svc.search(&filter, sort),
    })
    .await?;

    Ok(HttpResponse::Ok().json(ProductListResponse {
        total: items.len(),
        items: items.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// GET /products/{id}
///
/// Product detail. A missing product is a 404, distinct from a fetch failure.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product does not exist"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    catalog: web::Data<Catalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let svc = catalog.into_inner();
    let product = blocking(move || svc.product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[derive(Debug, Deserialize)]
pub struct LandingParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /categories/{animal}
///
/// The landing page for one animal category. Its four store fetches run in
/// parallel, each under the configured timeout; a slow or failing section
/// renders as its empty default instead of failing the page.
#[utoipa::path(
    get,
    path = "/categories/{animal}",
    params(
        ("animal" = String, Path, description = "cats | dogs | birds | other"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("page_size" = Option<i64>, Query, description = "Products per page (default 12)"),
    ),
    responses(
        (status = 200, description = "Landing page sections", body = LandingResponse),
        (status = 404, description = "No such animal category"),
    ),
    tag = "catalog"
)]
pub async fn category_landing(
    catalog: web::Data<Catalog>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<LandingParams>,
) -> Result<HttpResponse, AppError> {
    let animal = Animal::parse(&path.into_inner()).ok_or(AppError::NotFound)?;
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let wait = Duration::from_secs(config.fetch_timeout_secs);

    let svc = catalog.into_inner();
    let (types_svc, brands_svc, featured_svc, page_svc) =
        (svc.clone(), svc.clone(), svc.clone(), svc);

    let sections = landing::assemble(
        blocking(move || types_svc.types(animal)),
        blocking(move || brands_svc.brands(animal)),
        blocking(move || featured_svc.featured(animal, 4)),
        blocking(move || page_svc.page(animal, page, page_size)),
        wait,
    )
    .await;

    Ok(HttpResponse::Ok().json(LandingResponse {
        animal: animal.as_str().to_string(),
        taxonomy: taxonomy(),
        types: sections.types,
        brands: sections.brands,
        featured: sections
            .featured
            .into_iter()
            .map(ProductResponse::from)
            .collect(),
        products: ProductPageResponse::from(sections.products),
    }))
}
