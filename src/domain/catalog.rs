use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Animal categories the storefront carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    Cats,
    Dogs,
    Birds,
    Other,
}

impl Animal {
    pub const ALL: [Animal; 4] = [Animal::Cats, Animal::Dogs, Animal::Birds, Animal::Other];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cats" => Some(Animal::Cats),
            "dogs" => Some(Animal::Dogs),
            "birds" => Some(Animal::Birds),
            "other" => Some(Animal::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Animal::Cats => "cats",
            Animal::Dogs => "dogs",
            Animal::Birds => "birds",
            Animal::Other => "other",
        }
    }
}

/// Product types and their sub-categories, as carried by the catalog.
pub const PRODUCT_TYPES: [(&str, &[&str]); 3] = [
    (
        "Accessoires",
        &[
            "Arbre à chat",
            "Bac à litière",
            "Collier",
            "Coupe ongles",
            "Gamelle",
            "Grattoir",
            "Harnais",
            "Jouets",
            "Laisses",
        ],
    ),
    (
        "Alimentaire",
        &["Croquettes", "Conserves", "Friandises", "Complément alimentaire"],
    ),
    ("Soin", &["Shampoings", "Brosses", "Antiparasitaires", "Eau de cologne"]),
];

pub const BRANDS: [&str; 14] = [
    "Biazoo",
    "Biozoo",
    "Canistar",
    "Catisfactions",
    "Friskies",
    "IMAC",
    "Men for San",
    "Purina",
    "Sanicat",
    "Simba",
    "Skudo",
    "Stefanplast",
    "Trixie",
    "Whiskas",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub promo_price: Option<BigDecimal>,
    /// Display-only percentage; not required to equal the price delta.
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    /// Manual override; either this flag or an empty stock hides "available".
    pub out_of_stock: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Promo price when present, list price otherwise. Every price-dependent
    /// stage (filtering, sorting, cart snapshots) goes through here.
    pub fn effective_price(&self) -> &BigDecimal {
        self.promo_price.as_ref().unwrap_or(&self.price)
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0 && !self.out_of_stock
    }
}

/// Fields an admin supplies when creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub promo_price: Option<BigDecimal>,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    pub out_of_stock: bool,
    pub featured: bool,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".to_string()));
        }
        if Animal::parse(&self.animal).is_none() {
            return Err(DomainError::InvalidInput(format!(
                "unknown animal category '{}'",
                self.animal
            )));
        }
        let zero = BigDecimal::from(0);
        if self.price < zero {
            return Err(DomainError::InvalidInput("price must not be negative".to_string()));
        }
        if let Some(promo) = &self.promo_price {
            if *promo < zero {
                return Err(DomainError::InvalidInput(
                    "promo price must not be negative".to_string(),
                ));
            }
            if *promo > self.price {
                return Err(DomainError::InvalidInput(
                    "promo price must not exceed the list price".to_string(),
                ));
            }
        }
        if self.stock < 0 {
            return Err(DomainError::InvalidInput("stock must not be negative".to_string()));
        }
        Ok(())
    }
}

/// One page of products, with enough metadata to paginate.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 12;

impl Default for ProductPage {
    fn default() -> Self {
        ProductPage {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
        }
    }
}

/// Filter configuration applied to an in-memory product list. All predicates
/// must hold for a product to pass.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub search_text: Option<String>,
    pub product_type: Option<String>,
    pub subtype: Option<String>,
    pub brand: Option<String>,
    pub price_min: BigDecimal,
    pub price_max: BigDecimal,
}

impl FilterConfig {
    /// The unconstrained filter over `[0, ceiling]`.
    pub fn any(price_ceiling: BigDecimal) -> Self {
        FilterConfig {
            search_text: None,
            product_type: None,
            subtype: None,
            brand: None,
            price_min: BigDecimal::from(0),
            price_max: price_ceiling,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(query) = &self.search_text {
            let query = query.to_lowercase();
            let hit = product.name.to_lowercase().contains(&query)
                || product.description.to_lowercase().contains(&query)
                || product.brand.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }
        if let Some(product_type) = &self.product_type {
            if product.product_type != *product_type {
                return false;
            }
        }
        if let Some(subtype) = &self.subtype {
            if product.subtype.as_deref() != Some(subtype.as_str()) {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if product.brand != *brand {
                return false;
            }
        }
        let price = product.effective_price();
        *price >= self.price_min && *price <= self.price_max
    }
}

pub fn filter_products(products: Vec<Product>, filter: &FilterConfig) -> Vec<Product> {
    products.into_iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortKey::Newest),
            "price-low" => Some(SortKey::PriceLow),
            "price-high" => Some(SortKey::PriceHigh),
            _ => None,
        }
    }
}

/// Orders the filtered list in place. Price sorts are stable, so products at
/// equal effective price keep their relative order. `Newest` is the exact
/// reversal of the list as fetched; callers needing guaranteed recency must
/// have the store order by creation timestamp instead.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::PriceLow => {
            products.sort_by(|a, b| a.effective_price().cmp(b.effective_price()));
        }
        SortKey::PriceHigh => {
            products.sort_by(|a, b| b.effective_price().cmp(a.effective_price()));
        }
        SortKey::Newest => {
            products.reverse();
        }
    }
}
