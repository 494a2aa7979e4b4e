use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::catalog::{Animal, Product, ProductInput, ProductPage};
use super::errors::DomainError;
use super::order::{OrderDraft, OrderLineInput, OrderStatus, OrderView};
use super::user::{NewUser, User};

/// Fixed keys the storefront persists its local state under. Blobs are plain
/// JSON with no schema versioning; an older blob is assumed compatible.
pub mod keys {
    pub const CART: &str = "cart";
    pub const USER: &str = "user";
    pub const WISHLIST: &str = "wishlist";
    pub const ADMIN_AUTH: &str = "admin_auth";
}

pub trait ProductRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn list_by_animal(&self, animal: Animal) -> Result<Vec<Product>, DomainError>;
    /// Distinct product types observed for one animal category.
    fn list_types(&self, animal: Animal) -> Result<Vec<String>, DomainError>;
    /// Distinct brands carried for one animal category.
    fn list_brands(&self, animal: Animal) -> Result<Vec<String>, DomainError>;
    fn list_featured(&self, animal: Animal, limit: i64) -> Result<Vec<Product>, DomainError>;
    fn page_by_animal(
        &self,
        animal: Animal,
        page: i64,
        page_size: i64,
    ) -> Result<ProductPage, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn insert(&self, input: ProductInput) -> Result<Uuid, DomainError>;
    fn update(&self, id: Uuid, input: ProductInput) -> Result<(), DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Creates the order and all of its lines as one transaction; either
    /// everything is written or nothing is.
    fn create(&self, draft: OrderDraft, lines: Vec<OrderLineInput>) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    /// All orders, newest first, without their lines.
    fn list(&self) -> Result<Vec<OrderView>, DomainError>;
    /// One customer's orders, newest first, with their lines.
    fn list_by_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError>;
    /// Deletes the order lines before the parent order.
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn insert(&self, input: NewUser) -> Result<User, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// All users, newest first.
    fn list(&self) -> Result<Vec<User>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// JSON blobs under fixed string keys. The storefront has no fallback when
/// this store is unavailable, so adapters must report failures instead of
/// dropping state.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;
    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError>;
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, DomainError> {
    match store.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DomainError::Storage(format!("corrupt blob under '{}': {}", key, e))),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), DomainError> {
    let value = serde_json::to_value(value)
        .map_err(|e| DomainError::Internal(format!("encode blob for '{}': {}", key, e)))?;
    store.put(key, value)
}

/// Image bytes go in, a public URL comes out; only the URL string is ever
/// stored on a product record.
pub trait BlobStore: Send + Sync + 'static {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, DomainError>;
}
