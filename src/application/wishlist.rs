use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{keys, read_json, write_json, KeyValueStore};

/// A product-id set kept under the `"wishlist"` key, in insertion order.
pub struct WishlistService {
    store: Arc<dyn KeyValueStore>,
}

impl WishlistService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<Uuid>, DomainError> {
        Ok(read_json(self.store.as_ref(), keys::WISHLIST)?.unwrap_or_default())
    }

    pub fn list(&self) -> Result<Vec<Uuid>, DomainError> {
        self.load()
    }

    /// Adds the product if absent, removes it if present. Returns the
    /// updated list.
    pub fn toggle(&self, product_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let mut ids = self.load()?;
        if let Some(pos) = ids.iter().position(|id| *id == product_id) {
            ids.remove(pos);
        } else {
            ids.push(product_id);
        }
        write_json(self.store.as_ref(), keys::WISHLIST, &ids)?;
        Ok(ids)
    }
}
