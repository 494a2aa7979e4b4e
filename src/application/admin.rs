use std::sync::Arc;

use bigdecimal::BigDecimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductInput};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, OrderView};
use crate::domain::ports::{
    keys, read_json, write_json, BlobStore, KeyValueStore, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::domain::user::User;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: BigDecimal,
    pub pending_orders: usize,
}

/// The admin surface: shared-password login, dashboard stats, and CRUD over
/// products, orders, and users. Every operation is gated on the
/// `"admin_auth"` flag — a boolean with no expiry and no session token,
/// matching the source system.
pub struct AdminService<P, O, U> {
    products: P,
    orders: O,
    users: U,
    store: Arc<dyn KeyValueStore>,
    blobs: Arc<dyn BlobStore>,
    admin_password: Option<String>,
}

impl<P, O, U> AdminService<P, O, U>
where
    P: ProductRepository,
    O: OrderRepository,
    U: UserRepository,
{
    pub fn new(
        products: P,
        orders: O,
        users: U,
        store: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        admin_password: Option<String>,
    ) -> Self {
        Self {
            products,
            orders,
            users,
            store,
            blobs,
            admin_password,
        }
    }

    /// Compares against the environment-provided secret. An unset secret is a
    /// server-side configuration error, never a successful login.
    pub fn login(&self, password: &str) -> Result<(), DomainError> {
        let expected = self.admin_password.as_deref().ok_or_else(|| {
            DomainError::Internal("ADMIN_PASSWORD not configured on the server".to_string())
        })?;
        if password != expected {
            return Err(DomainError::Credentials);
        }
        write_json(self.store.as_ref(), keys::ADMIN_AUTH, &true)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.store.remove(keys::ADMIN_AUTH)
    }

    fn require_admin(&self) -> Result<(), DomainError> {
        match read_json::<bool>(self.store.as_ref(), keys::ADMIN_AUTH)? {
            Some(true) => Ok(()),
            _ => Err(DomainError::AdminRequired),
        }
    }

    /// Linear aggregation over the fetched rows. A failed read degrades to
    /// zero rows with a logged diagnostic rather than failing the dashboard.
    pub fn stats(&self) -> Result<DashboardStats, DomainError> {
        self.require_admin()?;

        let products = self.products.list().unwrap_or_else(|e| {
            log::warn!("stats product fetch failed, counting none: {}", e);
            Vec::new()
        });
        let orders = self.orders.list().unwrap_or_else(|e| {
            log::warn!("stats order fetch failed, counting none: {}", e);
            Vec::new()
        });

        let total_revenue = orders
            .iter()
            .fold(BigDecimal::from(0), |acc, o| acc + &o.total_price);
        let pending_orders = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count();

        Ok(DashboardStats {
            total_products: products.len(),
            total_orders: orders.len(),
            total_revenue,
            pending_orders,
        })
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.require_admin()?;
        Ok(self.products.list().unwrap_or_else(|e| {
            log::warn!("product fetch failed, rendering empty: {}", e);
            Vec::new()
        }))
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Uuid, DomainError> {
        self.require_admin()?;
        input.validate()?;
        self.products.insert(input)
    }

    pub fn update_product(&self, id: Uuid, input: ProductInput) -> Result<(), DomainError> {
        self.require_admin()?;
        input.validate()?;
        self.products.update(id, input)
    }

    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        self.require_admin()?;
        self.products.delete(id)
    }

    pub fn list_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        self.require_admin()?;
        Ok(self.orders.list().unwrap_or_else(|e| {
            log::warn!("order fetch failed, rendering empty: {}", e);
            Vec::new()
        }))
    }

    pub fn order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.require_admin()?;
        self.orders.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    /// Single-step status write. Nothing forbids skipping states; the
    /// lifecycle is permissive by construction.
    pub fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        self.require_admin()?;
        self.orders.update_status(id, status)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        self.require_admin()?;
        self.orders.delete(id)
    }

    pub fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.require_admin()?;
        Ok(self.users.list().unwrap_or_else(|e| {
            log::warn!("user fetch failed, rendering empty: {}", e);
            Vec::new()
        }))
    }

    pub fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        self.require_admin()?;
        self.users.delete(id)
    }

    /// Hands the bytes to the blob store and returns the public URL; the URL
    /// string is all that ever lands on a product record.
    pub fn upload_image(&self, filename: &str, bytes: &[u8]) -> Result<String, DomainError> {
        self.require_admin()?;
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("image payload is empty".to_string()));
        }
        self.blobs.store(filename, bytes)
    }
}
