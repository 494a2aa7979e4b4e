use std::sync::Arc;

use bigdecimal::BigDecimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::errors::DomainError;
use crate::domain::ports::{keys, read_json, write_json, KeyValueStore, ProductRepository};

/// Cart state plus the derived figures the summary panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub line_count: usize,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
}

/// Cart operations over the persisted ledger. Every operation loads the blob,
/// mutates it, and writes it back; a failing store is surfaced, never papered
/// over with a fresh cart.
pub struct CartService<P> {
    products: P,
    store: Arc<dyn KeyValueStore>,
    shipping_fee: BigDecimal,
}

impl<P: ProductRepository> CartService<P> {
    pub fn new(products: P, store: Arc<dyn KeyValueStore>, shipping_fee: BigDecimal) -> Self {
        Self {
            products,
            store,
            shipping_fee,
        }
    }

    fn load(&self) -> Result<Cart, DomainError> {
        Ok(read_json(self.store.as_ref(), keys::CART)?.unwrap_or_default())
    }

    fn save(&self, cart: &Cart) -> Result<(), DomainError> {
        write_json(self.store.as_ref(), keys::CART, cart)
    }

    fn view_of(&self, cart: Cart) -> CartView {
        let discount = BigDecimal::from(0);
        CartView {
            line_count: cart.line_count(),
            subtotal: cart.subtotal(),
            shipping: cart.shipping(&self.shipping_fee),
            total: cart.total(&self.shipping_fee, &discount),
            discount,
            lines: cart.lines().to_vec(),
        }
    }

    pub fn view(&self) -> Result<CartView, DomainError> {
        Ok(self.view_of(self.load()?))
    }

    /// Adds a product to the ledger, snapshotting its current effective
    /// price. Returns the updated distinct line count for the badge.
    pub fn add(&self, product_id: Uuid, quantity: i32) -> Result<usize, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        let product = self
            .products
            .find_by_id(product_id)?
            .ok_or(DomainError::NotFound)?;
        if !product.is_available() {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is out of stock",
                product.name
            )));
        }
        let mut cart = self.load()?;
        let count = cart.add(&product, quantity);
        self.save(&cart)?;
        Ok(count)
    }

    pub fn set_quantity(&self, product_id: Uuid, quantity: i32) -> Result<CartView, DomainError> {
        let mut cart = self.load()?;
        cart.set_quantity(product_id, quantity);
        self.save(&cart)?;
        Ok(self.view_of(cart))
    }

    pub fn remove(&self, product_id: Uuid) -> Result<CartView, DomainError> {
        let mut cart = self.load()?;
        cart.remove(product_id);
        self.save(&cart)?;
        Ok(self.view_of(cart))
    }

    /// Accepts a coupon code without validating it against anything; the
    /// discount stays zero until a real coupon stage exists.
    pub fn apply_coupon(&self, code: &str) -> Result<CartView, DomainError> {
        log::info!("coupon '{}' accepted without validation, discount unchanged", code);
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::catalog::{Animal, Product, ProductInput, ProductPage};
    use crate::infrastructure::kv_store::MemoryStore;

    struct FixedProducts(Vec<Product>);

    impl ProductRepository for FixedProducts {
        fn list(&self) -> Result<Vec<Product>, DomainError> {
            Ok(self.0.clone())
        }
        fn list_by_animal(&self, _animal: Animal) -> Result<Vec<Product>, DomainError> {
            Ok(self.0.clone())
        }
        fn list_types(&self, _animal: Animal) -> Result<Vec<String>, DomainError> {
            Ok(Vec::new())
        }
        fn list_brands(&self, _animal: Animal) -> Result<Vec<String>, DomainError> {
            Ok(Vec::new())
        }
        fn list_featured(&self, _animal: Animal, _limit: i64) -> Result<Vec<Product>, DomainError> {
            Ok(Vec::new())
        }
        fn page_by_animal(
            &self,
            _animal: Animal,
            _page: i64,
            _page_size: i64,
        ) -> Result<ProductPage, DomainError> {
            Ok(Default::default())
        }
        fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
            Ok(self.0.iter().find(|p| p.id == id).cloned())
        }
        fn insert(&self, _input: ProductInput) -> Result<Uuid, DomainError> {
            unimplemented!("not exercised")
        }
        fn update(&self, _id: Uuid, _input: ProductInput) -> Result<(), DomainError> {
            unimplemented!("not exercised")
        }
        fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
            unimplemented!("not exercised")
        }
    }

    fn product(price: i64, promo: Option<i64>, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Croquettes".to_string(),
            description: String::new(),
            price: BigDecimal::from(price),
            promo_price: promo.map(BigDecimal::from),
            reduction: None,
            image_url: None,
            animal: "cats".to_string(),
            product_type: "Alimentaire".to_string(),
            subtype: None,
            brand: "Purina".to_string(),
            stock,
            out_of_stock: false,
            featured: false,
            created_at: Utc::now(),
        }
    }

    fn service(products: Vec<Product>) -> CartService<FixedProducts> {
        CartService::new(
            FixedProducts(products),
            Arc::new(MemoryStore::default()),
            BigDecimal::from(10),
        )
    }

    #[test]
    fn add_persists_across_loads_and_merges_lines() {
        let p = product(1000, None, 5);
        let svc = service(vec![p.clone()]);

        assert_eq!(svc.add(p.id, 1).expect("first add"), 1);
        assert_eq!(svc.add(p.id, 1).expect("second add"), 1);

        let view = svc.view().expect("view");
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.subtotal, BigDecimal::from(2000));
    }

    #[test]
    fn add_snapshots_the_promo_price() {
        let p = product(1000, Some(800), 5);
        let svc = service(vec![p.clone()]);

        svc.add(p.id, 1).expect("add");

        let view = svc.view().expect("view");
        assert_eq!(view.lines[0].unit_price, BigDecimal::from(800));
    }

    #[test]
    fn add_rejects_unavailable_products() {
        let p = product(1000, None, 0);
        let svc = service(vec![p.clone()]);
        assert!(matches!(
            svc.add(p.id, 1),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn add_rejects_unknown_products() {
        let svc = service(vec![]);
        assert!(matches!(
            svc.add(Uuid::new_v4(), 1),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn set_quantity_zero_drops_the_line_from_the_totals() {
        let p = product(1000, None, 5);
        let svc = service(vec![p.clone()]);
        svc.add(p.id, 2).expect("add");

        let view = svc.set_quantity(p.id, 0).expect("set");

        assert!(view.lines.is_empty());
        assert_eq!(view.subtotal, BigDecimal::from(0));
        assert_eq!(view.total, BigDecimal::from(0));
    }

    #[test]
    fn view_totals_match_the_reference_scenario() {
        let a = product(1000, None, 5);
        let b = product(500, None, 5);
        let svc = service(vec![a.clone(), b.clone()]);
        svc.add(a.id, 2).expect("add a");
        svc.add(b.id, 1).expect("add b");

        let view = svc.view().expect("view");
        assert_eq!(view.subtotal, BigDecimal::from(2500));
        assert_eq!(view.shipping, BigDecimal::from(10));
        assert_eq!(view.total, BigDecimal::from(2510));
    }

    #[test]
    fn coupon_is_accepted_but_discount_stays_zero() {
        let p = product(1000, None, 5);
        let svc = service(vec![p.clone()]);
        svc.add(p.id, 1).expect("add");

        let view = svc.apply_coupon("WELCOME10").expect("coupon");

        assert_eq!(view.discount, BigDecimal::from(0));
        assert_eq!(view.total, BigDecimal::from(1010));
    }
}
