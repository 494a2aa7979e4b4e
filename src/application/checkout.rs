use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderDraft, OrderLineInput, OrderView};
use crate::domain::ports::{keys, read_json, KeyValueStore, OrderRepository};
use crate::domain::user::SessionUser;

#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

/// The order submission stage: snapshots the live cart into an order plus
/// order lines, then clears the ledger — but only once the write succeeded.
pub struct CheckoutService<O> {
    orders: O,
    store: Arc<dyn KeyValueStore>,
    shipping_fee: BigDecimal,
}

impl<O: OrderRepository> CheckoutService<O> {
    pub fn new(orders: O, store: Arc<dyn KeyValueStore>, shipping_fee: BigDecimal) -> Self {
        Self {
            orders,
            store,
            shipping_fee,
        }
    }

    fn session(&self) -> Result<SessionUser, DomainError> {
        read_json(self.store.as_ref(), keys::USER)?.ok_or(DomainError::Unauthenticated)
    }

    /// Places an order from the current cart. Refuses outright without a
    /// logged-in user; an unauthenticated attempt never reaches the store.
    /// The order and its lines are one transaction; on any failure the cart
    /// is left untouched so the user can retry.
    pub fn place_order(&self, input: CheckoutInput) -> Result<Uuid, DomainError> {
        let user = self.session()?;

        let cart: Cart = read_json(self.store.as_ref(), keys::CART)?.unwrap_or_default();
        if cart.is_empty() {
            return Err(DomainError::InvalidInput("cart is empty".to_string()));
        }

        // Total is fixed here, at submission time, and never recomputed.
        let total_price = cart.subtotal() + cart.shipping(&self.shipping_fee);

        let draft = OrderDraft {
            customer_name: input.name,
            customer_email: input.email,
            customer_phone: input.phone,
            address: input.address,
            city: input.city,
            total_price,
            user_id: user.id,
        };
        let lines: Vec<OrderLineInput> = cart
            .lines()
            .iter()
            .map(|line| OrderLineInput {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
            })
            .collect();

        let order_id = self.orders.create(draft, lines)?;

        self.store.remove(keys::CART)?;
        log::info!("order {} placed with {} lines", order_id, cart.line_count());
        Ok(order_id)
    }

    /// The logged-in customer's orders, newest first. The authentication gate
    /// still applies, but a failed read degrades to an empty history.
    pub fn my_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        let user = self.session()?;
        Ok(self.orders.list_by_user(user.id).unwrap_or_else(|e| {
            log::warn!("order fetch failed, rendering empty: {}", e);
            Vec::new()
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::order::OrderStatus;
    use crate::domain::ports::write_json;
    use crate::infrastructure::kv_store::MemoryStore;

    #[derive(Default)]
    struct RecordingOrders {
        fail: bool,
        created: Mutex<Vec<(OrderDraft, Vec<OrderLineInput>)>>,
    }

    impl OrderRepository for RecordingOrders {
        fn create(
            &self,
            draft: OrderDraft,
            lines: Vec<OrderLineInput>,
        ) -> Result<Uuid, DomainError> {
            if self.fail {
                return Err(DomainError::Internal("store write failed".to_string()));
            }
            self.created.lock().unwrap().push((draft, lines));
            Ok(Uuid::new_v4())
        }
        fn find_by_id(&self, _id: Uuid) -> Result<Option<OrderView>, DomainError> {
            Ok(None)
        }
        fn list(&self) -> Result<Vec<OrderView>, DomainError> {
            Ok(Vec::new())
        }
        fn list_by_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
            Ok(self
                .created
                .lock()
                .unwrap()
                .iter()
                .filter(|(d, _)| d.user_id == user_id)
                .map(|(d, lines)| OrderView {
                    id: Uuid::new_v4(),
                    customer_name: d.customer_name.clone(),
                    customer_email: d.customer_email.clone(),
                    customer_phone: d.customer_phone.clone(),
                    address: d.address.clone(),
                    city: d.city.clone(),
                    total_price: d.total_price.clone(),
                    status: OrderStatus::Pending,
                    user_id: d.user_id,
                    created_at: Utc::now(),
                    lines: lines
                        .iter()
                        .map(|l| crate::domain::order::OrderLineView {
                            id: Uuid::new_v4(),
                            product_id: l.product_id,
                            quantity: l.quantity,
                            unit_price: l.unit_price.clone(),
                        })
                        .collect(),
                })
                .collect())
        }
        fn update_status(&self, _id: Uuid, _status: OrderStatus) -> Result<(), DomainError> {
            Ok(())
        }
        fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn product(price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Croquettes".to_string(),
            description: String::new(),
            price: BigDecimal::from(price),
            promo_price: None,
            reduction: None,
            image_url: None,
            animal: "cats".to_string(),
            product_type: "Alimentaire".to_string(),
            subtype: None,
            brand: "Purina".to_string(),
            stock: 10,
            out_of_stock: false,
            featured: false,
            created_at: Utc::now(),
        }
    }

    fn seeded_store(lines: &[(Product, i32)], logged_in: bool) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::default());
        let mut cart = Cart::default();
        for (product, qty) in lines {
            cart.add(product, *qty);
        }
        if !cart.is_empty() {
            write_json(store.as_ref(), keys::CART, &cart).expect("seed cart");
        }
        if logged_in {
            let session = SessionUser {
                id: Uuid::new_v4(),
                email: "jean@example.com".to_string(),
                first_name: "Jean".to_string(),
                last_name: "Dupont".to_string(),
            };
            write_json(store.as_ref(), keys::USER, &session).expect("seed session");
        }
        store
    }

    fn input() -> CheckoutInput {
        CheckoutInput {
            name: "Jean Dupont".to_string(),
            email: "jean@example.com".to_string(),
            phone: "+213 555 0101".to_string(),
            address: "12 rue des Lilas".to_string(),
            city: "Alger".to_string(),
        }
    }

    #[test]
    fn submission_creates_one_order_with_all_lines_and_clears_the_cart() {
        let store = seeded_store(&[(product(1000), 2), (product(500), 1)], true);
        let orders = RecordingOrders::default();
        let svc = CheckoutService::new(orders, store.clone(), BigDecimal::from(10));

        svc.place_order(input()).expect("place order");

        let created = svc.orders.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let (draft, lines) = &created[0];
        assert_eq!(lines.len(), 2);
        assert_eq!(draft.total_price, BigDecimal::from(2510));

        drop(created);
        let cart: Option<Cart> = read_json(store.as_ref(), keys::CART).expect("read cart");
        assert!(cart.is_none(), "cart must be cleared after submission");
    }

    #[test]
    fn unauthenticated_submission_never_reaches_the_store() {
        let store = seeded_store(&[(product(1000), 1)], false);
        let svc = CheckoutService::new(RecordingOrders::default(), store, BigDecimal::from(10));

        let result = svc.place_order(input());

        assert!(matches!(result, Err(DomainError::Unauthenticated)));
        assert!(svc.orders.created.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_write_leaves_the_cart_for_a_retry() {
        let store = seeded_store(&[(product(1000), 1)], true);
        let orders = RecordingOrders {
            fail: true,
            ..Default::default()
        };
        let svc = CheckoutService::new(orders, store.clone(), BigDecimal::from(10));

        let result = svc.place_order(input());
        assert!(matches!(result, Err(DomainError::Internal(_))));

        let cart: Cart = read_json(store.as_ref(), keys::CART)
            .expect("read cart")
            .expect("cart still present");
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn empty_cart_cannot_be_submitted() {
        let store = seeded_store(&[], true);
        let svc = CheckoutService::new(RecordingOrders::default(), store, BigDecimal::from(10));
        assert!(matches!(
            svc.place_order(input()),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn my_orders_requires_a_session() {
        let store = seeded_store(&[], false);
        let svc = CheckoutService::new(RecordingOrders::default(), store, BigDecimal::from(10));
        assert!(matches!(svc.my_orders(), Err(DomainError::Unauthenticated)));
    }
}
