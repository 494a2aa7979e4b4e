use uuid::Uuid;

use crate::domain::catalog::{filter_products, sort_products, Animal, FilterConfig, Product, SortKey};
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;

/// The browse pipeline: fetch a category snapshot from the store, then run
/// the pure filter and sort stages over it in memory.
pub struct CatalogService<P> {
    products: P,
}

impl<P: ProductRepository> CatalogService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Global search across every animal category. A failed read degrades to
    /// the empty list with a logged diagnostic; browsing never crashes.
    pub fn search(&self, filter: &FilterConfig, sort: SortKey) -> Result<Vec<Product>, DomainError> {
        let snapshot = self.products.list().unwrap_or_else(|e| {
            log::warn!("product fetch failed, rendering empty: {}", e);
            Vec::new()
        });
        let mut result = filter_products(snapshot, filter);
        sort_products(&mut result, sort);
        Ok(result)
    }

    /// Browse one animal category. Same read degradation as [`Self::search`].
    pub fn browse(
        &self,
        animal: Animal,
        filter: &FilterConfig,
        sort: SortKey,
    ) -> Result<Vec<Product>, DomainError> {
        let snapshot = self.products.list_by_animal(animal).unwrap_or_else(|e| {
            log::warn!("product fetch failed, rendering empty: {}", e);
            Vec::new()
        });
        let mut result = filter_products(snapshot, filter);
        sort_products(&mut result, sort);
        Ok(result)
    }

    /// Product detail. A missing product is a distinct not-found state, not a
    /// generic fetch failure.
    pub fn product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.products.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    // Landing-page section fetches; each one runs independently so the page
    // assembly can race them against its timeout.

    pub fn types(&self, animal: Animal) -> Result<Vec<String>, DomainError> {
        self.products.list_types(animal)
    }

    pub fn brands(&self, animal: Animal) -> Result<Vec<String>, DomainError> {
        self.products.list_brands(animal)
    }

    pub fn featured(&self, animal: Animal, limit: i64) -> Result<Vec<Product>, DomainError> {
        self.products.list_featured(animal, limit)
    }

    pub fn page(
        &self,
        animal: Animal,
        page: i64,
        page_size: i64,
    ) -> Result<crate::domain::catalog::ProductPage, DomainError> {
        self.products.page_by_animal(animal, page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;

    struct FixedProducts(Vec<Product>);

    impl ProductRepository for FixedProducts {
        fn list(&self) -> Result<Vec<Product>, DomainError> {
            Ok(self.0.clone())
        }
        fn list_by_animal(&self, animal: Animal) -> Result<Vec<Product>, DomainError> {
            Ok(self
                .0
                .iter()
                .filter(|p| p.animal == animal.as_str())
                .cloned()
                .collect())
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
        ) -> Result<crate::domain::catalog::ProductPage, DomainError> {
            Ok(Default::default())
        }
        fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
            Ok(self.0.iter().find(|p| p.id == id).cloned())
        }
        fn insert(
            &self,
            _input: crate::domain::catalog::ProductInput,
        ) -> Result<Uuid, DomainError> {
            unimplemented!("not exercised")
        }
        fn update(
            &self,
            _id: Uuid,
            _input: crate::domain::catalog::ProductInput,
        ) -> Result<(), DomainError> {
            unimplemented!("not exercised")
        }
        fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
            unimplemented!("not exercised")
        }
    }

    fn product(animal: &str, price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Jouet".to_string(),
            description: String::new(),
            price: BigDecimal::from(price),
            promo_price: None,
            reduction: None,
            image_url: None,
            animal: animal.to_string(),
            product_type: "Accessoires".to_string(),
            subtype: None,
            brand: "Trixie".to_string(),
            stock: 1,
            out_of_stock: false,
            featured: false,
            created_at: Utc::now(),
        }
    }

    fn any_filter() -> FilterConfig {
        FilterConfig::any(BigDecimal::from(50000))
    }

    #[test]
    fn browse_only_sees_the_requested_category() {
        let svc = CatalogService::new(FixedProducts(vec![
            product("cats", 100),
            product("dogs", 200),
            product("cats", 300),
        ]));

        let result = svc
            .browse(Animal::Cats, &any_filter(), SortKey::PriceLow)
            .expect("browse");

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.animal == "cats"));
    }

    #[test]
    fn search_spans_every_category_and_sorts() {
        let svc = CatalogService::new(FixedProducts(vec![
            product("cats", 300),
            product("dogs", 100),
            product("birds", 200),
        ]));

        let result = svc.search(&any_filter(), SortKey::PriceLow).expect("search");

        assert_eq!(result.len(), 3);
        let prices: Vec<BigDecimal> = result.iter().map(|p| p.price.clone()).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_product_is_not_found() {
        let svc = CatalogService::new(FixedProducts(vec![]));
        assert!(matches!(
            svc.product(Uuid::new_v4()),
            Err(DomainError::NotFound)
        ));
    }
}
