use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::domain::catalog::{Product, ProductPage};
use crate::domain::errors::DomainError;

use super::resilience::fetch_or_default;

/// The store-backed sections of an animal landing page.
#[derive(Debug, Clone, Serialize)]
pub struct LandingSections {
    pub types: Vec<String>,
    pub brands: Vec<String>,
    pub featured: Vec<Product>,
    pub products: ProductPage,
}

/// Assembles a landing page from four independent fetches, run in parallel,
/// each under the same fixed timeout. A slow or failing section falls back to
/// its default while the others render their fetched data.
pub async fn assemble<FT, FB, FF, FP>(
    types: FT,
    brands: FB,
    featured: FF,
    products: FP,
    wait: Duration,
) -> LandingSections
where
    FT: Future<Output = Result<Vec<String>, DomainError>>,
    FB: Future<Output = Result<Vec<String>, DomainError>>,
    FF: Future<Output = Result<Vec<Product>, DomainError>>,
    FP: Future<Output = Result<ProductPage, DomainError>>,
{
    let (types, brands, featured, products) = tokio::join!(
        fetch_or_default("types", types, wait, Vec::new()),
        fetch_or_default("brands", brands, wait, Vec::new()),
        fetch_or_default("featured", featured, wait, Vec::new()),
        fetch_or_default("products", products, wait, ProductPage::default()),
    );
    LandingSections {
        types,
        brands,
        featured,
        products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_types() -> Result<Vec<String>, DomainError> {
        Ok(vec!["Alimentaire".to_string()])
    }

    fn ok_brands() -> Result<Vec<String>, DomainError> {
        Ok(vec!["Purina".to_string(), "Trixie".to_string()])
    }

    #[tokio::test]
    async fn one_timed_out_section_defaults_while_the_rest_render() {
        let sections = assemble(
            async { ok_types() },
            async { ok_brands() },
            async {
                // Featured never responds within the window.
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(vec![])
            },
            async { Ok(ProductPage::default()) },
            Duration::from_millis(20),
        )
        .await;

        assert_eq!(sections.types, vec!["Alimentaire"]);
        assert_eq!(sections.brands.len(), 2);
        assert!(sections.featured.is_empty(), "timed-out section defaults");
        assert_eq!(sections.products.page, 1);
        assert_eq!(sections.products.total_pages, 0);
    }

    #[tokio::test]
    async fn a_failing_section_never_fails_the_page() {
        let sections = assemble(
            async { Err(DomainError::Internal("store down".to_string())) },
            async { ok_brands() },
            async { Ok(vec![]) },
            async { Err(DomainError::Internal("store down".to_string())) },
            Duration::from_millis(200),
        )
        .await;

        assert!(sections.types.is_empty());
        assert_eq!(sections.brands.len(), 2);
        assert_eq!(sections.products.total, 0);
    }
}
