pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use actix_web::web;

use crate::domain::errors::DomainError;

/// Runs a blocking service call on the blocking thread pool. The result stays
/// a `DomainError` so callers can either `?` it into an `AppError` or feed it
/// to the landing-page fallback.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| DomainError::Internal(format!("blocking task failed: {}", e)))?
}
