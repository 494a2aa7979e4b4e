use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Resolves a fetch to its fallback value when it fails or outruns `wait`.
///
/// This is the read-side degradation policy: a timed-out or failed fetch
/// produces its section's default (usually an empty collection) and a logged
/// diagnostic. The error is never propagated, so a page render can never fail
/// because one of its fetches did.
pub async fn fetch_or_default<T, E, F>(label: &str, fut: F, wait: Duration, fallback: T) -> T
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(wait, fut).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            log::warn!("{} fetch failed, using default: {}", label, e);
            fallback
        }
        Err(_) => {
            log::warn!("{} fetch timed out after {:?}, using default", label, wait);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    #[tokio::test]
    async fn successful_fetch_passes_through() {
        let value = fetch_or_default(
            "types",
            async { Ok::<_, DomainError>(vec![1, 2, 3]) },
            Duration::from_secs(1),
            Vec::new(),
        )
        .await;
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_fetch_yields_the_fallback() {
        let value = fetch_or_default(
            "brands",
            async { Err::<Vec<i32>, _>(DomainError::Internal("down".to_string())) },
            Duration::from_secs(1),
            Vec::new(),
        )
        .await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn timed_out_fetch_yields_the_fallback() {
        let value = fetch_or_default(
            "featured",
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, DomainError>(vec![1])
            },
            Duration::from_millis(10),
            Vec::new(),
        )
        .await;
        assert!(value.is_empty());
    }
}
