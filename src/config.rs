use std::env;
use std::fmt::Display;
use std::str::FromStr;

use bigdecimal::BigDecimal;

/// Runtime configuration, read once at startup from the environment.
///
/// `DATABASE_URL` is the only mandatory variable; everything else falls back
/// to the defaults the storefront was observed to run with.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared admin password. `None` when not configured, which turns every
    /// admin login attempt into a server-side configuration error.
    pub admin_password: Option<String>,
    /// Flat shipping fee applied to any non-empty cart.
    pub shipping_fee: BigDecimal,
    /// Upper bound of the price-range filter.
    pub price_ceiling: BigDecimal,
    /// Timeout for each parallel landing-page fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Directory holding the JSON key-value blobs (cart, session, wishlist).
    pub data_dir: String,
    /// Directory uploaded images are written to.
    pub media_dir: String,
    /// Public URL prefix under which `media_dir` is served.
    pub media_base_url: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", "8080"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            shipping_fee: parse_var("SHIPPING_FEE", "10"),
            price_ceiling: parse_var("PRICE_CEILING", "50000"),
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS", "10"),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            media_dir: env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".to_string()),
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "/media".to_string()),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default {}", key, default);
        default.to_string()
    });
    match raw.parse() {
        Ok(value) => value,
        Err(e) => panic!("{} must be a valid value: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_uses_default_when_unset() {
        let port: u16 = parse_var("STOREFRONT_TEST_UNSET_PORT", "8080");
        assert_eq!(port, 8080);
    }

    #[test]
    fn parse_var_reads_decimal_defaults() {
        let fee: BigDecimal = parse_var("STOREFRONT_TEST_UNSET_FEE", "10");
        assert_eq!(fee, BigDecimal::from(10));
    }
}
