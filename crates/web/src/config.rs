//! Build-time configuration.

use rusty_money::iso::{self, Currency};
use storefront::catalog::http::DEFAULT_CATALOG_URL;

const CATALOG_URL: &str = match option_env!("STOREFRONT_API_URL") {
    Some(url) => url,
    None => DEFAULT_CATALOG_URL,
};

const CURRENCY_CODE: &str = match option_env!("STOREFRONT_CURRENCY") {
    Some(code) => code,
    None => "INR",
};

const LOG_LEVEL: &str = match option_env!("STOREFRONT_LOG") {
    Some(level) => level,
    None => "info",
};

/// Web app configuration, baked in when the bundle is built.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// Catalog API base URL
    pub catalog_url: &'static str,

    /// Display currency for prices
    pub currency: &'static Currency,

    /// Tracing filter directive
    pub log_level: &'static str,
}

impl AppConfig {
    /// Resolve the compiled-in settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency code is not an ISO 4217 code.
    pub fn load() -> Result<Self, String> {
        Self::resolve(CATALOG_URL, CURRENCY_CODE, LOG_LEVEL)
    }

    fn resolve(
        catalog_url: &'static str,
        currency_code: &str,
        log_level: &'static str,
    ) -> Result<Self, String> {
        let currency = iso::find(currency_code)
            .ok_or_else(|| format!("Unknown display currency: {currency_code}"))?;

        Ok(Self {
            catalog_url,
            currency,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_currency() -> Result<(), String> {
        let config = AppConfig::resolve(DEFAULT_CATALOG_URL, "USD", "debug")?;

        assert_eq!(config.currency, iso::USD);
        assert_eq!(config.catalog_url, "https://fakestoreapi.com");

        Ok(())
    }

    #[test]
    fn rejects_unknown_currency() {
        assert!(AppConfig::resolve(DEFAULT_CATALOG_URL, "XYZ", "info").is_err());
    }
}
