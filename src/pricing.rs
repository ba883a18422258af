//! Metal prices for the Nisab threshold.
//!
//! The calculator never fetches prices itself. Callers obtain [`Prices`] from
//! a [`PriceProvider`] (static values, a cache, a live feed) and put them into
//! a [`ZakatConfig`](crate::config::ZakatConfig) with
//! [`with_prices`](crate::config::ZakatConfig::with_prices).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "async")]
use std::sync::{Arc, RwLock};
#[cfg(feature = "async")]
use std::time::{Duration, Instant};

use crate::inputs::IntoZakatDecimal;
use crate::types::ZakatError;

/// Gold price used when no live price is available, per gram.
pub const FALLBACK_GOLD_PRICE_PER_GRAM: Decimal = dec!(60.00);
/// Silver price used when no live price is available, per gram.
pub const FALLBACK_SILVER_PRICE_PER_GRAM: Decimal = dec!(0.70);

/// Current market prices for the Nisab metals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    /// Gold price per gram in local currency.
    pub gold_per_gram: Decimal,
    /// Silver price per gram in local currency.
    pub silver_per_gram: Decimal,
}

impl Prices {
    /// Creates a new Prices instance. Negative prices are rejected.
    pub fn new(
        gold_per_gram: impl IntoZakatDecimal,
        silver_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        let gold = gold_per_gram.into_zakat_decimal().map_err(|e| e.for_field("gold_per_gram"))?;
        let silver = silver_per_gram.into_zakat_decimal().map_err(|e| e.for_field("silver_per_gram"))?;

        if gold < Decimal::ZERO {
            return Err(ZakatError::invalid_input("gold_per_gram", "price must be non-negative"));
        }
        if silver < Decimal::ZERO {
            return Err(ZakatError::invalid_input("silver_per_gram", "price must be non-negative"));
        }

        Ok(Self {
            gold_per_gram: gold,
            silver_per_gram: silver,
        })
    }

    /// The built-in fallback prices.
    pub fn fallback() -> Self {
        Self {
            gold_per_gram: FALLBACK_GOLD_PRICE_PER_GRAM,
            silver_per_gram: FALLBACK_SILVER_PRICE_PER_GRAM,
        }
    }
}

/// Source of current metal prices.
///
/// Implementors can fetch prices from static values, a cache, or a REST API.
///
/// # Example
/// ```ignore
/// use zakat_engine::pricing::{PriceProvider, StaticPriceProvider};
///
/// let provider = StaticPriceProvider::new(65.0, 0.85)?;
/// let prices = provider.get_prices().await?;
/// ```
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    async fn get_prices(&self) -> Result<Prices, ZakatError>;
}

/// A fixed set of prices, for tests and for operator-supplied values.
#[derive(Debug, Clone)]
pub struct StaticPriceProvider {
    prices: Prices,
}

impl StaticPriceProvider {
    pub fn new(
        gold_per_gram: impl IntoZakatDecimal,
        silver_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        Ok(Self {
            prices: Prices::new(gold_per_gram, silver_per_gram)?,
        })
    }

    pub fn from_prices(prices: Prices) -> Self {
        Self { prices }
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl PriceProvider for StaticPriceProvider {
    async fn get_prices(&self) -> Result<Prices, ZakatError> {
        Ok(self.prices.clone())
    }
}

/// A decorator that reuses fetched prices until the TTL expires.
#[cfg(feature = "async")]
pub struct CachedPriceProvider<P> {
    inner: P,
    cache: Arc<RwLock<Option<(Instant, Prices)>>>,
    ttl: Duration,
}

#[cfg(feature = "async")]
impl<P> CachedPriceProvider<P> {
    pub fn new(inner: P, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(None)),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Drops the cached prices so the next call fetches again.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<P: PriceProvider> PriceProvider for CachedPriceProvider<P> {
    async fn get_prices(&self) -> Result<Prices, ZakatError> {
        if let Ok(guard) = self.cache.read() {
            if let Some((timestamp, prices)) = &*guard {
                if timestamp.elapsed() < self.ttl {
                    return Ok(prices.clone());
                }
            }
        }

        let new_prices = self.inner.get_prices().await?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some((Instant::now(), new_prices.clone()));
        }

        Ok(new_prices)
    }
}

/// A decorator that never fails.
///
/// If the inner provider errors, the fallback prices are returned. If it
/// succeeds but reports a zero price for a metal, only that metal is replaced.
#[cfg(feature = "async")]
pub struct BestEffortPriceProvider<P> {
    inner: P,
    fallback: Prices,
}

#[cfg(feature = "async")]
impl<P> BestEffortPriceProvider<P> {
    /// Wraps `inner` with the built-in fallback prices.
    pub fn new(inner: P) -> Self {
        Self::with_fallback(inner, Prices::fallback())
    }

    pub fn with_fallback(inner: P, fallback: Prices) -> Self {
        Self { inner, fallback }
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<P: PriceProvider> PriceProvider for BestEffortPriceProvider<P> {
    async fn get_prices(&self) -> Result<Prices, ZakatError> {
        let mut prices = match self.inner.get_prices().await {
            Ok(prices) => prices,
            Err(e) => {
                tracing::warn!(error = %e, "price feed unavailable; using fallback prices");
                return Ok(self.fallback.clone());
            }
        };

        if prices.gold_per_gram <= Decimal::ZERO {
            tracing::warn!(fallback = %self.fallback.gold_per_gram, "no gold price from feed; using fallback");
            prices.gold_per_gram = self.fallback.gold_per_gram;
        }
        if prices.silver_per_gram <= Decimal::ZERO {
            tracing::warn!(fallback = %self.fallback.silver_per_gram, "no silver price from feed; using fallback");
            prices.silver_per_gram = self.fallback.silver_per_gram;
        }

        Ok(prices)
    }
}

/// Network configuration for live price providers.
#[cfg(feature = "live-pricing")]
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout_seconds: u64,
}

#[cfg(feature = "live-pricing")]
impl Default for NetworkConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

#[cfg(feature = "live-pricing")]
pub const GOLDAPI_BASE_URL: &str = "https://www.goldapi.io/api";

#[cfg(feature = "live-pricing")]
#[derive(Deserialize)]
struct GoldApiQuote {
    price_gram_24k: Option<f64>,
}

/// Live prices from goldapi.io, one request per metal.
#[cfg(feature = "live-pricing")]
pub struct GoldApiPriceProvider {
    client: reqwest::Client,
    api_key: String,
    currency: String,
    base_url: String,
}

#[cfg(feature = "live-pricing")]
impl GoldApiPriceProvider {
    /// Creates a provider quoting in EUR.
    pub fn new(api_key: impl Into<String>, config: &NetworkConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            currency: "EUR".to_string(),
            base_url: GOLDAPI_BASE_URL.to_string(),
        }
    }

    /// ISO 4217 code the prices are quoted in.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_uppercase();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn price_per_gram(&self, symbol: &str) -> Result<Decimal, ZakatError> {
        let url = format!("{}/{}/{}", self.base_url, symbol, self.currency);
        tracing::debug!(%url, "fetching metal price");

        let response = self.client.get(&url)
            .header("x-access-token", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ZakatError::Network(format!("goldapi.io request for {} failed: {}", symbol, e)))?
            .error_for_status()
            .map_err(|e| ZakatError::Network(format!("goldapi.io rejected {} request: {}", symbol, e)))?;

        let quote: GoldApiQuote = response.json()
            .await
            .map_err(|e| ZakatError::Network(format!("Failed to parse goldapi.io response: {}", e)))?;

        let price = quote.price_gram_24k
            .ok_or_else(|| ZakatError::Network(format!("goldapi.io response for {} has no price_gram_24k", symbol)))?;

        price.into_zakat_decimal().map_err(|e| e.for_field("price_gram_24k"))
    }
}

#[cfg(feature = "live-pricing")]
#[async_trait::async_trait]
impl PriceProvider for GoldApiPriceProvider {
    async fn get_prices(&self) -> Result<Prices, ZakatError> {
        let gold = self.price_per_gram("XAU").await?;
        let silver = self.price_per_gram("XAG").await?;
        Prices::new(gold, silver)
    }
}



#[cfg(all(test, feature = "live-pricing"))]
mod live_tests {
    use super::*;

    #[tokio::test]
    #[ignore] // needs GOLDAPI_KEY and network access
    async fn test_goldapi_live() {
        let key = std::env::var("GOLDAPI_KEY").unwrap_or_default();
        let provider = GoldApiPriceProvider::new(key, &NetworkConfig::default());
        let prices = provider.get_prices().await.expect("Failed to fetch live prices");

        assert!(prices.gold_per_gram > Decimal::ZERO);
        assert!(prices.silver_per_gram > Decimal::ZERO);
    }

    #[test]
    fn test_network_config_defaults() {
        assert_eq!(NetworkConfig::default().timeout_seconds, 10);

        let provider = GoldApiPriceProvider::new("key", &NetworkConfig::default())
            .with_currency("usd")
            .with_base_url("https://example.test/api/");
        assert_eq!(provider.currency, "USD");
        assert_eq!(provider.base_url, "https://example.test/api");
    }

    #[tokio::test]
    async fn test_goldapi_unreachable_is_network_error() {
        let provider = GoldApiPriceProvider::new("key", &NetworkConfig { timeout_seconds: 1 })
            .with_base_url("http://127.0.0.1:9/api/");
        let err = provider.get_prices().await.unwrap_err();
        assert!(matches!(err, ZakatError::Network(_)));
    }
}
