use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::str::FromStr;

use crate::inputs::IntoZakatDecimal;
use crate::nisab::NisabStandard;
use crate::types::ZakatError;

/// Canonical Zakat rate of 2.5%.
pub const DEFAULT_ZAKAT_RATE: Decimal = dec!(0.025);
/// Gold Nisab weight in grams.
pub const DEFAULT_NISAB_GOLD_GRAMS: Decimal = dec!(85);
/// Silver Nisab weight in grams.
pub const DEFAULT_NISAB_SILVER_GRAMS: Decimal = dec!(595);

/// Settings that drive a calculation: rate, Nisab basis, metal prices and
/// Nisab weights.
///
/// A config built from a request is never validated, since the calculator must
/// accept anything. Configs coming from the operator (environment, file,
/// builder) go through [`ZakatConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatConfig {
    pub zakat_rate: Decimal,
    pub nisab_standard: NisabStandard,
    pub gold_price_per_gram: Decimal,
    pub silver_price_per_gram: Decimal,
    pub nisab_gold_grams: Decimal,
    pub nisab_silver_grams: Decimal,
}

impl Default for ZakatConfig {
    fn default() -> Self {
        ZakatConfig {
            zakat_rate: DEFAULT_ZAKAT_RATE,
            nisab_standard: NisabStandard::default(),
            gold_price_per_gram: Decimal::ZERO,
            silver_price_per_gram: Decimal::ZERO,
            nisab_gold_grams: DEFAULT_NISAB_GOLD_GRAMS,
            nisab_silver_grams: DEFAULT_NISAB_SILVER_GRAMS,
        }
    }
}

impl FromStr for ZakatConfig {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: ZakatConfig = serde_json::from_str(s)
            .map_err(|e| ZakatError::Configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl ZakatConfig {
    pub fn builder() -> ZakatConfigBuilder {
        ZakatConfigBuilder::default()
    }

    /// Creates a validated config with the given prices and every other setting at its default.
    pub fn new(gold_price: impl IntoZakatDecimal, silver_price: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        Self::builder()
            .gold_price(gold_price)
            .silver_price(silver_price)
            .build()
    }

    /// Validates the configuration for logical consistency and safety.
    pub fn validate(&self) -> Result<(), ZakatError> {
        if self.zakat_rate < Decimal::ZERO || self.zakat_rate > Decimal::ONE {
            return Err(ZakatError::Configuration("Zakat rate must be between 0 and 1".to_string()));
        }
        if self.gold_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::Configuration("Gold price must be non-negative".to_string()));
        }
        if self.silver_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::Configuration("Silver price must be non-negative".to_string()));
        }
        if self.nisab_gold_grams < Decimal::ZERO || self.nisab_silver_grams < Decimal::ZERO {
            return Err(ZakatError::Configuration("Nisab weights must be non-negative".to_string()));
        }

        match self.nisab_standard {
            NisabStandard::Gold if self.gold_price_per_gram.is_zero() => {
                return Err(ZakatError::MissingConfig { field: "gold_price_per_gram".to_string() });
            }
            NisabStandard::Silver if self.silver_price_per_gram.is_zero() => {
                return Err(ZakatError::MissingConfig { field: "silver_price_per_gram".to_string() });
            }
            _ => {}
        }

        Ok(())
    }

    /// Loads configuration from environment variables.
    ///
    /// `ZAKAT_GOLD_PRICE` and `ZAKAT_SILVER_PRICE` are required;
    /// `ZAKAT_RATE` and `ZAKAT_NISAB_BASIS` are optional.
    pub fn from_env() -> Result<Self, ZakatError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ZakatError> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ZakatError::MissingConfig { field: key.to_string() })
        };

        let mut builder = Self::builder()
            .gold_price(required("ZAKAT_GOLD_PRICE")?)
            .silver_price(required("ZAKAT_SILVER_PRICE")?);

        if let Some(rate) = lookup("ZAKAT_RATE") {
            builder = builder.zakat_rate(rate);
        }
        if let Some(basis) = lookup("ZAKAT_NISAB_BASIS") {
            let standard = NisabStandard::from_str(basis.trim())
                .map_err(|_| ZakatError::Configuration(format!("Unknown Nisab basis: {}", basis)))?;
            builder = builder.nisab_standard(standard);
        }

        builder.build()
    }

    /// Loads configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, ZakatError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ZakatError::Configuration(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    /// Creates a ZakatConfig from an async PriceProvider.
    #[cfg(feature = "async")]
    pub async fn from_provider<P: crate::pricing::PriceProvider>(provider: &P) -> Result<Self, ZakatError> {
        let prices = provider.get_prices().await?;
        Self::new(prices.gold_per_gram, prices.silver_per_gram)
    }

    /// Refreshes the prices in this configuration using the given provider.
    #[cfg(feature = "async")]
    pub async fn refresh_prices(&mut self, provider: &impl crate::pricing::PriceProvider) -> Result<(), ZakatError> {
        let prices = provider.get_prices().await?;
        self.gold_price_per_gram = prices.gold_per_gram;
        self.silver_price_per_gram = prices.silver_per_gram;
        self.validate()
    }

    // ========== Fluent Helper Methods ==========

    pub fn with_prices(mut self, prices: &crate::pricing::Prices) -> Self {
        self.gold_price_per_gram = prices.gold_per_gram;
        self.silver_price_per_gram = prices.silver_per_gram;
        self
    }

    pub fn with_nisab_standard(mut self, standard: NisabStandard) -> Self {
        self.nisab_standard = standard;
        self
    }

    /// Nisab threshold in money for the selected standard.
    ///
    /// Zero when the governing price or weight is zero.
    pub fn nisab_threshold(&self) -> Decimal {
        match self.nisab_standard {
            NisabStandard::Gold => self.gold_price_per_gram.saturating_mul(self.nisab_gold_grams),
            NisabStandard::Silver => self.silver_price_per_gram.saturating_mul(self.nisab_silver_grams),
        }
    }
}

// ========== ZakatConfigBuilder ==========

/// Validating builder for operator-supplied configuration.
///
/// The first value that fails to convert is remembered and reported by
/// [`build`](ZakatConfigBuilder::build).
#[derive(Debug, Default)]
pub struct ZakatConfigBuilder {
    config: ZakatConfig,
    error: Option<ZakatError>,
}

impl ZakatConfigBuilder {
    fn set(mut self, field: &str, value: impl IntoZakatDecimal, apply: impl FnOnce(&mut ZakatConfig, Decimal)) -> Self {
        match value.into_zakat_decimal() {
            Ok(v) => apply(&mut self.config, v),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e.for_field(field));
                }
            }
        }
        self
    }

    pub fn zakat_rate(self, rate: impl IntoZakatDecimal) -> Self {
        self.set("zakat_rate", rate, |c, v| c.zakat_rate = v)
    }

    pub fn gold_price(self, price: impl IntoZakatDecimal) -> Self {
        self.set("gold_price_per_gram", price, |c, v| c.gold_price_per_gram = v)
    }

    pub fn silver_price(self, price: impl IntoZakatDecimal) -> Self {
        self.set("silver_price_per_gram", price, |c, v| c.silver_price_per_gram = v)
    }

    pub fn nisab_gold(self, grams: impl IntoZakatDecimal) -> Self {
        self.set("nisab_gold_grams", grams, |c, v| c.nisab_gold_grams = v)
    }

    pub fn nisab_silver(self, grams: impl IntoZakatDecimal) -> Self {
        self.set("nisab_silver_grams", grams, |c, v| c.nisab_silver_grams = v)
    }

    pub fn nisab_standard(mut self, standard: NisabStandard) -> Self {
        self.config.nisab_standard = standard;
        self
    }

    pub fn build(self) -> Result<ZakatConfig, ZakatError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ZakatConfig::default();
        assert_eq!(config.zakat_rate, dec!(0.025));
        assert_eq!(config.nisab_standard, NisabStandard::Gold);
        assert_eq!(config.nisab_gold_grams, dec!(85));
        assert_eq!(config.nisab_silver_grams, dec!(595));
        assert_eq!(config.nisab_threshold(), Decimal::ZERO);
    }

    #[test]
    fn test_nisab_threshold_per_standard() {
        let config = ZakatConfig::new(60, 0.7).unwrap();
        assert_eq!(config.nisab_threshold(), dec!(5100));

        let silver = config.with_nisab_standard(NisabStandard::Silver);
        assert_eq!(silver.nisab_threshold(), dec!(416.5));
    }

    #[test]
    fn test_builder_validation() {
        let res = ZakatConfig::builder()
            .gold_price(100)
            .silver_price(2)
            .nisab_standard(NisabStandard::Silver)
            .build();
        assert!(res.is_ok());

        let missing_silver = ZakatConfig::builder()
            .gold_price(100)
            .nisab_standard(NisabStandard::Silver)
            .build();
        assert_eq!(
            missing_silver.unwrap_err(),
            ZakatError::MissingConfig { field: "silver_price_per_gram".to_string() }
        );

        assert!(ZakatConfig::builder().gold_price(-1).build().is_err());
        assert!(ZakatConfig::builder().gold_price(60).zakat_rate(2).build().is_err());
    }

    #[test]
    fn test_builder_reports_first_bad_value() {
        let err = ZakatConfig::builder()
            .gold_price("sixty")
            .silver_price("abc")
            .build()
            .unwrap_err();
        assert!(matches!(err, ZakatError::InvalidInput { ref field, .. } if field == "gold_price_per_gram"));
    }

    #[test]
    fn test_from_lookup() {
        let vars = HashMap::from([
            ("ZAKAT_GOLD_PRICE", "65.5"),
            ("ZAKAT_SILVER_PRICE", "0.8"),
            ("ZAKAT_NISAB_BASIS", "Silver"),
        ]);
        let config = ZakatConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.gold_price_per_gram, dec!(65.5));
        assert_eq!(config.nisab_standard, NisabStandard::Silver);
        assert_eq!(config.zakat_rate, DEFAULT_ZAKAT_RATE);
    }

    #[test]
    fn test_from_lookup_requires_prices() {
        let err = ZakatConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ZakatError::MissingConfig { field: "ZAKAT_GOLD_PRICE".to_string() });
    }

    #[test]
    fn test_from_json_str() {
        let config: ZakatConfig = r#"{ "gold_price_per_gram": "70", "silver_price_per_gram": "0.9" }"#
            .parse()
            .unwrap();
        assert_eq!(config.gold_price_per_gram, dec!(70));
        assert_eq!(config.nisab_gold_grams, dec!(85));

        assert!("not json".parse::<ZakatConfig>().is_err());
    }
}
