//! The flat wire record accepted by the calculator.
//!
//! Every field is optional and every field is sanitized on the way in, so
//! deserializing a JSON object into a [`ZakatRequest`] cannot fail on the
//! values it contains. Settings (`zakat_rate`, `nisab_basis`, Nisab weights)
//! take their defaults only when the key is absent; a key that is present
//! but unusable is read as zero like any other number.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::assets::Holdings;
use crate::config::{DEFAULT_NISAB_GOLD_GRAMS, DEFAULT_NISAB_SILVER_GRAMS, DEFAULT_ZAKAT_RATE, ZakatConfig};
use crate::inputs::lenient;
use crate::maal::business::BusinessAssets;
use crate::maal::cash::CashAssets;
use crate::maal::investments::InvestmentAssets;
use crate::maal::liabilities::ShortTermLiabilities;
use crate::maal::precious_metals::MetalHoldings;
use crate::maal::real_estate::RealEstateAssets;
use crate::nisab::NisabStandard;

fn default_zakat_rate() -> Decimal {
    DEFAULT_ZAKAT_RATE
}

fn default_nisab_gold_grams() -> Decimal {
    DEFAULT_NISAB_GOLD_GRAMS
}

fn default_nisab_silver_grams() -> Decimal {
    DEFAULT_NISAB_SILVER_GRAMS
}

/// A person's declared financial position plus calculation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZakatRequest {
    // Settings
    #[serde(default = "default_zakat_rate", deserialize_with = "lenient::decimal")]
    pub zakat_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::nisab_basis")]
    pub nisab_basis: NisabStandard,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gold_price_per_gram: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub silver_price_per_gram: Decimal,
    #[serde(default = "default_nisab_gold_grams", deserialize_with = "lenient::decimal")]
    pub nisab_gold_grams: Decimal,
    #[serde(default = "default_nisab_silver_grams", deserialize_with = "lenient::decimal")]
    pub nisab_silver_grams: Decimal,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub use_metal_weight: bool,

    // Cash
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub cash_on_hand: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub bank_accounts: Decimal,

    // Metals
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gold_grams: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub silver_grams: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gold_value: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub silver_value: Decimal,

    // Investments
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub stocks: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub investments: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub crypto: Decimal,

    // Business
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub business_inventory: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub receivables: Decimal,

    // Land
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub land_value: Decimal,

    // Short-term debts
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub short_term_debts: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub bills_taxes_due: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub business_payables: Decimal,
}

impl Default for ZakatRequest {
    fn default() -> Self {
        ZakatRequest {
            zakat_rate: DEFAULT_ZAKAT_RATE,
            nisab_basis: NisabStandard::default(),
            gold_price_per_gram: Decimal::ZERO,
            silver_price_per_gram: Decimal::ZERO,
            nisab_gold_grams: DEFAULT_NISAB_GOLD_GRAMS,
            nisab_silver_grams: DEFAULT_NISAB_SILVER_GRAMS,
            use_metal_weight: false,
            cash_on_hand: Decimal::ZERO,
            bank_accounts: Decimal::ZERO,
            gold_grams: Decimal::ZERO,
            silver_grams: Decimal::ZERO,
            gold_value: Decimal::ZERO,
            silver_value: Decimal::ZERO,
            stocks: Decimal::ZERO,
            investments: Decimal::ZERO,
            crypto: Decimal::ZERO,
            business_inventory: Decimal::ZERO,
            receivables: Decimal::ZERO,
            land_value: Decimal::ZERO,
            short_term_debts: Decimal::ZERO,
            bills_taxes_due: Decimal::ZERO,
            business_payables: Decimal::ZERO,
        }
    }
}

impl ZakatRequest {
    /// Reads a request from an arbitrary JSON value.
    ///
    /// Anything other than a JSON object is treated as an empty request.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            debug!("request body is not a JSON object; using an empty request");
            return Self::default();
        }
        // Field values are sanitized, so only a non-object could fail here.
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            debug!(%e, "request could not be read; using an empty request");
            Self::default()
        })
    }

    /// Reads a request, filling any absent settings key from `config`.
    ///
    /// Keys present in the request always win, even when their value is unusable.
    pub fn from_value_with_config(value: &Value, config: &ZakatConfig) -> Self {
        let mut object = match value {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let defaults = [
            ("zakat_rate", Value::String(config.zakat_rate.to_string())),
            ("nisab_basis", Value::String(config.nisab_standard.to_string())),
            ("gold_price_per_gram", Value::String(config.gold_price_per_gram.to_string())),
            ("silver_price_per_gram", Value::String(config.silver_price_per_gram.to_string())),
            ("nisab_gold_grams", Value::String(config.nisab_gold_grams.to_string())),
            ("nisab_silver_grams", Value::String(config.nisab_silver_grams.to_string())),
        ];
        for (key, default) in defaults {
            object.entry(key).or_insert(default);
        }

        Self::from_value(&Value::Object(object))
    }

    /// The settings half of the request.
    pub fn config(&self) -> ZakatConfig {
        ZakatConfig {
            zakat_rate: self.zakat_rate,
            nisab_standard: self.nisab_basis,
            gold_price_per_gram: self.gold_price_per_gram,
            silver_price_per_gram: self.silver_price_per_gram,
            nisab_gold_grams: self.nisab_gold_grams,
            nisab_silver_grams: self.nisab_silver_grams,
        }
    }

    /// The holdings half of the request.
    ///
    /// `use_metal_weight` picks which pair of metal fields is kept; the other
    /// pair is dropped here and cannot influence the result.
    pub fn holdings(&self) -> Holdings {
        let metals = if self.use_metal_weight {
            MetalHoldings::ByWeight {
                gold_grams: self.gold_grams,
                silver_grams: self.silver_grams,
            }
        } else {
            MetalHoldings::ByValue {
                gold_value: self.gold_value,
                silver_value: self.silver_value,
            }
        };

        Holdings {
            cash: CashAssets {
                cash_on_hand: self.cash_on_hand,
                bank_accounts: self.bank_accounts,
            },
            metals,
            investments: InvestmentAssets {
                stocks: self.stocks,
                investments: self.investments,
                crypto: self.crypto,
            },
            business: BusinessAssets {
                business_inventory: self.business_inventory,
                receivables: self.receivables,
            },
            real_estate: RealEstateAssets {
                land_value: self.land_value,
            },
            liabilities: ShortTermLiabilities {
                short_term_debts: self.short_term_debts,
                bills_taxes_due: self.bills_taxes_due,
                business_payables: self.business_payables,
            },
        }
    }

    pub fn into_parts(self) -> (ZakatConfig, Holdings) {
        (self.config(), self.holdings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_absent_settings_take_defaults() {
        let request = ZakatRequest::from_value(&json!({}));
        assert_eq!(request, ZakatRequest::default());
        assert_eq!(request.zakat_rate, dec!(0.025));
        assert_eq!(request.nisab_gold_grams, dec!(85));
        assert_eq!(request.nisab_silver_grams, dec!(595));
        assert_eq!(request.nisab_basis, NisabStandard::Gold);
    }

    #[test]
    fn test_present_but_malformed_settings_are_zero() {
        let request = ZakatRequest::from_value(&json!({
            "zakat_rate": "two percent",
            "nisab_gold_grams": null,
            "nisab_basis": null,
        }));
        assert_eq!(request.zakat_rate, Decimal::ZERO);
        assert_eq!(request.nisab_gold_grams, Decimal::ZERO);
        assert_eq!(request.nisab_basis, NisabStandard::Silver);
    }

    #[test]
    fn test_non_object_body_is_empty_request() {
        assert_eq!(ZakatRequest::from_value(&json!(null)), ZakatRequest::default());
        assert_eq!(ZakatRequest::from_value(&json!([5000, 1])), ZakatRequest::default());
        assert_eq!(ZakatRequest::from_value(&json!("cash")), ZakatRequest::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let request = ZakatRequest::from_value(&json!({ "cash_on_hand": 10, "mortgage": 250000 }));
        assert_eq!(request.cash_on_hand, dec!(10));
    }

    #[test]
    fn test_metal_mode_selects_one_pair() {
        let body = json!({
            "gold_grams": 10, "silver_grams": 20,
            "gold_value": 999, "silver_value": 111,
        });

        let by_value = ZakatRequest::from_value(&body).holdings();
        assert_eq!(by_value.metals, MetalHoldings::ByValue { gold_value: dec!(999), silver_value: dec!(111) });

        let mut weighted = body.clone();
        weighted["use_metal_weight"] = json!(true);
        let by_weight = ZakatRequest::from_value(&weighted).holdings();
        assert_eq!(by_weight.metals, MetalHoldings::ByWeight { gold_grams: dec!(10), silver_grams: dec!(20) });
    }

    #[test]
    fn test_config_fills_only_absent_keys() {
        let config = ZakatConfig {
            gold_price_per_gram: dec!(60),
            silver_price_per_gram: dec!(0.70),
            nisab_standard: NisabStandard::Silver,
            ..Default::default()
        };
        let request = ZakatRequest::from_value_with_config(
            &json!({ "gold_price_per_gram": 75, "silver_price_per_gram": "bad" }),
            &config,
        );
        assert_eq!(request.gold_price_per_gram, dec!(75));
        assert_eq!(request.silver_price_per_gram, Decimal::ZERO);
        assert_eq!(request.nisab_basis, NisabStandard::Silver);
        assert_eq!(request.zakat_rate, dec!(0.025));
    }

    #[test]
    fn test_round_trips_through_json() {
        let request = ZakatRequest::from_value(&json!({
            "cash_on_hand": "1500.50", "use_metal_weight": true, "gold_grams": 12, "nisab_basis": "silver",
        }));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(ZakatRequest::from_value(&json), request);
    }
}
