use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;
use crate::inputs::IntoZakatDecimal;
use crate::traits::ZakatableAsset;

/// Gold and silver holdings, declared in exactly one of two ways.
///
/// `ByWeight` values the metal at the configured price per gram.
/// `ByValue` takes a monetary amount the owner already computed and never
/// looks at prices. There is no mixed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MetalHoldings {
    ByWeight {
        gold_grams: Decimal,
        silver_grams: Decimal,
    },
    ByValue {
        gold_value: Decimal,
        silver_value: Decimal,
    },
}

impl Default for MetalHoldings {
    fn default() -> Self {
        MetalHoldings::ByValue {
            gold_value: Decimal::ZERO,
            silver_value: Decimal::ZERO,
        }
    }
}

impl MetalHoldings {
    /// Holdings declared as weights in grams.
    pub fn by_weight(gold_grams: impl IntoZakatDecimal, silver_grams: impl IntoZakatDecimal) -> Self {
        MetalHoldings::ByWeight {
            gold_grams: gold_grams.into_zakat_decimal().unwrap_or(Decimal::ZERO),
            silver_grams: silver_grams.into_zakat_decimal().unwrap_or(Decimal::ZERO),
        }
    }

    /// Holdings declared as monetary values.
    pub fn by_value(gold_value: impl IntoZakatDecimal, silver_value: impl IntoZakatDecimal) -> Self {
        MetalHoldings::ByValue {
            gold_value: gold_value.into_zakat_decimal().unwrap_or(Decimal::ZERO),
            silver_value: silver_value.into_zakat_decimal().unwrap_or(Decimal::ZERO),
        }
    }

    pub fn is_by_weight(&self) -> bool {
        matches!(self, MetalHoldings::ByWeight { .. })
    }

    /// Monetary value of the gold part.
    pub fn gold_value(&self, config: &ZakatConfig) -> Decimal {
        match self {
            MetalHoldings::ByWeight { gold_grams, .. } => gold_grams.saturating_mul(config.gold_price_per_gram),
            MetalHoldings::ByValue { gold_value, .. } => *gold_value,
        }
    }

    /// Monetary value of the silver part.
    pub fn silver_value(&self, config: &ZakatConfig) -> Decimal {
        match self {
            MetalHoldings::ByWeight { silver_grams, .. } => silver_grams.saturating_mul(config.silver_price_per_gram),
            MetalHoldings::ByValue { silver_value, .. } => *silver_value,
        }
    }
}

impl ZakatableAsset for MetalHoldings {
    fn category(&self) -> AssetCategory {
        AssetCategory::PreciousMetals
    }

    fn total_value(&self, config: &ZakatConfig) -> Decimal {
        self.gold_value(config).saturating_add(self.silver_value(config))
    }
}
