use rust_decimal::Decimal;

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;
use crate::traits::ZakatableAsset;

zakat_category! {
    /// Market-valued holdings: shares, funds and crypto-assets.
    pub struct InvestmentAssets {
        stocks,
        /// Funds, bonds and other investment products.
        investments,
        crypto,
    }
}

impl ZakatableAsset for InvestmentAssets {
    fn category(&self) -> AssetCategory {
        AssetCategory::Investments
    }

    fn total_value(&self, _config: &ZakatConfig) -> Decimal {
        self.sum()
    }
}
