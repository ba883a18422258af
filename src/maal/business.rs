use rust_decimal::Decimal;

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;
use crate::traits::ZakatableAsset;

zakat_category! {
    /// Trade goods and money owed to the business.
    ///
    /// Business cash belongs in [`CashAssets`](crate::maal::cash::CashAssets)
    /// and payables in [`ShortTermLiabilities`](crate::maal::liabilities::ShortTermLiabilities).
    pub struct BusinessAssets {
        /// Inventory valued at current market price.
        business_inventory,
        /// Receivables expected to be collected.
        receivables,
    }
}

impl ZakatableAsset for BusinessAssets {
    fn category(&self) -> AssetCategory {
        AssetCategory::Business
    }

    fn total_value(&self, _config: &ZakatConfig) -> Decimal {
        self.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_business_total() {
        let assets = BusinessAssets::new().business_inventory(5000).receivables(250);
        assert_eq!(assets.total_value(&ZakatConfig::default()), dec!(5250));
    }

    #[test]
    fn test_business_total_saturates() {
        let assets = BusinessAssets::new().business_inventory(Decimal::MAX).receivables(Decimal::MAX);
        assert_eq!(assets.total_value(&ZakatConfig::default()), Decimal::MAX);
    }
}
