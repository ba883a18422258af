use rust_decimal::Decimal;

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;
use crate::traits::ZakatableAsset;

zakat_category! {
    /// Liquid money: notes and coins held plus bank balances.
    pub struct CashAssets {
        /// Physical cash held.
        cash_on_hand,
        /// Balances across all bank accounts.
        bank_accounts,
    }
}

impl ZakatableAsset for CashAssets {
    fn category(&self) -> AssetCategory {
        AssetCategory::Cash
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
    fn test_cash_total() {
        let cash = CashAssets::new().cash_on_hand(2000).bank_accounts("3000.50");
        assert_eq!(cash.total_value(&ZakatConfig::default()), dec!(5000.50));
    }

    #[test]
    fn test_unconvertible_setter_input_is_zero() {
        let cash = CashAssets::new().cash_on_hand("lots").bank_accounts(f64::NAN);
        assert_eq!(cash.total_value(&ZakatConfig::default()), Decimal::ZERO);
    }
}
