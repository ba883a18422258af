use rust_decimal::Decimal;

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;

/// Trait implemented by every asset category that counts towards zakatable wealth.
pub trait ZakatableAsset {
    /// Which category of the breakdown this asset belongs to.
    fn category(&self) -> AssetCategory;

    /// Monetary value of the asset under the given configuration.
    ///
    /// Must not fail or panic: arithmetic saturates at the `Decimal` range.
    fn total_value(&self, config: &ZakatConfig) -> Decimal;
}
