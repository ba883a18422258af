use rust_decimal::Decimal;

use crate::assets::AssetCategory;
use crate::config::ZakatConfig;
use crate::traits::ZakatableAsset;

zakat_category! {
    /// Land and property held for trade or investment. A personal residence
    /// is not zakatable and should not be declared here.
    pub struct RealEstateAssets {
        land_value,
    }
}

impl ZakatableAsset for RealEstateAssets {
    fn category(&self) -> AssetCategory {
        AssetCategory::RealEstate
    }

    fn total_value(&self, _config: &ZakatConfig) -> Decimal {
        self.land_value
    }
}
