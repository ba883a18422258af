use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::maal::business::BusinessAssets;
use crate::maal::cash::CashAssets;
use crate::maal::investments::InvestmentAssets;
use crate::maal::liabilities::ShortTermLiabilities;
use crate::maal::precious_metals::MetalHoldings;
use crate::maal::real_estate::RealEstateAssets;
use crate::traits::ZakatableAsset;

/// The asset categories that make up zakatable wealth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum AssetCategory {
    #[strum(to_string = "Cash & Bank")]
    Cash,
    #[strum(to_string = "Gold & Silver")]
    PreciousMetals,
    Investments,
    Business,
    #[strum(to_string = "Land")]
    RealEstate,
}

impl AssetCategory {
    /// Key used for this category's step in a calculation trace.
    pub fn step_key(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "step-cash",
            AssetCategory::PreciousMetals => "step-metals",
            AssetCategory::Investments => "step-investments",
            AssetCategory::Business => "step-business",
            AssetCategory::RealEstate => "step-land",
        }
    }
}

/// Everything a person declares: assets by category and short-term debts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    pub cash: CashAssets,
    pub metals: MetalHoldings,
    pub investments: InvestmentAssets,
    pub business: BusinessAssets,
    pub real_estate: RealEstateAssets,
    pub liabilities: ShortTermLiabilities,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cash(mut self, cash: CashAssets) -> Self {
        self.cash = cash;
        self
    }

    pub fn with_metals(mut self, metals: MetalHoldings) -> Self {
        self.metals = metals;
        self
    }

    pub fn with_investments(mut self, investments: InvestmentAssets) -> Self {
        self.investments = investments;
        self
    }

    pub fn with_business(mut self, business: BusinessAssets) -> Self {
        self.business = business;
        self
    }

    pub fn with_real_estate(mut self, real_estate: RealEstateAssets) -> Self {
        self.real_estate = real_estate;
        self
    }

    pub fn with_liabilities(mut self, liabilities: ShortTermLiabilities) -> Self {
        self.liabilities = liabilities;
        self
    }

    /// The asset categories in breakdown order.
    pub fn assets(&self) -> [&dyn ZakatableAsset; 5] {
        [
            &self.cash,
            &self.metals,
            &self.investments,
            &self.business,
            &self.real_estate,
        ]
    }
}
