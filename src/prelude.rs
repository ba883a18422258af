//! Prelude module for the Zakat engine
//!
//! This module re-exports commonly used structs, traits, and types to allow
//! for easier usage of the library.
//!
//! # Usage
//!
//! ```rust
//! use zakat_engine::prelude::*;
//! ```

// Core exports
pub use crate::assets::{AssetCategory, Holdings};
pub use crate::calculator::{ZakatCalculator, calculate_zakat};
pub use crate::config::{ZakatConfig, ZakatConfigBuilder};
pub use crate::nisab::NisabStandard;
pub use crate::request::ZakatRequest;
pub use crate::traits::ZakatableAsset;
pub use crate::types::{AssetBreakdown, CalculationStep, CalculationTrace, Operation, ZakatError, ZakatReport, ZakatResult};

// Asset categories
pub use crate::maal::business::BusinessAssets;
pub use crate::maal::cash::CashAssets;
pub use crate::maal::investments::InvestmentAssets;
pub use crate::maal::liabilities::ShortTermLiabilities;
pub use crate::maal::precious_metals::MetalHoldings;
pub use crate::maal::real_estate::RealEstateAssets;

// History and prices
pub use crate::history::{HistoryEntry, HistorySummary, UserId, ZakatHistory};
pub use crate::inputs::IntoZakatDecimal;
pub use crate::pricing::{Prices, StaticPriceProvider};
#[cfg(feature = "async")]
pub use crate::pricing::{BestEffortPriceProvider, CachedPriceProvider, PriceProvider};
#[cfg(feature = "live-pricing")]
pub use crate::pricing::GoldApiPriceProvider;
