#[macro_use]
mod macros;

pub mod assets;
pub mod calculator;
pub mod config;
pub mod history;
pub mod inputs;
pub mod maal;
pub mod nisab;
pub mod prelude;
pub mod pricing;
pub mod request;
pub mod traits;
pub mod types;

pub use assets::{AssetCategory, Holdings};
pub use calculator::{ZakatCalculator, calculate_zakat};
pub use config::ZakatConfig;
pub use nisab::NisabStandard;
pub use request::ZakatRequest;
pub use traits::ZakatableAsset;
pub use types::{ZakatError, ZakatReport, ZakatResult};
