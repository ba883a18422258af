use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Nisab standard for calculating the Zakat threshold on monetary wealth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    Serialize, Deserialize, JsonSchema, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NisabStandard {
    /// Use the gold Nisab (85g × gold_price)
    #[default]
    Gold,
    /// Use the silver Nisab (595g × silver_price)
    Silver,
}

impl NisabStandard {
    /// Reads the `nisab_basis` field of a request.
    ///
    /// Only the exact string `"gold"` selects gold. Any other present value,
    /// including `null` or `"Gold"`, selects silver. An absent field never
    /// reaches this function; serde's default (gold) applies instead.
    pub fn from_basis(value: &Value) -> Self {
        match value {
            Value::String(s) if s == "gold" => NisabStandard::Gold,
            _ => NisabStandard::Silver,
        }
    }
}
