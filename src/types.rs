use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounds a monetary amount to two decimal places, half to even, and pins
/// the scale at 2 so `5000` renders as `5000.00`.
///
/// Only ever applied to final outputs.
///
/// A `Decimal` holds 28 to 29 significant digits. Amounts with more than 26
/// integer digits cannot also carry two fractional digits, so they keep the
/// largest scale that fits (0 for saturated totals near `Decimal::MAX`).
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// The kind of operation a calculation step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Subtract,
    Compare,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Initial | Operation::Info => " ",
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Compare => "?",
            Operation::Rate => "x",
            Operation::Result => "=",
        }
    }
}

/// Represents a single step in the Zakat calculation process.
///
/// This struct provides transparency into how the final Zakat amount was derived,
/// enabling users to understand and verify each step of the calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationStep {
    /// Stable machine-readable identifier, e.g. `step-cash`.
    pub key: String,
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn make(key: impl Into<String>, description: impl Into<String>, amount: Option<Decimal>, operation: Operation) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(key: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self::make(key, description, Some(amount), Operation::Initial)
    }

    pub fn add(key: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self::make(key, description, Some(amount), Operation::Add)
    }

    pub fn subtract(key: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self::make(key, description, Some(amount), Operation::Subtract)
    }

    pub fn compare(key: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self::make(key, description, Some(amount), Operation::Compare)
    }

    pub fn rate(key: impl Into<String>, description: impl Into<String>, rate: Decimal) -> Self {
        Self::make(key, description, Some(rate), Operation::Rate)
    }

    pub fn result(key: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self::make(key, description, Some(amount), Operation::Result)
    }

    pub fn info(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::make(key, description, None, Operation::Info)
    }
}

/// Ordered list of the steps taken by one calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CalculationTrace(pub Vec<CalculationStep>);

impl CalculationTrace {
    pub fn push(&mut self, step: CalculationStep) {
        self.0.push(step);
    }

    /// Looks up a step by its key.
    pub fn step(&self, key: &str) -> Option<&CalculationStep> {
        self.0.iter().find(|s| s.key == key)
    }
}

impl std::ops::Deref for CalculationTrace {
    type Target = [CalculationStep];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Outcome of one Zakat calculation.
///
/// All monetary fields are rounded to 2 decimal places and serialize as
/// JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZakatResult {
    /// Cash + metals + investments + business + land.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub assets_total: Decimal,
    /// Short-term liabilities only.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub debts_total: Decimal,
    /// `max(assets_total - debts_total, 0)`.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub net_zakatable: Decimal,
    /// The threshold for the selected basis.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub nisab: Decimal,
    /// `net_zakatable >= nisab`, and false whenever the Nisab is zero.
    pub is_above_nisab: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub zakat_due: Decimal,
}

impl ZakatResult {
    /// Short verdict in the form shown on a user's dashboard.
    pub fn verdict(&self) -> &'static str {
        if self.is_above_nisab {
            "Zakat is Required"
        } else {
            "Zakat is Not Required"
        }
    }

    /// One-sentence explanation of the verdict.
    pub fn explanation(&self) -> &'static str {
        if self.is_above_nisab {
            "Your net assets exceed the Nisab threshold."
        } else if self.nisab <= Decimal::ZERO {
            "The Nisab threshold could not be determined because the metal price is zero."
        } else {
            "Your wealth does not meet the minimum Nisab level."
        }
    }

    /// Returns the Zakat due formatted with 2 decimal places.
    pub fn format_amount(&self) -> String {
        format!("{:.2}", self.zakat_due)
    }
}

impl std::fmt::Display for ZakatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Assets: {} | Debts: {}", self.assets_total, self.debts_total)?;
        writeln!(f, "Net Zakatable: {} | Nisab: {}", self.net_zakatable, self.nisab)?;
        if self.is_above_nisab {
            write!(f, "Status: PAYABLE ({} due)", self.format_amount())
        } else {
            write!(f, "Status: EXEMPT - {}", self.explanation())
        }
    }
}

/// Per-category asset totals, rounded for presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub cash: Decimal,
    pub metals: Decimal,
    pub investments: Decimal,
    pub business: Decimal,
    pub land: Decimal,
}

/// A result together with the figures and steps behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZakatReport {
    pub result: ZakatResult,
    pub breakdown: AssetBreakdown,
    pub trace: CalculationTrace,
}

impl ZakatReport {
    /// Generates a human-readable explanation of the Zakat calculation.
    ///
    /// The output is a step-by-step table showing each operation and its
    /// amount, followed by the final status.
    pub fn explain(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        let _ = writeln!(output, "Zakat calculation");
        let _ = writeln!(output, "{:-<50}", "");

        let width = self.trace.iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        for step in self.trace.iter() {
            match (step.operation, step.amount) {
                (Operation::Info, _) | (_, None) => {
                    let _ = writeln!(output, "  INFO: {}", step.description);
                }
                (Operation::Rate, Some(rate)) => {
                    let _ = writeln!(output, "  {:<width$} : {} {:>12.3}", step.description, step.operation.symbol(), rate);
                }
                (op, Some(amount)) => {
                    let _ = writeln!(output, "  {:<width$} : {} {:>12.2}", step.description, op.symbol(), amount);
                }
            }
        }

        let _ = writeln!(output, "{:-<50}", "");
        let _ = writeln!(output, "Status: {}", self.result.verdict());
        if self.result.is_above_nisab {
            let _ = writeln!(output, "Amount Due: {}", self.result.format_amount());
        } else {
            let _ = writeln!(output, "Reason: {}", self.result.explanation());
        }

        output
    }
}

/// Errors raised outside the calculation core: operator configuration and
/// price feeds. The calculator itself never returns one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZakatError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing configuration: field '{field}' is required")]
    MissingConfig { field: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl ZakatError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ZakatError::InvalidInput { field: field.into(), reason: reason.into() }
    }

    /// Re-labels an `InvalidInput` error with the field it was read for.
    pub fn for_field(self, field: &str) -> Self {
        match self {
            ZakatError::InvalidInput { reason, .. } => ZakatError::InvalidInput { field: field.to_string(), reason },
            other => other,
        }
    }
}
