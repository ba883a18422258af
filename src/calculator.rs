//! The deterministic Zakat calculation.
//!
//! # Pipeline
//!
//! 1. Each asset category is totalled (cash, metals, investments, business, land).
//! 2. Short-term liabilities are totalled.
//! 3. Net zakatable wealth is `assets - debts`, floored at zero.
//! 4. The Nisab for the configured basis is `price per gram × Nisab weight`.
//! 5. Zakat is due when net wealth reaches the Nisab **and** the Nisab is
//!    positive. A zero price therefore never makes anyone liable.
//! 6. Due amount is `net × rate`.
//! 7. Monetary outputs are rounded to 2 decimal places, once, at the end.
//!
//! Every step is infallible. Arithmetic saturates at the `Decimal` range
//! rather than overflowing.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::assets::{AssetCategory, Holdings};
use crate::config::ZakatConfig;
use crate::request::ZakatRequest;
use crate::types::{AssetBreakdown, CalculationStep, CalculationTrace, ZakatReport, ZakatResult, round_currency};

/// Computes Zakat for holdings under a fixed configuration.
///
/// Holds no mutable state; one calculator can serve any number of callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZakatCalculator {
    config: ZakatConfig,
}

impl ZakatCalculator {
    pub fn new(config: ZakatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZakatConfig {
        &self.config
    }

    /// Calculates the result for the given holdings.
    pub fn calculate(&self, holdings: &Holdings) -> ZakatResult {
        self.calculate_with_trace(holdings).result
    }

    /// Calculates the result together with the category breakdown and a step trace.
    pub fn calculate_with_trace(&self, holdings: &Holdings) -> ZakatReport {
        let config = &self.config;
        let mut trace = CalculationTrace::default();

        let mut breakdown = AssetBreakdown::default();
        let mut assets_total = Decimal::ZERO;
        for asset in holdings.assets() {
            let category = asset.category();
            let value = asset.total_value(config);
            assets_total = assets_total.saturating_add(value);

            let slot = match category {
                AssetCategory::Cash => &mut breakdown.cash,
                AssetCategory::PreciousMetals => &mut breakdown.metals,
                AssetCategory::Investments => &mut breakdown.investments,
                AssetCategory::Business => &mut breakdown.business,
                AssetCategory::RealEstate => &mut breakdown.land,
            };
            *slot = round_currency(value);

            if trace.is_empty() {
                trace.push(CalculationStep::initial(category.step_key(), category.to_string(), value));
            } else {
                trace.push(CalculationStep::add(category.step_key(), category.to_string(), value));
            }
        }
        if holdings.metals.is_by_weight() {
            trace.push(CalculationStep::info("step-metal-mode", "Metals valued by weight at the configured price per gram"));
        }
        trace.push(CalculationStep::result("step-assets-total", "Total Assets", assets_total));

        let debts_total = holdings.liabilities.total();
        trace.push(CalculationStep::subtract("step-debts", "Short-term Debts", debts_total));

        let net_zakatable = assets_total.saturating_sub(debts_total).max(Decimal::ZERO);
        trace.push(CalculationStep::result("step-net", "Net Zakatable Wealth", net_zakatable));

        let nisab = config.nisab_threshold();
        trace.push(CalculationStep::compare(
            "step-nisab",
            format!("Nisab Threshold ({})", config.nisab_standard),
            nisab,
        ));

        let is_above_nisab = nisab > Decimal::ZERO && net_zakatable >= nisab;

        let zakat_due = if is_above_nisab {
            trace.push(CalculationStep::rate("step-rate", "Applied Rate", config.zakat_rate));
            let due = net_zakatable.saturating_mul(config.zakat_rate);
            trace.push(CalculationStep::result("step-due", "Zakat Due", due));
            due
        } else {
            if nisab <= Decimal::ZERO {
                trace.push(CalculationStep::info("step-below-nisab", "Nisab is zero (metal price not set) - No Zakat Due"));
            } else {
                trace.push(CalculationStep::info("step-below-nisab", "Net Wealth below Nisab - No Zakat Due"));
            }
            Decimal::ZERO
        };

        let result = ZakatResult {
            assets_total: round_currency(assets_total),
            debts_total: round_currency(debts_total),
            net_zakatable: round_currency(net_zakatable),
            nisab: round_currency(nisab),
            is_above_nisab,
            zakat_due: round_currency(zakat_due),
        };

        debug!(
            assets_total = %result.assets_total,
            net_zakatable = %result.net_zakatable,
            nisab = %result.nisab,
            is_above_nisab,
            zakat_due = %result.zakat_due,
            "zakat calculated"
        );

        ZakatReport { result, breakdown, trace }
    }

    /// Computes a wire-level request: its own settings, its own holdings.
    pub fn compute(request: &ZakatRequest) -> ZakatResult {
        Self::compute_with_trace(request).result
    }

    pub fn compute_with_trace(request: &ZakatRequest) -> ZakatReport {
        let (config, holdings) = request.clone().into_parts();
        ZakatCalculator::new(config).calculate_with_trace(&holdings)
    }

    /// Computes straight from an untrusted JSON body. Never fails.
    pub fn compute_value(value: &Value) -> ZakatResult {
        Self::compute(&ZakatRequest::from_value(value))
    }
}

/// Shorthand for [`ZakatCalculator::compute`].
pub fn calculate_zakat(request: &ZakatRequest) -> ZakatResult {
    ZakatCalculator::compute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maal::cash::CashAssets;
    use crate::maal::liabilities::ShortTermLiabilities;
    use crate::maal::precious_metals::MetalHoldings;
    use crate::nisab::NisabStandard;
    use rust_decimal_macros::dec;

    fn gold_config(price: Decimal) -> ZakatConfig {
        ZakatConfig { gold_price_per_gram: price, ..Default::default() }
    }

    #[test]
    fn test_below_nisab() {
        let calculator = ZakatCalculator::new(gold_config(dec!(100)));
        let holdings = Holdings::new().with_cash(CashAssets::new().cash_on_hand(8000));

        // 8000 < 85 * 100
        let result = calculator.calculate(&holdings);
        assert!(!result.is_above_nisab);
        assert_eq!(result.nisab, dec!(8500));
        assert_eq!(result.zakat_due, Decimal::ZERO);
    }

    #[test]
    fn test_exactly_at_nisab_is_payable() {
        let calculator = ZakatCalculator::new(gold_config(dec!(100)));
        let holdings = Holdings::new().with_metals(MetalHoldings::by_weight(85, 0));

        let result = calculator.calculate(&holdings);
        assert!(result.is_above_nisab);
        assert_eq!(result.zakat_due, dec!(212.50));
    }

    #[test]
    fn test_debts_reduce_wealth_below_nisab() {
        // 100g gold = 10,000. Debt 2,000. Net 8,000 < 8,500.
        let calculator = ZakatCalculator::new(gold_config(dec!(100)));
        let holdings = Holdings::new()
            .with_metals(MetalHoldings::by_weight(100, 0))
            .with_liabilities(ShortTermLiabilities::new().short_term_debts(2000));

        let result = calculator.calculate(&holdings);
        assert_eq!(result.net_zakatable, dec!(8000));
        assert!(!result.is_above_nisab);
    }

    #[test]
    fn test_net_is_floored_at_zero() {
        let calculator = ZakatCalculator::new(gold_config(dec!(100)));
        let holdings = Holdings::new()
            .with_cash(CashAssets::new().cash_on_hand(500))
            .with_liabilities(ShortTermLiabilities::new().bills_taxes_due(1200));

        let result = calculator.calculate(&holdings);
        assert_eq!(result.debts_total, dec!(1200));
        assert_eq!(result.net_zakatable, Decimal::ZERO);
        assert!(result.net_zakatable.is_sign_positive());
    }

    #[test]
    fn test_zero_price_never_payable() {
        let calculator = ZakatCalculator::new(ZakatConfig::default());
        let holdings = Holdings::new().with_cash(CashAssets::new().bank_accounts(1_000_000));

        // net >= 0 == nisab would be true without the guard
        let result = calculator.calculate(&holdings);
        assert_eq!(result.nisab, Decimal::ZERO);
        assert!(!result.is_above_nisab);
        assert_eq!(result.zakat_due, Decimal::ZERO);
    }

    #[test]
    fn test_empty_holdings_with_zero_nisab() {
        let result = ZakatCalculator::default().calculate(&Holdings::new());
        assert!(!result.is_above_nisab);
        assert_eq!(result.assets_total.to_string(), "0.00");
    }

    #[test]
    fn test_silver_basis() {
        let config = ZakatConfig {
            gold_price_per_gram: dec!(60),
            silver_price_per_gram: dec!(0.7),
            nisab_standard: NisabStandard::Silver,
            ..Default::default()
        };
        let holdings = Holdings::new().with_cash(CashAssets::new().cash_on_hand(1000));

        let result = ZakatCalculator::new(config).calculate(&holdings);
        assert_eq!(result.nisab, dec!(416.50));
        assert!(result.is_above_nisab);
        assert_eq!(result.zakat_due, dec!(25.00));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let config = ZakatConfig {
            gold_price_per_gram: Decimal::MAX,
            ..Default::default()
        };
        let holdings = Holdings::new()
            .with_cash(CashAssets::new().cash_on_hand(Decimal::MAX).bank_accounts(Decimal::MAX))
            .with_metals(MetalHoldings::by_weight(Decimal::MAX, 0));

        let result = ZakatCalculator::new(config).calculate(&holdings);
        assert!(result.is_above_nisab);
        assert!(result.zakat_due > Decimal::ZERO);
    }

    #[test]
    fn test_trace_steps() {
        let calculator = ZakatCalculator::new(gold_config(dec!(60)));
        let holdings = Holdings::new()
            .with_cash(CashAssets::new().cash_on_hand(6000))
            .with_metals(MetalHoldings::by_weight(1, 0));

        let report = calculator.calculate_with_trace(&holdings);
        assert_eq!(report.breakdown.cash, dec!(6000));
        assert_eq!(report.breakdown.metals, dec!(60));
        assert!(report.trace.step("step-metal-mode").is_some());
        assert_eq!(report.trace.step("step-rate").and_then(|s| s.amount), Some(dec!(0.025)));
        assert_eq!(report.trace.step("step-due").and_then(|s| s.amount), Some(dec!(151.500)));

        let text = report.explain();
        assert!(text.contains("Zakat is Required"));
        assert!(text.contains("Amount Due: 151.50"));
    }
}
