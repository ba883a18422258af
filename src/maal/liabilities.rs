use rust_decimal::Decimal;

zakat_category! {
    /// Debts that may be deducted from zakatable wealth.
    ///
    /// Only obligations falling due in the near term count. Long-term
    /// liabilities such as the remaining principal of a mortgage are never
    /// deducted.
    pub struct ShortTermLiabilities {
        /// Personal debts due now.
        short_term_debts,
        /// Outstanding bills and taxes.
        bills_taxes_due,
        /// Amounts the business owes to suppliers.
        business_payables,
    }
}

impl ShortTermLiabilities {
    pub fn total(&self) -> Decimal {
        self.sum()
    }
}
