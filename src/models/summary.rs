use rust_decimal::Decimal;
use serde::Serialize;

/// Signed total for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryTotal {
    pub(crate) name: String,
    pub(crate) total: Decimal,
}

/// Derived per-client totals. Only the consolidation engine builds these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct BalanceSummary {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) net: Decimal,
    /// In first-seen order.
    pub(crate) categories: Vec<CategoryTotal>,
}

impl BalanceSummary {
    pub(crate) fn category_total(&self, name: &str) -> Option<Decimal> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.total)
    }

    #[cfg(test)]
    pub(crate) fn is_zero(&self) -> bool {
        self.income.is_zero()
            && self.expense.is_zero()
            && self.net.is_zero()
            && self.categories.is_empty()
    }
}
