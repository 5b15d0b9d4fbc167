use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BalanceSummary, CategoryTotal, Client, Transaction};

/// Rebuild a client's summary from every transaction it owns.
///
/// Accounts are visited in identifier order and transactions in import order.
/// That order only decides the order of the category table; the totals are
/// plain sums. Each transaction lands in exactly one of income or expense, so
/// `net == income - expense` holds by construction.
///
/// Fails with `InvalidInput` when a total leaves the `Decimal` range.
pub(crate) fn consolidate(client: &Client) -> LedgerResult<BalanceSummary> {
    let mut builder = SummaryBuilder::default();
    for account in client.accounts() {
        for txn in account.transactions() {
            builder.record(txn)?;
        }
    }
    Ok(builder.finish())
}

fn add(total: &mut Decimal, amount: Decimal, what: &str) -> LedgerResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| LedgerError::invalid_input(format!("{what} total out of range")))?;
    Ok(())
}

#[derive(Default)]
struct SummaryBuilder {
    summary: BalanceSummary,
    category_index: HashMap<String, usize>,
}

impl SummaryBuilder {
    fn record(&mut self, txn: &Transaction) -> LedgerResult<()> {
        let amount = txn.amount();
        if amount > Decimal::ZERO {
            add(&mut self.summary.income, amount, "income")?;
        } else {
            add(&mut self.summary.expense, amount.abs(), "expense")?;
        }
        add(&mut self.summary.net, amount, "net")?;

        let categories = &mut self.summary.categories;
        let slot = *self
            .category_index
            .entry(txn.category().to_string())
            .or_insert_with(|| {
                categories.push(CategoryTotal {
                    name: txn.category().to_string(),
                    total: Decimal::ZERO,
                });
                categories.len() - 1
            });
        add(&mut categories[slot].total, amount, "category")
    }

    fn finish(self) -> BalanceSummary {
        self.summary
    }
}
