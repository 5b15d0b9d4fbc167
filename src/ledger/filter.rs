use chrono::NaiveDate;

use crate::models::{AccountId, Transaction};

/// Narrows a client's transactions to one account and/or a date window.
/// Both bounds are inclusive; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TransactionFilter {
    pub(crate) account: Option<AccountId>,
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub(crate) fn matches(&self, account: AccountId, txn: &Transaction) -> bool {
        let date = txn.date();
        self.account.map_or(true, |id| id == account)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

/// A transaction picked by a filter, with the account it lives in and its
/// position in that account's import order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FilteredTransaction<'a> {
    pub(crate) account_id: AccountId,
    pub(crate) bank: &'a str,
    pub(crate) index: usize,
    pub(crate) transaction: &'a Transaction,
}
