use chrono::NaiveDate;
use serde::Serialize;

use super::Transaction;

/// Sequential account identifier, scoped to its owning client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct AccountId(pub(crate) u64);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Earliest and latest transaction date seen on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Period {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl Period {
    fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    fn widen(&mut self, date: NaiveDate) {
        self.start = self.start.min(date);
        self.end = self.end.max(date);
    }

    /// Smallest period covering both.
    pub(crate) fn union(self, other: Period) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Account {
    id: AccountId,
    bank: String,
    number: String,
    transactions: Vec<Transaction>,
    period: Option<Period>,
}

impl Account {
    pub(crate) fn new(id: AccountId, bank: String, number: String) -> Self {
        Self {
            id,
            bank,
            number,
            transactions: Vec::new(),
            period: None,
        }
    }

    pub(crate) fn id(&self) -> AccountId {
        self.id
    }

    pub(crate) fn bank(&self) -> &str {
        &self.bank
    }

    pub(crate) fn number(&self) -> &str {
        &self.number
    }

    /// Transactions in import order.
    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// `None` until the first transaction is appended.
    pub(crate) fn period(&self) -> Option<Period> {
        self.period
    }

    /// Append a batch and widen the period to cover it. Transactions are never
    /// removed individually, so widening keeps the period equal to the exact
    /// min/max of the current dates.
    pub(crate) fn append(&mut self, batch: Vec<Transaction>) {
        for txn in &batch {
            match self.period.as_mut() {
                Some(period) => period.widen(txn.date()),
                None => self.period = Some(Period::single(txn.date())),
            }
        }
        self.transactions.extend(batch);
    }

    pub(crate) fn transaction_mut(&mut self, index: usize) -> Option<&mut Transaction> {
        self.transactions.get_mut(index)
    }

    pub(crate) fn transactions_mut(&mut self) -> impl Iterator<Item = &mut Transaction> {
        self.transactions.iter_mut()
    }
}
