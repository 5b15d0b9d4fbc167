//! Export-ready snapshots of a client's ledger.
//!
//! A snapshot flattens a client's accounts into one transaction list and
//! carries the current summary, so exporters only need to serialize plain data.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerResult;
use crate::ledger::LedgerStore;
use crate::models::{BalanceSummary, Classification, ClientId, Period};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Snapshot {
    pub(crate) client_id: String,
    pub(crate) client_name: String,
    pub(crate) generated_at: DateTime<Utc>,
    /// Span of all account periods; `None` when the client has no transactions.
    pub(crate) period: Option<Period>,
    pub(crate) summary: BalanceSummary,
    pub(crate) transactions: Vec<SnapshotTransaction>,
}

/// One transaction, annotated with the account it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SnapshotTransaction {
    pub(crate) account_id: String,
    pub(crate) bank: String,
    pub(crate) account_number: String,
    pub(crate) date: NaiveDate,
    pub(crate) amount: Decimal,
    pub(crate) kind: Classification,
    pub(crate) memo: String,
    pub(crate) category: String,
}

/// Build a snapshot for one client. Transactions are listed account by
/// account (identifier order), each in import order.
pub(crate) fn build_snapshot(
    store: &LedgerStore,
    client_id: ClientId,
    generated_at: DateTime<Utc>,
) -> LedgerResult<Snapshot> {
    let client = store.client(client_id)?;

    let mut period: Option<Period> = None;
    let mut transactions = Vec::with_capacity(client.transaction_count());
    for account in client.accounts() {
        if let Some(p) = account.period() {
            period = Some(period.map_or(p, |acc| acc.union(p)));
        }
        transactions.extend(account.transactions().iter().map(|txn| SnapshotTransaction {
            account_id: account.id().to_string(),
            bank: account.bank().to_string(),
            account_number: account.number().to_string(),
            date: txn.date(),
            amount: txn.amount(),
            kind: txn.classification(),
            memo: txn.memo().to_string(),
            category: txn.category().to_string(),
        }));
    }

    Ok(Snapshot {
        client_id: client.id().to_string(),
        client_name: client.name().to_string(),
        generated_at,
        period,
        summary: client.summary().clone(),
        transactions,
    })
}
