mod consolidate;
mod filter;

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::categorize::Categorizer;
use crate::error::{LedgerError, LedgerResult};
use crate::import::{Normalizer, RawRecord};
use crate::models::*;

pub(crate) use filter::{FilteredTransaction, TransactionFilter};

/// In-memory registry of clients, their accounts and transactions.
///
/// Every mutation that changes the set of transactions a client owns rebuilds
/// that client's summary before returning.
#[derive(Debug, Default)]
pub(crate) struct LedgerStore {
    clients: BTreeMap<ClientId, Client>,
    next_client_id: u64,
    normalizer: Normalizer,
}

impl LedgerStore {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    // ── Clients ───────────────────────────────────────────────

    pub(crate) fn add_client(&mut self, name: &str) -> LedgerResult<ClientId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid_input("client name must not be empty"));
        }
        self.next_client_id += 1;
        let id = ClientId(self.next_client_id);
        self.clients.insert(id, Client::new(id, name.to_string()));
        debug!(client = %id, name, "client added");
        Ok(id)
    }

    /// Remove a client together with all of its accounts and transactions.
    pub(crate) fn remove_client(&mut self, id: ClientId) -> LedgerResult<Client> {
        let client = self
            .clients
            .remove(&id)
            .ok_or_else(|| LedgerError::client_not_found(id))?;
        debug!(client = %id, accounts = client.accounts().count(), "client removed");
        Ok(client)
    }

    /// Clients in identifier order.
    pub(crate) fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub(crate) fn client(&self, id: ClientId) -> LedgerResult<&Client> {
        self.clients
            .get(&id)
            .ok_or_else(|| LedgerError::client_not_found(id))
    }

    fn client_mut(&mut self, id: ClientId) -> LedgerResult<&mut Client> {
        self.clients
            .get_mut(&id)
            .ok_or_else(|| LedgerError::client_not_found(id))
    }

    pub(crate) fn summary(&self, id: ClientId) -> LedgerResult<&BalanceSummary> {
        Ok(self.client(id)?.summary())
    }

    pub(crate) fn transaction_count(&self, id: ClientId) -> LedgerResult<usize> {
        Ok(self.client(id)?.transaction_count())
    }

    // ── Accounts ──────────────────────────────────────────────

    pub(crate) fn add_account(
        &mut self,
        client_id: ClientId,
        bank: &str,
        number: &str,
    ) -> LedgerResult<AccountId> {
        let client = self.client_mut(client_id)?;
        let (bank, number) = (bank.trim(), number.trim());
        if bank.is_empty() {
            return Err(LedgerError::invalid_input("bank name must not be empty"));
        }
        if number.is_empty() {
            return Err(LedgerError::invalid_input("account number must not be empty"));
        }
        let id = client.open_account(bank.to_string(), number.to_string());
        debug!(client = %client_id, account = %id, bank, "account added");
        Ok(id)
    }

    pub(crate) fn remove_account(
        &mut self,
        client_id: ClientId,
        account_id: AccountId,
    ) -> LedgerResult<Account> {
        let client = self.client_mut(client_id)?;
        let account = client
            .close_account(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        self.recompute(client_id)?;
        debug!(client = %client_id, account = %account_id, "account removed");
        Ok(account)
    }

    /// Accounts of a client in identifier order.
    pub(crate) fn accounts(&self, client_id: ClientId) -> LedgerResult<impl Iterator<Item = &Account>> {
        Ok(self.client(client_id)?.accounts())
    }

    pub(crate) fn account(&self, client_id: ClientId, account_id: AccountId) -> LedgerResult<&Account> {
        self.client(client_id)?
            .account(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Transactions of one account in import order.
    pub(crate) fn transactions(
        &self,
        client_id: ClientId,
        account_id: AccountId,
    ) -> LedgerResult<&[Transaction]> {
        Ok(self.account(client_id, account_id)?.transactions())
    }

    /// Transactions of a client that pass `filter`, accounts in identifier
    /// order and each account in import order. A filter naming an unknown
    /// account is `NotFound`; a window whose start is after its end is
    /// `InvalidInput`.
    pub(crate) fn filtered_transactions(
        &self,
        client_id: ClientId,
        filter: &TransactionFilter,
    ) -> LedgerResult<Vec<FilteredTransaction<'_>>> {
        let client = self.client(client_id)?;
        if let Some(account_id) = filter.account {
            if client.account(account_id).is_none() {
                return Err(LedgerError::account_not_found(account_id));
            }
        }
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(LedgerError::invalid_input(format!(
                    "date range starts after it ends: {from} > {to}"
                )));
            }
        }

        Ok(client
            .accounts()
            .flat_map(move |account| {
                account
                    .transactions()
                    .iter()
                    .enumerate()
                    .filter(move |(_, txn)| filter.matches(account.id(), txn))
                    .map(move |(index, txn)| FilteredTransaction {
                        account_id: account.id(),
                        bank: account.bank(),
                        index,
                        transaction: txn,
                    })
            })
            .collect())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Normalize and append a batch of statement records, then rebuild the
    /// client summary. The batch is all-or-nothing: if any record is
    /// malformed, or the totals would leave the `Decimal` range, the account
    /// is left untouched. Returns the number appended.
    pub(crate) fn import_transactions(
        &mut self,
        client_id: ClientId,
        account_id: AccountId,
        records: &[RawRecord],
    ) -> LedgerResult<usize> {
        self.account(client_id, account_id)?;
        if records.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }

        let batch = self.normalizer.normalize_batch(records)?;
        let count = batch.len();

        // Consolidate a copy first so a failing batch leaves the client as it was.
        let client = self.client_mut(client_id)?;
        let mut candidate = client.clone();
        candidate
            .account_mut(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?
            .append(batch);
        let summary = consolidate::consolidate(&candidate)?;
        candidate.replace_summary(summary);
        *client = candidate;

        info!(client = %client_id, account = %account_id, count, "transactions imported");
        Ok(count)
    }

    /// Reassign the category of one transaction, addressed by its position in
    /// the account's import order.
    pub(crate) fn set_category(
        &mut self,
        client_id: ClientId,
        account_id: AccountId,
        index: usize,
        category: &str,
    ) -> LedgerResult<()> {
        let category = category.trim();
        let txn = self
            .client_mut(client_id)?
            .account_mut(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?
            .transaction_mut(index)
            .ok_or_else(|| LedgerError::transaction_not_found(format!("{account_id}/{index}")))?;
        if category.is_empty() {
            return Err(LedgerError::invalid_input("category must not be empty"));
        }
        txn.set_category(category.to_string());
        self.recompute(client_id)
    }

    /// Run category rules over every uncategorized transaction of a client.
    /// Returns the number of transactions that received a category.
    pub(crate) fn apply_rules(
        &mut self,
        client_id: ClientId,
        categorizer: &Categorizer,
    ) -> LedgerResult<usize> {
        let client = self.client_mut(client_id)?;
        let changed: usize = client
            .accounts_mut()
            .map(|account| categorizer.categorize_batch(account.transactions_mut()))
            .sum();
        self.recompute(client_id)?;
        debug!(client = %client_id, changed, "category rules applied");
        Ok(changed)
    }

    // ── Consolidation ─────────────────────────────────────────

    /// Rebuild the client's summary from scratch and swap it in.
    pub(crate) fn recompute(&mut self, client_id: ClientId) -> LedgerResult<()> {
        let client = self.client_mut(client_id)?;
        let summary = consolidate::consolidate(client)?;
        client.replace_summary(summary);
        Ok(())
    }
}
