use std::collections::BTreeMap;

use super::{Account, AccountId, BalanceSummary};

/// Sequential client identifier. Never reused within a ledger's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ClientId(pub(crate) u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClientId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Client {
    id: ClientId,
    name: String,
    accounts: BTreeMap<AccountId, Account>,
    next_account_id: u64,
    summary: BalanceSummary,
}

impl Client {
    pub(crate) fn new(id: ClientId, name: String) -> Self {
        Self {
            id,
            name,
            accounts: BTreeMap::new(),
            next_account_id: 1,
            summary: BalanceSummary::default(),
        }
    }

    pub(crate) fn id(&self) -> ClientId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn summary(&self) -> &BalanceSummary {
        &self.summary
    }

    /// Accounts in identifier (creation) order.
    pub(crate) fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub(crate) fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub(crate) fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub(crate) fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.values_mut()
    }

    pub(crate) fn transaction_count(&self) -> usize {
        self.accounts.values().map(|a| a.transactions().len()).sum()
    }

    pub(crate) fn open_account(&mut self, bank: String, number: String) -> AccountId {
        let id = AccountId(self.next_account_id);
        self.next_account_id += 1;
        self.accounts.insert(id, Account::new(id, bank, number));
        id
    }

    pub(crate) fn close_account(&mut self, id: AccountId) -> Option<Account> {
        self.accounts.remove(&id)
    }

    pub(crate) fn replace_summary(&mut self, summary: BalanceSummary) {
        self.summary = summary;
    }
}
