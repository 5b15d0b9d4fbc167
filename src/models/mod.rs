mod account;
mod client;
mod rule;
mod summary;
mod transaction;

pub(crate) use account::{Account, AccountId, Period};
pub(crate) use client::{Client, ClientId};
pub(crate) use rule::CategoryRule;
pub(crate) use summary::{BalanceSummary, CategoryTotal};
pub(crate) use transaction::{Classification, Transaction, UNCATEGORIZED};
