use anyhow::{Context, Result};
use std::io::Write;

use crate::report::Snapshot;

const HEADER: [&str; 8] = [
    "date", "account", "bank", "number", "memo", "amount", "kind", "category",
];

pub(super) fn write_csv<W: Write>(snapshot: &Snapshot, out: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(out);
    wtr.write_record(HEADER)
        .context("Failed to write CSV header")?;

    for txn in &snapshot.transactions {
        wtr.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.account_id.clone(),
            txn.bank.clone(),
            txn.account_number.clone(),
            txn.memo.clone(),
            txn.amount.to_string(),
            txn.kind.to_string(),
            txn.category.clone(),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}
