use anyhow::Result;
use rust_decimal::Decimal;
use std::io::Write;

use crate::report::Snapshot;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `-1234567.891` with `"$"` → `"-$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let rounded = val.round_dp(2);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

pub(super) fn write_text<W: Write>(snapshot: &Snapshot, symbol: &str, mut out: W) -> Result<()> {
    let summary = &snapshot.summary;

    writeln!(out, "Balance Report")?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(
        out,
        "  Generated:  {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(out, "  Client:     {} (#{})", snapshot.client_name, snapshot.client_id)?;
    if let Some(period) = snapshot.period {
        writeln!(out, "  Period:     {period}")?;
    }
    writeln!(out, "  Txns:       {}", snapshot.transactions.len())?;
    writeln!(out)?;
    writeln!(out, "  Income:     {}", format_amount(summary.income, symbol))?;
    writeln!(out, "  Expenses:   {}", format_amount(summary.expense, symbol))?;
    writeln!(out, "  Net:        {}", format_amount(summary.net, symbol))?;

    if !summary.categories.is_empty() {
        writeln!(out)?;
        writeln!(out, "By Category:")?;
        for category in &summary.categories {
            writeln!(
                out,
                "  {:<24} {}",
                category.name,
                format_amount(category.total, symbol)
            )?;
        }
    }

    Ok(())
}
