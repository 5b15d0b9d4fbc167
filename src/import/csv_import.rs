use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use super::RawRecord;

/// Where the amount lives in a statement row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AmountColumns {
    Single(usize),
    /// Separate debit/credit columns, both holding unsigned values.
    Split { debit: usize, credit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatementLayout {
    pub(crate) date_column: usize,
    pub(crate) amount: AmountColumns,
    pub(crate) memo_column: Option<usize>,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount: AmountColumns::Single(1),
            memo_column: Some(2),
        }
    }
}

const DATE_HEADERS: &[&str] = &["date", "posted date", "posting date", "transaction date", "data"];
const AMOUNT_HEADERS: &[&str] = &["amount", "value", "valor", "transaction amount"];
const MEMO_HEADERS: &[&str] = &["memo", "description", "descricao", "descrição", "payee", "details"];

impl StatementLayout {
    /// Locate columns by header name. Returns `None` when no date column or
    /// no amount source can be found.
    pub(crate) fn from_headers(headers: &[String]) -> Option<Self> {
        let h: Vec<String> = headers.iter().map(|s| s.trim().to_lowercase()).collect();

        let date_column = find_any(&h, DATE_HEADERS)?;
        let amount = match find_any(&h, AMOUNT_HEADERS) {
            Some(col) => AmountColumns::Single(col),
            None => AmountColumns::Split {
                debit: col_index(&h, "debit")?,
                credit: col_index(&h, "credit")?,
            },
        };
        let memo_column = find_any(&h, MEMO_HEADERS);

        Some(Self {
            date_column,
            amount,
            memo_column,
        })
    }

    fn record(&self, row: &[String]) -> RawRecord {
        RawRecord {
            date: cell(row, self.date_column),
            amount: match self.amount {
                AmountColumns::Single(col) => cell(row, col),
                AmountColumns::Split { debit, credit } => split_amount(row, debit, credit),
            },
            memo: self.memo_column.and_then(|col| row.get(col).cloned()),
        }
    }
}

pub(crate) struct StatementReader;

impl StatementReader {
    pub(crate) fn read_path(path: &Path) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open statement: {}", path.display()))?;
        Self::read(file)
    }

    /// Read a CSV statement into raw records. Header detection and column
    /// lookup happen here; value validation is left to the normalizer.
    pub(crate) fn read<R: Read>(input: R) -> Result<Vec<RawRecord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(input);

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        all_rows.retain(|row| row.iter().any(|field| !field.trim().is_empty()));

        if all_rows.is_empty() {
            anyhow::bail!("Statement is empty");
        }

        let layout = if looks_like_header(&all_rows[0]) {
            let headers = all_rows.remove(0);
            StatementLayout::from_headers(&headers).ok_or_else(|| {
                anyhow::anyhow!(
                    "Could not find date and amount columns in header: {}",
                    headers.join(", ")
                )
            })?
        } else {
            StatementLayout::default()
        };

        Ok(all_rows.iter().map(|row| layout.record(row)).collect())
    }
}

fn looks_like_header(row: &[String]) -> bool {
    row.iter().all(|field| {
        let trimmed = field.trim();
        // Headers typically don't parse as dates or numbers
        Decimal::from_str(trimmed.replace(['$', ','], "").trim()).is_err()
            && NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").is_err()
            && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err()
    })
}

fn cell(row: &[String], col: usize) -> Option<String> {
    row.get(col)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn split_amount(row: &[String], debit: usize, credit: usize) -> Option<String> {
    if let Some(value) = cell(row, debit) {
        let unsigned = value
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .unwrap_or(value.as_str())
            .trim()
            .trim_start_matches('-');
        return Some(format!("-{unsigned}"));
    }
    cell(row, credit)
}

fn find_any(headers: &[String], names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| col_index(headers, name))
}

fn col_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
