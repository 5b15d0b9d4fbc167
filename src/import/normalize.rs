use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Transaction;

/// One record as handed over by a statement parser. Fields are the raw text
/// the parser found; `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawRecord {
    pub(crate) date: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) memo: Option<String>,
}

impl RawRecord {
    #[cfg(test)]
    pub(crate) fn new(date: &str, amount: &str, memo: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            amount: Some(amount.to_string()),
            memo: Some(memo.to_string()),
        }
    }
}

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"];

/// Turns raw statement records into canonical transactions.
#[derive(Debug, Clone)]
pub(crate) struct Normalizer {
    preferred_date_format: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

impl Normalizer {
    pub(crate) fn new(preferred_date_format: impl Into<String>) -> Self {
        Self {
            preferred_date_format: preferred_date_format.into(),
        }
    }

    /// Normalize a single record. `position` is only used for error reporting.
    pub(crate) fn normalize(&self, record: &RawRecord, position: usize) -> LedgerResult<Transaction> {
        let date_str = non_blank(record.date.as_deref())
            .ok_or_else(|| LedgerError::malformed(position, "missing date"))?;
        let amount_str = non_blank(record.amount.as_deref())
            .ok_or_else(|| LedgerError::malformed(position, "missing amount"))?;

        let date = parse_date(date_str, &self.preferred_date_format).ok_or_else(|| {
            LedgerError::malformed(position, format!("could not parse date '{date_str}'"))
        })?;
        let amount = parse_decimal(amount_str).ok_or_else(|| {
            LedgerError::malformed(position, format!("amount '{amount_str}' is not a number"))
        })?;

        let memo = record.memo.clone().unwrap_or_default();
        Ok(Transaction::new(date, amount, memo))
    }

    /// Normalize every record or none: the first malformed record aborts the
    /// whole batch.
    pub(crate) fn normalize_batch(&self, records: &[RawRecord]) -> LedgerResult<Vec<Transaction>> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| self.normalize(record, i))
            .collect()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str, preferred: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, preferred) {
        return Some(d);
    }
    for fallback in FALLBACK_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fallback) {
            return Some(d);
        }
    }
    // OFX style: YYYYMMDD, optionally followed by time and timezone
    let compact = s.get(..8)?;
    if compact.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(compact, "%Y%m%d").ok();
    }
    None
}

/// Parentheses mark an accounting negative and must come as a pair around
/// the whole value.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(['$', ',', '"'], "");
    let cleaned = cleaned.trim();
    let (negative, body) = match cleaned.strip_prefix('(') {
        Some(inner) => (true, inner.strip_suffix(')')?.trim()),
        None if cleaned.ends_with(')') => return None,
        None => (false, cleaned),
    };
    let body = body.strip_prefix('+').unwrap_or(body);
    if body.is_empty() || (negative && body.starts_with('-')) {
        return None;
    }
    let value = Decimal::from_str(body).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
