use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Category label given to every freshly imported transaction.
pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

/// Credit/debit split derived from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Classification {
    Credit,
    Debit,
}

impl Classification {
    /// Zero is a debit: only strictly positive amounts count as credits.
    pub(crate) fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One dated, signed movement on an account. Only the category may change
/// after creation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    date: NaiveDate,
    amount: Decimal,
    memo: String,
    category: String,
}

impl Transaction {
    pub(crate) fn new(date: NaiveDate, amount: Decimal, memo: String) -> Self {
        Self {
            date,
            amount,
            memo,
            category: UNCATEGORIZED.to_string(),
        }
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.date
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn memo(&self) -> &str {
        &self.memo
    }

    pub(crate) fn category(&self) -> &str {
        &self.category
    }

    pub(crate) fn classification(&self) -> Classification {
        Classification::of(self.amount)
    }

    pub(crate) fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }

    pub(crate) fn set_category(&mut self, category: String) {
        self.category = category;
    }
}
