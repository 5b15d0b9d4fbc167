mod csv;
mod json;
mod text;
mod xml;

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::report::Snapshot;

pub(crate) use text::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
    Xml,
    Text,
}

impl ExportFormat {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize one snapshot. `currency_symbol` only affects the text format.
pub(crate) fn write_snapshot<W: Write>(
    snapshot: &Snapshot,
    format: ExportFormat,
    currency_symbol: &str,
    out: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => csv::write_csv(snapshot, out),
        ExportFormat::Json => json::write_json(snapshot, out),
        ExportFormat::Xml => xml::write_xml(snapshot, out),
        ExportFormat::Text => text::write_text(snapshot, currency_symbol, out),
    }
}
