use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::categorize::Categorizer;
use crate::config::{shellexpand, Settings};
use crate::export::{format_amount, write_snapshot, ExportFormat};
use crate::import::StatementReader;
use crate::ledger::{LedgerStore, TransactionFilter};
use crate::models::{AccountId, CategoryRule, ClientId, UNCATEGORIZED};
use crate::report::{build_snapshot, Snapshot};

/// Interactive state around a ledger: the store itself plus what the user has
/// selected. Selection lives here, never in the store.
pub(crate) struct Session {
    pub(crate) store: LedgerStore,
    pub(crate) active_client: Option<ClientId>,
    pub(crate) active_account: Option<AccountId>,
    pub(crate) running: bool,
    settings: Settings,
    rules: Vec<CategoryRule>,
    output: Vec<String>,
}

pub(crate) struct Command {
    pub(crate) usage: &'static str,
    pub(crate) description: &'static str,
    pub(crate) run: fn(&[String], &mut Session) -> Result<()>,
}

macro_rules! register_command {
    ($name:expr, $usage:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                usage: $usage,
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("client", "client <name>", "Register a client", cmd_client, r);
    register_command!("clients", "clients", "List clients", cmd_clients, r);
    register_command!("use", "use <client_id>", "Select the active client", cmd_use, r);
    register_command!(
        "rm-client",
        "rm-client [client_id]",
        "Remove a client and everything it owns",
        cmd_rm_client,
        r
    );
    register_command!(
        "account",
        "account <bank> <number>",
        "Add an account to the active client",
        cmd_account,
        r
    );
    register_command!("accounts", "accounts", "List accounts of the active client", cmd_accounts, r);
    register_command!(
        "select",
        "select <account_id>",
        "Select the active account",
        cmd_select,
        r
    );
    register_command!(
        "rm-account",
        "rm-account [account_id]",
        "Remove an account",
        cmd_rm_account,
        r
    );
    register_command!(
        "import",
        "import <file.csv> [account_id]",
        "Import a CSV statement into an account",
        cmd_import,
        r
    );
    register_command!(
        "txns",
        "txns [account_id|all] [from|-] [to|-]",
        "List transactions, optionally by account and date range",
        cmd_txns,
        r
    );
    register_command!(
        "recat",
        "recat <index> <category>",
        "Re-categorize a transaction of the active account",
        cmd_recat,
        r
    );
    register_command!(
        "rule",
        "rule <pattern> <category>",
        "Add a memo-contains category rule",
        cmd_rule,
        r
    );
    register_command!(
        "regex-rule",
        "regex-rule <pattern> <category>",
        "Add a regex category rule",
        cmd_regex_rule,
        r
    );
    register_command!(
        "categorize",
        "categorize",
        "Apply category rules to uncategorized transactions",
        cmd_categorize,
        r
    );
    register_command!("summary", "summary", "Show the active client's balance", cmd_summary, r);
    register_command!(
        "export",
        "export <path> [csv|json|xml|text]",
        "Export the active client's report",
        cmd_export,
        r
    );
    register_command!("help", "help", "Show available commands", cmd_help, r);
    register_command!("quit", "quit", "Leave the session", cmd_quit, r);
    register_command!("q", "q", "Leave the session", cmd_quit, r);

    r
});

impl Session {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            store: LedgerStore::with_normalizer(settings.normalizer()),
            active_client: None,
            active_account: None,
            running: true,
            settings,
            rules: Vec::new(),
            output: Vec::new(),
        }
    }

    fn say(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Drain everything the last commands printed.
    pub(crate) fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn require_client(&self) -> Result<ClientId> {
        self.active_client
            .ok_or_else(|| anyhow::anyhow!("No client selected. Use: use <client_id>"))
    }

    fn require_account(&self) -> Result<(ClientId, AccountId)> {
        let client = self.require_client()?;
        let account = self
            .active_account
            .ok_or_else(|| anyhow::anyhow!("No account selected. Use: select <account_id>"))?;
        Ok((client, account))
    }
}

/// Parse and run one command line.
pub(crate) fn handle_command(input: &str, session: &mut Session) -> Result<()> {
    let words = shell_words::split(input).context("Could not split command line")?;
    let Some((name, args)) = words.split_first() else {
        return Ok(());
    };

    match COMMANDS.get(name.as_str()) {
        Some(cmd) => (cmd.run)(args, session),
        None => {
            let suggestion = find_closest(name);
            anyhow::bail!("Unknown command: {name}. Did you mean {suggestion}?")
        }
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid {what} id: {raw}"))
}

// ── Clients ──────────────────────────────────────────────────

fn cmd_client(args: &[String], session: &mut Session) -> Result<()> {
    let name = args.join(" ");
    let id = session.store.add_client(&name)?;
    session.say(format!("Added client {} with ID {id}", name.trim()));
    Ok(())
}

fn cmd_clients(_args: &[String], session: &mut Session) -> Result<()> {
    let symbol = session.settings.currency_symbol.clone();
    let rows: Vec<String> = session
        .store
        .clients()
        .map(|c| {
            let marker = if Some(c.id()) == session.active_client { "*" } else { " " };
            format!(
                "{marker}{:<4} {:<24} {:>6} {:>16}",
                c.id(),
                c.name(),
                c.transaction_count(),
                format_amount(c.summary().net, &symbol),
            )
        })
        .collect();

    if rows.is_empty() {
        session.say("No clients");
        return Ok(());
    }
    session.say(format!(" {:<4} {:<24} {:>6} {:>16}", "ID", "Name", "Txns", "Balance"));
    for row in rows {
        session.say(row);
    }
    Ok(())
}

fn cmd_use(args: &[String], session: &mut Session) -> Result<()> {
    let raw = args.first().ok_or_else(|| anyhow::anyhow!("Usage: use <client_id>"))?;
    let id: ClientId = parse_id(raw, "client")?;
    let name = session.store.client(id)?.name().to_string();
    session.active_client = Some(id);
    session.active_account = None;
    session.say(format!("Active client: {name}"));
    Ok(())
}

fn cmd_rm_client(args: &[String], session: &mut Session) -> Result<()> {
    let id: ClientId = match args.first() {
        Some(raw) => parse_id(raw, "client")?,
        None => session.require_client()?,
    };
    let removed = session.store.remove_client(id)?;
    if session.active_client == Some(id) {
        session.active_client = None;
        session.active_account = None;
    }
    session.say(format!("Removed client {}", removed.name()));
    Ok(())
}

// ── Accounts ─────────────────────────────────────────────────

fn cmd_account(args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let Some((number, bank)) = args.split_last().filter(|(_, bank)| !bank.is_empty()) else {
        anyhow::bail!("Usage: account <bank> <number>");
    };
    let bank = bank.join(" ");
    let id = session.store.add_account(client, &bank, number)?;
    session.say(format!("Added account {bank} - {number} with ID {id}"));
    Ok(())
}

fn cmd_accounts(_args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let rows: Vec<String> = session
        .store
        .accounts(client)?
        .map(|a| {
            let marker = if Some(a.id()) == session.active_account { "*" } else { " " };
            let period = a
                .period()
                .map_or_else(|| "no transactions".to_string(), |p| p.to_string());
            format!(
                "{marker}{:<4} {:<20} {:<12} {:<25} {:>6}",
                a.id(),
                a.bank(),
                a.number(),
                period,
                a.transactions().len()
            )
        })
        .collect();

    if rows.is_empty() {
        session.say("No accounts");
        return Ok(());
    }
    session.say(format!(
        " {:<4} {:<20} {:<12} {:<25} {:>6}",
        "ID", "Bank", "Number", "Period", "Txns"
    ));
    for row in rows {
        session.say(row);
    }
    Ok(())
}

fn cmd_select(args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let raw = args.first().ok_or_else(|| anyhow::anyhow!("Usage: select <account_id>"))?;
    let id: AccountId = parse_id(raw, "account")?;
    let account = session.store.account(client, id)?;
    let label = format!("{} ({})", account.bank(), account.number());
    session.active_account = Some(id);
    session.say(format!("Active account: {label}"));
    Ok(())
}

fn cmd_rm_account(args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let id: AccountId = match args.first() {
        Some(raw) => parse_id(raw, "account")?,
        None => session.require_account()?.1,
    };
    let removed = session.store.remove_account(client, id)?;
    if session.active_account == Some(id) {
        session.active_account = None;
    }
    session.say(format!("Removed account {} - {}", removed.bank(), removed.number()));
    Ok(())
}

// ── Transactions ─────────────────────────────────────────────

fn cmd_import(args: &[String], session: &mut Session) -> Result<()> {
    let file = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: import <file.csv> [account_id]"))?;
    let (client, account) = match args.get(1) {
        Some(raw) => (session.require_client()?, parse_id(raw, "account")?),
        None => session.require_account()?,
    };

    let path = PathBuf::from(shellexpand(file));
    let records = StatementReader::read_path(&path)?;
    let count = session
        .store
        .import_transactions(client, account, &records)
        .with_context(|| format!("Import of {} rejected", path.display()))?;
    session.say(format!("Imported {count} transactions"));
    Ok(())
}

fn cmd_txns(args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let filter = TransactionFilter {
        account: match args.first().map(String::as_str) {
            None | Some("all") => None,
            Some(raw) => Some(parse_id(raw, "account")?),
        },
        from: parse_bound(args.get(1), &session.settings)?,
        to: parse_bound(args.get(2), &session.settings)?,
    };

    let symbol = session.settings.currency_symbol.clone();
    let rows: Vec<String> = session
        .store
        .filtered_transactions(client, &filter)?
        .into_iter()
        .map(|picked| {
            let txn = picked.transaction;
            format!(
                "{:>3}/{:<4} {} {:<32} {:>14} {:<6} {}",
                picked.account_id,
                picked.index,
                txn.date().format("%Y-%m-%d"),
                format!("{} - {}", picked.bank, txn.memo()),
                format_amount(txn.amount().abs(), &symbol),
                txn.classification(),
                txn.category(),
            )
        })
        .collect();

    if rows.is_empty() {
        session.say("No transactions");
        return Ok(());
    }
    for row in rows {
        session.say(row);
    }
    Ok(())
}

/// Date bound for `txns`; `-` leaves the side open.
fn parse_bound(raw: Option<&String>, settings: &Settings) -> Result<Option<NaiveDate>> {
    let Some(raw) = raw.map(|r| r.trim()).filter(|r| *r != "-") else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, &settings.date_format)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| anyhow::anyhow!("Invalid date: {raw}"))
}

fn cmd_recat(args: &[String], session: &mut Session) -> Result<()> {
    let (client, account) = session.require_account()?;
    let Some((raw_index, category)) = args.split_first().filter(|(_, c)| !c.is_empty()) else {
        anyhow::bail!("Usage: recat <index> <category>");
    };
    let index: usize = raw_index
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction index: {raw_index}"))?;
    let category = category.join(" ");
    session.store.set_category(client, account, index, &category)?;
    let memo = session
        .store
        .transactions(client, account)?
        .get(index)
        .map(|txn| txn.memo().to_string())
        .unwrap_or_default();
    session.say(format!("Transaction {index} ({memo}) moved to {category}"));
    Ok(())
}

// ── Rules ────────────────────────────────────────────────────

fn add_rule(args: &[String], session: &mut Session, is_regex: bool) -> Result<()> {
    let Some((pattern, category)) = args.split_first().filter(|(_, c)| !c.is_empty()) else {
        anyhow::bail!("Usage: rule <pattern> <category>");
    };
    let category = category.join(" ");
    let rule = if is_regex {
        CategoryRule::new_regex(pattern.clone(), category.clone())
    } else {
        CategoryRule::new_contains(pattern.clone(), category.clone())
    };
    session.rules.push(rule);
    session.say(format!("Rule added: '{pattern}' -> {category}"));
    Ok(())
}

fn cmd_rule(args: &[String], session: &mut Session) -> Result<()> {
    add_rule(args, session, false)
}

fn cmd_regex_rule(args: &[String], session: &mut Session) -> Result<()> {
    add_rule(args, session, true)
}

fn cmd_categorize(_args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let (categorizer, bad_patterns) = Categorizer::new(&session.rules);
    if !bad_patterns.is_empty() {
        warn!(patterns = ?bad_patterns, "skipping invalid regex rules");
        session.say(format!(
            "Warning: invalid regex rule(s): {}",
            bad_patterns.join(", ")
        ));
    }
    if categorizer.is_empty() {
        session.say("No rules to apply");
        return Ok(());
    }
    let changed = session.store.apply_rules(client, &categorizer)?;
    let total = session.store.transaction_count(client)?;
    session.say(format!("Categorized {changed}/{total} transactions"));
    if let Some(left) = session.store.summary(client)?.category_total(UNCATEGORIZED) {
        let left = format_amount(left, &session.settings.currency_symbol);
        session.say(format!("Still uncategorized: {left}"));
    }
    Ok(())
}

// ── Reports ──────────────────────────────────────────────────

fn cmd_summary(_args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let snapshot = build_snapshot(&session.store, client, chrono::Utc::now())?;
    let mut buf = Vec::new();
    write_snapshot(
        &snapshot,
        ExportFormat::Text,
        &session.settings.currency_symbol,
        &mut buf,
    )?;
    let text = String::from_utf8(buf).context("Report is not valid UTF-8")?;
    for line in text.lines() {
        session.say(line);
    }
    Ok(())
}

fn cmd_export(args: &[String], session: &mut Session) -> Result<()> {
    let client = session.require_client()?;
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: export <path> [csv|json|xml|text]"))?;
    let path = session.settings.resolve_export_path(raw);
    let format = match args.get(1) {
        Some(name) => ExportFormat::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown export format: {name}"))?,
        None => ExportFormat::from_path(&path).ok_or_else(|| {
            anyhow::anyhow!("Cannot infer format from {}; pass one explicitly", path.display())
        })?,
    };

    let snapshot = build_snapshot(&session.store, client, chrono::Utc::now())?;
    write_export(&path, format, &snapshot, &session.settings.currency_symbol)?;

    info!(client = %client, path = %path.display(), %format, "report exported");
    session.say(format!(
        "Exported {} transactions for {} to {}",
        snapshot.transactions.len(),
        snapshot.client_name,
        path.display()
    ));
    Ok(())
}

fn write_export(
    path: &Path,
    format: ExportFormat,
    snapshot: &Snapshot,
    symbol: &str,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_snapshot(snapshot, format, symbol, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}

// ── Misc ─────────────────────────────────────────────────────

fn cmd_help(_args: &[String], session: &mut Session) -> Result<()> {
    let mut names: Vec<&&str> = COMMANDS.keys().filter(|k| k.len() > 1).collect();
    names.sort();
    let lines: Vec<String> = names
        .into_iter()
        .filter_map(|name| COMMANDS.get(*name))
        .map(|cmd| format!("  {:<36} {}", cmd.usage, cmd.description))
        .collect();
    session.say("Commands:");
    for line in lines {
        session.say(line);
    }
    Ok(())
}

fn cmd_quit(_args: &[String], session: &mut Session) -> Result<()> {
    session.running = false;
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
