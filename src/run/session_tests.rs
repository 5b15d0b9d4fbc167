#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;
use std::io::Write as _;

fn session() -> Session {
    Session::new(Settings::default())
}

fn exec(session: &mut Session, line: &str) -> String {
    handle_command(line, session).unwrap();
    session.take_output().join("\n")
}

fn exec_err(session: &mut Session, line: &str) -> String {
    let err = handle_command(line, session).unwrap_err();
    session.take_output();
    format!("{err:#}")
}

fn statement(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Ana with one account at Banco X, selected.
fn ana_with_account() -> Session {
    let mut s = session();
    exec(&mut s, "client Ana");
    exec(&mut s, "use 1");
    exec(&mut s, "account \"Banco X\" 001");
    exec(&mut s, "select 1");
    s
}

// ── Dispatch ─────────────────────────────────────────────────

#[test]
fn test_unknown_command_suggests_closest() {
    let mut s = session();
    let msg = exec_err(&mut s, "acounts");
    assert!(msg.contains("Unknown command: acounts"));
    assert!(msg.contains("Did you mean accounts?"));
}

#[test]
fn test_empty_line_is_noop() {
    let mut s = session();
    assert_eq!(exec(&mut s, ""), "");
}

#[test]
fn test_unbalanced_quotes_error() {
    let mut s = session();
    let msg = exec_err(&mut s, "client \"Ana");
    assert!(msg.contains("Could not split command line"));
}

#[test]
fn test_suggestion_ties_break_by_name() {
    // each input is equally far from both candidates
    assert_eq!(find_closest("heit"), "help");
    assert_eq!(find_closest("txit"), "quit");
    assert_eq!(find_closest("clientz"), "client");
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn test_help_lists_commands() {
    let mut s = session();
    let out = exec(&mut s, "help");
    assert!(out.contains("import <file.csv> [account_id]"));
    assert!(out.contains("export <path>"));
}

#[test]
fn test_quit_stops_session() {
    let mut s = session();
    exec(&mut s, "q");
    assert!(!s.running);
}

// ── Clients & accounts ───────────────────────────────────────

#[test]
fn test_client_lifecycle() {
    let mut s = session();
    assert_eq!(exec(&mut s, "client Ana Souza"), "Added client Ana Souza with ID 1");
    assert!(exec(&mut s, "clients").contains("Ana Souza"));

    let msg = exec_err(&mut s, "client \"  \"");
    assert!(msg.contains("Invalid input"));

    exec(&mut s, "use 1");
    assert_eq!(s.active_client, Some(ClientId(1)));
    exec(&mut s, "rm-client");
    assert_eq!(s.active_client, None);
    assert_eq!(exec(&mut s, "clients"), "No clients");
}

#[test]
fn test_use_unknown_client() {
    let mut s = session();
    assert!(exec_err(&mut s, "use 4").contains("Client not found: 4"));
    assert!(exec_err(&mut s, "use abc").contains("Invalid client id: abc"));
}

#[test]
fn test_account_requires_client() {
    let mut s = session();
    assert!(exec_err(&mut s, "account Itau 123").contains("No client selected"));
}

#[test]
fn test_account_with_multiword_bank() {
    let mut s = session();
    exec(&mut s, "client Ana");
    exec(&mut s, "use 1");
    let out = exec(&mut s, "account Banco do Brasil 12-3");
    assert_eq!(out, "Added account Banco do Brasil - 12-3 with ID 1");
    let listing = exec(&mut s, "accounts");
    assert!(listing.contains("Banco do Brasil"));
    assert!(listing.contains("no transactions"));
}

#[test]
fn test_removing_active_account_clears_selection() {
    let mut s = ana_with_account();
    assert_eq!(s.active_account, Some(AccountId(1)));
    exec(&mut s, "rm-account 1");
    assert_eq!(s.active_account, None);
    assert_eq!(s.active_client, Some(ClientId(1)));
    assert!(exec_err(&mut s, "select 1").contains("Account not found: 1"));
}

#[test]
fn test_switching_client_clears_account() {
    let mut s = ana_with_account();
    exec(&mut s, "client Bruno");
    exec(&mut s, "use 2");
    assert_eq!(s.active_account, None);
}

// ── Import & categorization ──────────────────────────────────

#[test]
fn test_import_updates_summary() {
    let mut s = ana_with_account();
    let file = statement("date,amount,memo\n2024-01-05,1000,salary\n2024-01-10,-200,market\n");
    let out = exec(&mut s, &format!("import {}", file.path().display()));
    assert_eq!(out, "Imported 2 transactions");

    let summary = s.store.summary(ClientId(1)).unwrap();
    assert_eq!(summary.income, dec!(1000));
    assert_eq!(summary.expense, dec!(200));
    assert_eq!(summary.net, dec!(800));

    let txns = exec(&mut s, "txns");
    assert!(txns.contains("Banco X - salary"));
    assert!(txns.contains("DEBIT"));
}

#[test]
fn test_txns_filters_by_account_and_dates() {
    let mut s = ana_with_account();
    exec(&mut s, "account Nubank 777");
    let first = statement("2024-01-01,10,opening\n2024-01-31,-4,month end\n");
    let second = statement("2024-02-01,7,pix\n");
    exec(&mut s, &format!("import {} 1", first.path().display()));
    exec(&mut s, &format!("import {} 2", second.path().display()));

    let only_second = exec(&mut s, "txns 2");
    assert!(only_second.contains("Nubank - pix"));
    assert!(!only_second.contains("opening"));

    let window = exec(&mut s, "txns all 2024-01-31 2024-02-01");
    assert!(!window.contains("opening"));
    assert!(window.contains("month end"));
    assert!(window.contains("pix"));

    let open_start = exec(&mut s, "txns all - 2024-01-01");
    assert_eq!(open_start.lines().count(), 1);
    assert!(open_start.contains("opening"));

    assert_eq!(exec(&mut s, "txns 1 2024-03-01"), "No transactions");
}

#[test]
fn test_txns_filter_errors() {
    let mut s = ana_with_account();
    assert!(exec_err(&mut s, "txns 7").contains("Account not found: 7"));
    assert!(exec_err(&mut s, "txns all 2024-13-01").contains("Invalid date: 2024-13-01"));
    assert!(exec_err(&mut s, "txns all 2024-02-01 2024-01-01").contains("date range starts after it ends"));
}

#[test]
fn test_import_malformed_row_is_rejected() {
    let mut s = ana_with_account();
    let file = statement("date,amount,memo\n2024-01-05,1000,salary\n2024-01-06,abc,bad\n");
    let msg = exec_err(&mut s, &format!("import {}", file.path().display()));
    assert!(msg.contains("Malformed record at position 1"));
    assert_eq!(s.store.transaction_count(ClientId(1)).unwrap(), 0);
}

#[test]
fn test_import_into_named_account() {
    let mut s = ana_with_account();
    exec(&mut s, "account Nubank 777");
    let file = statement("2024-03-01,50.25,pix\n");
    exec(&mut s, &format!("import {} 2", file.path().display()));
    let account = s.store.account(ClientId(1), AccountId(2)).unwrap();
    assert_eq!(account.transactions().len(), 1);
}

#[test]
fn test_import_without_account_selected() {
    let mut s = session();
    exec(&mut s, "client Ana");
    exec(&mut s, "use 1");
    let file = statement("2024-03-01,50,pix\n");
    let msg = exec_err(&mut s, &format!("import {}", file.path().display()));
    assert!(msg.contains("No account selected"));
}

#[test]
fn test_rules_and_recat() {
    let mut s = ana_with_account();
    let file = statement("2024-01-05,1000,ACME PAYROLL\n2024-01-10,-80,Uber trip\n2024-01-11,-20,kiosk\n");
    exec(&mut s, &format!("import {}", file.path().display()));

    exec(&mut s, "rule payroll Salary");
    exec(&mut s, "regex-rule \"^uber\" Transport");
    let out = exec(&mut s, "categorize");
    assert!(out.starts_with("Categorized 2/3 transactions"));
    assert!(out.contains("Still uncategorized: -$20.00"));

    let out = exec(&mut s, "recat 2 Food and Drink");
    assert_eq!(out, "Transaction 2 (kiosk) moved to Food and Drink");
    let summary = s.store.summary(ClientId(1)).unwrap();
    assert_eq!(summary.category_total("Salary"), Some(dec!(1000)));
    assert_eq!(summary.category_total("Transport"), Some(dec!(-80)));
    assert_eq!(summary.category_total("Food and Drink"), Some(dec!(-20)));
    assert_eq!(summary.category_total("Uncategorized"), None);

    assert!(exec_err(&mut s, "recat 9 Misc").contains("Transaction not found"));
}

#[test]
fn test_categorize_reports_bad_regex() {
    let mut s = ana_with_account();
    exec(&mut s, "regex-rule \"[unclosed\" Broken");
    let out = exec(&mut s, "categorize");
    assert!(out.contains("invalid regex rule(s): [unclosed"));
    assert!(out.contains("No rules to apply"));
}

// ── Reports ──────────────────────────────────────────────────

#[test]
fn test_summary_prints_report() {
    let mut s = ana_with_account();
    let file = statement("2024-01-05,1000,salary\n");
    exec(&mut s, &format!("import {}", file.path().display()));
    let out = exec(&mut s, "summary");
    assert!(out.starts_with("Balance Report"));
    assert!(out.contains("Income:     $1,000.00"));
}

#[test]
fn test_export_infers_format_from_extension() {
    let mut s = ana_with_account();
    let file = statement("2024-01-05,1000,salary\n2024-01-10,-200,market\n");
    exec(&mut s, &format!("import {}", file.path().display()));

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out").join("ana.xml");
    let out = exec(&mut s, &format!("export {}", target.display()));
    assert!(out.starts_with("Exported 2 transactions for Ana"));

    let xml = std::fs::read_to_string(&target).unwrap();
    assert!(xml.contains("<net>800</net>"));
}

#[test]
fn test_export_explicit_format() {
    let mut s = ana_with_account();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ana.out");
    exec(&mut s, &format!("export {} json", target.display()));
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(value["client_name"], "Ana");
    assert!(value["transactions"].as_array().unwrap().is_empty());
}

#[test]
fn test_export_unknown_format() {
    let mut s = ana_with_account();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ana");
    assert!(exec_err(&mut s, &format!("export {}", target.display())).contains("Cannot infer format"));
    assert!(exec_err(&mut s, &format!("export {} pdf", target.display()))
        .contains("Unknown export format: pdf"));
}

#[test]
fn test_export_into_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = Session::new(Settings {
        export_dir: Some(dir.path().to_path_buf()),
        ..Settings::default()
    });
    exec(&mut s, "client Ana");
    exec(&mut s, "use 1");
    exec(&mut s, "export ana.csv");
    let csv = std::fs::read_to_string(dir.path().join("ana.csv")).unwrap();
    assert!(csv.starts_with("date,account,bank,number,memo,amount,kind,category"));
}
