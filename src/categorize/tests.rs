#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{CategoryRule, Transaction, UNCATEGORIZED};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn make_rule(pattern: &str, category: &str) -> CategoryRule {
    CategoryRule::new_contains(pattern.to_string(), category.to_string())
}

fn make_regex_rule(pattern: &str, category: &str) -> CategoryRule {
    CategoryRule::new_regex(pattern.to_string(), category.to_string())
}

fn make_txn(memo: &str) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        dec!(-10.00),
        memo.into(),
    )
}

fn build(rules: &[CategoryRule]) -> Categorizer {
    let (cat, bad) = Categorizer::new(rules);
    assert!(bad.is_empty());
    cat
}

// ── Categorizer ───────────────────────────────────────────────

#[test]
fn test_categorize_contains_match() {
    let cat = build(&[make_rule("coffee", "Coffee"), make_rule("amazon", "Shopping")]);
    assert_eq!(cat.categorize("STARBUCKS COFFEE #123"), Some("Coffee"));
    assert_eq!(cat.categorize("AMAZON.COM PURCHASE"), Some("Shopping"));
}

#[test]
fn test_categorize_case_insensitive() {
    let cat = build(&[make_rule("Coffee", "Coffee")]);
    assert_eq!(cat.categorize("coffee shop"), Some("Coffee"));
    assert_eq!(cat.categorize("COFFEE SHOP"), Some("Coffee"));
}

#[test]
fn test_categorize_no_match() {
    let cat = build(&[make_rule("coffee", "Coffee")]);
    assert_eq!(cat.categorize("GROCERY STORE"), None);
}

#[test]
fn test_categorize_first_match_wins() {
    let cat = build(&[make_rule("shop", "Shopping"), make_rule("coffee shop", "Coffee")]);
    assert_eq!(cat.categorize("Coffee Shop"), Some("Shopping"));
}

#[test]
fn test_categorize_regex() {
    let cat = build(&[make_regex_rule(r"^AMZN.*MKTP", "Shopping")]);
    assert_eq!(cat.categorize("AMZN MKTP US*2A1B3C"), Some("Shopping"));
    assert_eq!(cat.categorize("AMAZON.COM"), None);
}

#[test]
fn test_categorize_regex_case_insensitive() {
    let cat = build(&[make_regex_rule(r"STARBUCKS", "Coffee")]);
    assert_eq!(cat.categorize("starbucks coffee"), Some("Coffee"));
    assert_eq!(cat.categorize("Starbucks Coffee"), Some("Coffee"));
}

#[test]
fn test_invalid_regex_reported_and_skipped() {
    let (cat, bad) = Categorizer::new(&[
        make_regex_rule(r"[invalid", "Broken"),
        make_rule("rent", "Housing"),
    ]);
    assert_eq!(bad, vec!["[invalid".to_string()]);
    assert_eq!(cat.categorize("[invalid"), None);
    assert_eq!(cat.categorize("RENT JAN"), Some("Housing"));
}

#[test]
fn test_empty_rules() {
    let cat = build(&[]);
    assert!(cat.is_empty());
    assert_eq!(cat.categorize("anything"), None);
}

// ── Batch categorization ──────────────────────────────────────

#[test]
fn test_categorize_batch() {
    let cat = build(&[make_rule("coffee", "Coffee"), make_rule("grocery", "Groceries")]);
    let mut txns = vec![
        make_txn("COFFEE SHOP"),
        make_txn("GROCERY STORE"),
        make_txn("UNKNOWN MERCHANT"),
    ];
    let changed = cat.categorize_batch(txns.iter_mut());
    assert_eq!(changed, 2);
    assert_eq!(txns[0].category(), "Coffee");
    assert_eq!(txns[1].category(), "Groceries");
    assert_eq!(txns[2].category(), UNCATEGORIZED);
}

#[test]
fn test_categorize_batch_preserves_existing() {
    let cat = build(&[make_rule("coffee", "Coffee")]);
    let mut txns = vec![make_txn("COFFEE SHOP")];
    txns[0].set_category("Client Meetings".into());
    assert_eq!(cat.categorize_batch(txns.iter_mut()), 0);
    assert_eq!(txns[0].category(), "Client Meetings");
}

#[test]
fn test_categorize_batch_empty() {
    let cat = build(&[make_rule("coffee", "Coffee")]);
    let mut txns: Vec<Transaction> = vec![];
    assert_eq!(cat.categorize_batch(txns.iter_mut()), 0);
}
