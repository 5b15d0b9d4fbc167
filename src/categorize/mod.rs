use regex::{Regex, RegexBuilder};

use crate::models::{CategoryRule, Transaction};

/// Compiled category rules. Rules are tried in insertion order and the first
/// match wins.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: String,
    regex: Option<Regex>,
    category: String,
}

impl Categorizer {
    /// Compile the rules. Regex rules that fail to compile are dropped and
    /// their patterns returned alongside the categorizer.
    pub(crate) fn new(rules: &[CategoryRule]) -> (Self, Vec<String>) {
        let mut bad_patterns = Vec::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let regex = if rule.is_regex {
                match RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                {
                    Ok(re) => Some(re),
                    Err(_) => {
                        bad_patterns.push(rule.pattern.clone());
                        continue;
                    }
                }
            } else {
                None
            };
            compiled.push(CompiledRule {
                pattern: rule.pattern.to_lowercase(),
                regex,
                category: rule.category.clone(),
            });
        }

        (Self { rules: compiled }, bad_patterns)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn categorize(&self, memo: &str) -> Option<&str> {
        let memo_lower = memo.to_lowercase();

        self.rules
            .iter()
            .find(|rule| match &rule.regex {
                Some(re) => re.is_match(memo),
                None => memo_lower.contains(&rule.pattern),
            })
            .map(|rule| rule.category.as_str())
    }

    /// Assign categories to transactions still carrying the uncategorized
    /// label. Returns how many were changed.
    pub(crate) fn categorize_batch<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a mut Transaction>,
    ) -> usize {
        let mut changed = 0;
        for txn in transactions {
            if !txn.is_uncategorized() {
                continue;
            }
            if let Some(category) = self.categorize(txn.memo()) {
                txn.set_category(category.to_string());
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests;
