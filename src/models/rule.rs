/// Memo pattern that assigns a category label.
#[derive(Debug, Clone)]
pub(crate) struct CategoryRule {
    pub(crate) pattern: String,
    pub(crate) category: String,
    pub(crate) is_regex: bool,
}

impl CategoryRule {
    pub(crate) fn new_contains(pattern: String, category: String) -> Self {
        Self {
            pattern,
            category,
            is_regex: false,
        }
    }

    pub(crate) fn new_regex(pattern: String, category: String) -> Self {
        Self {
            pattern,
            category,
            is_regex: true,
        }
    }
}
