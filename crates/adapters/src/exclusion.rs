//! Substring exclusion filter.

use sigdex_ports::ExclusionPort;

/// Excludes any path containing one of the configured substrings.
///
/// Rules and paths are compared after trimming, lowercasing, and unifying
/// separators, so `Node_Modules\` matches `/proj/node_modules/x.js`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstringExclusionFilter {
    rules: Vec<Box<str>>,
}

impl SubstringExclusionFilter {
    /// Build a filter; blank rules are dropped.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<Box<str>> = rules
            .into_iter()
            .map(|rule| normalize_for_match(rule.as_ref()).into_boxed_str())
            .filter(|rule| !rule.is_empty())
            .collect();
        normalized.dedup();
        Self { rules: normalized }
    }

    /// Normalized rules in configuration order.
    #[must_use]
    pub fn rules(&self) -> &[Box<str>] {
        &self.rules
    }
}

impl ExclusionPort for SubstringExclusionFilter {
    fn is_excluded(&self, normalized_path: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let candidate = normalize_for_match(normalized_path);
        self.rules.iter().any(|rule| candidate.contains(&**rule))
    }
}

fn normalize_for_match(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace('\\', "/")
        .replace("//", "/")
}
