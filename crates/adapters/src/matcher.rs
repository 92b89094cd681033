//! Regex-backed signature matcher.

use regex::Regex;
use sigdex_ports::{LineMatch, LoggerPort, SignatureMatcherPort, log_fields};
use sigdex_shared::{ErrorCode, ErrorEnvelope};
use std::sync::LazyLock;

/// Built-in declaration rules, tried in order.
///
/// 1. `name = function (params)` and `name: function (params)`
/// 2. `function name (params)`
pub const DEFAULT_SIGNATURE_PATTERNS: [&str; 2] = [
    r"(?P<name>\w+)\s*[:=]\s*function\s*\((?P<params>[^)]*)\)",
    r"function\s*(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
];

const NAME_GROUP: &str = "name";
const PARAMS_GROUP: &str = "params";

static BUILTIN_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_SIGNATURE_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// A configured pattern that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The pattern is not a valid regular expression.
    #[error("signature pattern #{index} does not compile: {source}")]
    MalformedPattern {
        /// Position in the configured list.
        index: usize,
        /// Pattern text.
        pattern: Box<str>,
        /// Regex compiler error.
        #[source]
        source: regex::Error,
    },
    /// The pattern compiles but lacks a required named group.
    #[error("signature pattern #{index} lacks the `{group}` capture group")]
    MissingGroup {
        /// Position in the configured list.
        index: usize,
        /// Pattern text.
        pattern: Box<str>,
        /// Name of the missing group.
        group: &'static str,
    },
}

impl MatcherError {
    /// Pattern text that failed.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::MalformedPattern { pattern, .. } | Self::MissingGroup { pattern, .. } => pattern,
        }
    }
}

impl From<MatcherError> for ErrorEnvelope {
    fn from(error: MatcherError) -> Self {
        let pattern = error.pattern().to_owned();
        Self::expected(ErrorCode::malformed_pattern(), error.to_string())
            .with_metadata("pattern", pattern)
    }
}

/// Ordered regex rules with named groups `name` and `params`.
#[derive(Debug, Clone)]
pub struct RegexSignatureMatcher {
    rules: Vec<Regex>,
}

impl RegexSignatureMatcher {
    /// Compile custom rules. Every rule must compile and declare both groups.
    pub fn new<I, S>(patterns: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for (index, pattern) in patterns.into_iter().enumerate() {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| MatcherError::MalformedPattern {
                index,
                pattern: pattern.into(),
                source,
            })?;
            for group in [NAME_GROUP, PARAMS_GROUP] {
                if !regex.capture_names().flatten().any(|name| name == group) {
                    return Err(MatcherError::MissingGroup {
                        index,
                        pattern: pattern.into(),
                        group,
                    });
                }
            }
            rules.push(regex);
        }
        Ok(Self { rules })
    }

    /// The built-in rule set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    /// Use `patterns` when all of them are valid, otherwise report the first
    /// problem once and fall back to the built-in rules. An empty list selects
    /// the built-in rules silently.
    pub fn from_patterns_or_default(patterns: &[Box<str>], logger: &dyn LoggerPort) -> Self {
        if patterns.is_empty() {
            return Self::builtin();
        }
        match Self::new(patterns) {
            Ok(matcher) => matcher,
            Err(error) => {
                let envelope = ErrorEnvelope::from(error);
                logger.warn(
                    "config.pattern.malformed",
                    &format!("{}; using built-in signature rules", envelope.message),
                    Some(log_fields([
                        ("code", envelope.code.to_string()),
                        (
                            "pattern",
                            envelope.metadata.get("pattern").cloned().unwrap_or_default(),
                        ),
                    ])),
                );
                Self::builtin()
            },
        }
    }
}

impl Default for RegexSignatureMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SignatureMatcherPort for RegexSignatureMatcher {
    fn match_line(&self, line: &str) -> LineMatch {
        for rule in &self.rules {
            let Some(captures) = rule.captures(line) else {
                continue;
            };
            let name = captures.name(NAME_GROUP).map_or("", |group| group.as_str());
            let parameters = captures
                .name(PARAMS_GROUP)
                .map_or("", |group| group.as_str());
            return LineMatch::matched(name, parameters);
        }
        LineMatch::NoMatch
    }
}
