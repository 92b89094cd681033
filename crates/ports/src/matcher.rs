//! Signature matcher boundary contract.

/// Result of matching one line of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// The line declares a function.
    Matched {
        /// Function name.
        name: Box<str>,
        /// Raw text between the parentheses.
        parameters: Box<str>,
    },
    /// No rule matched.
    NoMatch,
}

impl LineMatch {
    /// Convenience constructor for a match.
    pub fn matched(name: impl Into<Box<str>>, parameters: impl Into<Box<str>>) -> Self {
        Self::Matched {
            name: name.into(),
            parameters: parameters.into(),
        }
    }
}

/// Applies ordered declaration rules to a line; the first matching rule wins.
pub trait SignatureMatcherPort: Send + Sync {
    /// Match a single line (without its terminator).
    fn match_line(&self, line: &str) -> LineMatch;
}
