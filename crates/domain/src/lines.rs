//! Line splitting for the candidate length filter.
//!
//! A line's measured length counts its terminator (`\n` or `\r\n`) when one
//! is present, so a 299-character line followed by a newline measures 300.

/// One line of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Line content without its terminator.
    pub content: &'a str,
    /// Character count including the terminator.
    pub measured_len: usize,
}

impl SourceLine<'_> {
    /// Returns true when the measured length is below `max`.
    #[must_use]
    pub const fn shorter_than(&self, max: usize) -> bool {
        self.measured_len < max
    }
}

/// Split `text` into lines, keeping terminator-inclusive lengths.
pub fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.split_inclusive('\n').map(|raw| {
        let content = raw
            .strip_suffix('\n')
            .map_or(raw, |rest| rest.strip_suffix('\r').unwrap_or(rest));
        SourceLine {
            content,
            measured_len: raw.chars().count(),
        }
    })
}
