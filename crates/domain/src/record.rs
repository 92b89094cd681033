//! Per-file signature records.

use crate::signature::FunctionSignature;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, deduplicated signatures extracted from one file.
///
/// Records are immutable; re-parsing a file produces a new record that
/// replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileRecord(Arc<[FunctionSignature]>);

impl FileRecord {
    /// An empty record (a parsed file without declarations).
    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Collect signatures, keeping the first occurrence of each
    /// `(name, parameters)` pair.
    pub fn from_signatures(signatures: impl IntoIterator<Item = FunctionSignature>) -> Self {
        let mut builder = FileRecordBuilder::default();
        for signature in signatures {
            builder.push(signature);
        }
        builder.build()
    }

    /// Borrow the signatures in first-occurrence order.
    #[must_use]
    pub fn signatures(&self) -> &[FunctionSignature] {
        &self.0
    }

    /// Iterate over the signatures.
    pub fn iter(&self) -> std::slice::Iter<'_, FunctionSignature> {
        self.0.iter()
    }

    /// Number of distinct declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the file declared nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FileRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a FileRecord {
    type Item = &'a FunctionSignature;
    type IntoIter = std::slice::Iter<'a, FunctionSignature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Incremental builder used while reading a file line by line.
#[derive(Debug, Default)]
pub struct FileRecordBuilder {
    seen: HashSet<(Box<str>, Box<str>)>,
    entries: Vec<FunctionSignature>,
}

impl FileRecordBuilder {
    /// Append a signature unless its `(name, parameters)` was already seen.
    /// Returns true when the signature was kept.
    pub fn push(&mut self, signature: FunctionSignature) -> bool {
        let key = (
            Box::<str>::from(signature.name()),
            Box::<str>::from(signature.parameters()),
        );
        if !self.seen.insert(key) {
            return false;
        }
        self.entries.push(signature);
        true
    }

    /// Freeze into an immutable record.
    #[must_use]
    pub fn build(self) -> FileRecord {
        FileRecord(Arc::from(self.entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_declarations_keep_first_occurrence() {
        let record = FileRecord::from_signatures([
            FunctionSignature::new("foo", "a", "x.js"),
            FunctionSignature::new("bar", "", "x.js"),
            FunctionSignature::new("foo", "a", "x.js"),
            FunctionSignature::new("foo", "a, b", "x.js"),
        ]);

        let names: Vec<(&str, &str)> = record
            .iter()
            .map(|signature| (signature.name(), signature.parameters()))
            .collect();
        assert_eq!(names, vec![("foo", "a"), ("bar", ""), ("foo", "a, b")]);
    }

    #[test]
    fn clones_share_memoized_completions() {
        let record = FileRecord::from_signatures([FunctionSignature::new("foo", "a", "x.js")]);
        let clone = record.clone();
        let original = record.signatures().first().map(FunctionSignature::completion);
        let shared = clone.signatures().first().map(FunctionSignature::completion);
        assert!(matches!((original, shared), (Some(a), Some(b)) if std::ptr::eq(a, b)));
    }

    #[test]
    fn builder_reports_rejected_duplicates() {
        let mut builder = FileRecordBuilder::default();
        assert!(builder.push(FunctionSignature::new("foo", "", "x.js")));
        assert!(!builder.push(FunctionSignature::new("foo", "", "x.js")));
        assert_eq!(builder.build().len(), 1);
    }
}
