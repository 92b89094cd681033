//! Folder-set reduction for crawl roots.

use crate::paths::is_descendant_or_equal;
use serde::Serialize;
use std::collections::BTreeSet;

/// A set of normalized folders where no member lies beneath another.
///
/// Compared by value; the coordinator keeps the last crawled set and
/// rescans when a freshly reduced set differs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FolderSet(BTreeSet<Box<str>>);

impl FolderSet {
    /// Reduce arbitrary folders into a covering set.
    pub fn reduce<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(reduce_folders(folders))
    }

    /// Iterate in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AsRef::as_ref)
    }

    /// Number of folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no folder is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owned folders in lexical order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Box<str>> {
        self.0.iter().cloned().collect()
    }
}

/// Drop every folder that is equal to or beneath another folder in the input.
///
/// The result does not depend on input order and is idempotent.
pub fn reduce_folders<I, S>(folders: I) -> BTreeSet<Box<str>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<Box<str>> = Vec::new();
    for folder in folders {
        let candidate = folder.as_ref();
        if kept
            .iter()
            .any(|existing| is_descendant_or_equal(candidate, existing))
        {
            continue;
        }
        kept.retain(|existing| !is_descendant_or_equal(existing, candidate));
        kept.push(Box::from(candidate));
    }
    kept.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_folders_collapse_to_ancestor() {
        let reduced = reduce_folders(["/proj/src", "/proj", "/other"]);
        let expected: BTreeSet<Box<str>> = ["/other", "/proj"].into_iter().map(Box::from).collect();
        assert_eq!(reduced, expected);
    }

    #[test]
    fn sibling_prefixes_are_not_descendants() {
        let reduced = FolderSet::reduce(["/proj", "/project", "/proj"]);
        assert_eq!(reduced.iter().collect::<Vec<_>>(), vec!["/proj", "/project"]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(FolderSet::reduce(Vec::<String>::new()).is_empty());
    }
}
