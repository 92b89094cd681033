//! Exclusion boundary contract.

/// Decides whether a normalized path is excluded from indexing.
pub trait ExclusionPort: Send + Sync {
    /// Returns true when any configured rule matches `normalized_path`.
    fn is_excluded(&self, normalized_path: &str) -> bool;
}
