//! Path canonicalization boundary contract.

use std::path::Path;

/// Turns editor and filesystem paths into index keys.
///
/// Two paths naming the same file on disk must produce the same key.
/// Implementations never fail: unresolvable paths are normalized lexically.
pub trait PathNormalizerPort: Send + Sync {
    /// Canonical `/`-separated key for `path`.
    fn normalize(&self, path: &Path) -> Box<str>;
}
