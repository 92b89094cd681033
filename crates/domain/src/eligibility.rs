//! Which files count as indexable script sources.

use crate::paths::basename;

/// Extension and minified-file policy applied to crawl candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypePolicy {
    extensions: Vec<Box<str>>,
    skip_minified: bool,
}

impl FileTypePolicy {
    /// Build a policy. Extensions are compared without a leading dot and
    /// ignoring ASCII case.
    pub fn new<I, S>(extensions: I, skip_minified: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<Box<str>> = extensions
            .into_iter()
            .map(|extension| {
                extension
                    .as_ref()
                    .trim()
                    .trim_start_matches('.')
                    .to_ascii_lowercase()
                    .into_boxed_str()
            })
            .filter(|extension| !extension.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self {
            extensions: normalized,
            skip_minified,
        }
    }

    /// Accepted extensions, lowercased and sorted.
    #[must_use]
    pub fn extensions(&self) -> &[Box<str>] {
        &self.extensions
    }

    /// True when the file named by `path` should be indexed.
    #[must_use]
    pub fn is_eligible(&self, path: &str) -> bool {
        let name = basename(path);
        let Some((_, extension)) = name.rsplit_once('.') else {
            return false;
        };
        if self.skip_minified && name.contains(".min.") {
            return false;
        }
        self.extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }
}

impl Default for FileTypePolicy {
    fn default() -> Self {
        Self::new(["js"], true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_accepts_plain_scripts() {
        let policy = FileTypePolicy::default();
        assert!(policy.is_eligible("/proj/app.js"));
        assert!(policy.is_eligible("/proj/APP.JS"));
        assert!(!policy.is_eligible("/proj/app.ts"));
        assert!(!policy.is_eligible("/proj/js"));
        assert!(!policy.is_eligible("/proj/vendor.min.js"));
    }

    #[test]
    fn minified_files_allowed_when_configured() {
        let policy = FileTypePolicy::new([".js", "MJS", ""], false);
        assert_eq!(policy.extensions().len(), 2);
        assert!(policy.is_eligible("/proj/vendor.min.js"));
        assert!(policy.is_eligible("/proj/module.mjs"));
    }

    #[test]
    fn minified_check_only_looks_at_the_file_name() {
        let policy = FileTypePolicy::default();
        assert!(policy.is_eligible("/proj/lib.min.d/app.js"));
    }
}
