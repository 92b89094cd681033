//! Lexical path helpers.
//!
//! Paths inside the index are plain strings with `/` separators. These helpers
//! never touch the filesystem; symlink resolution lives behind
//! `PathNormalizerPort` in the adapters crate.

/// Normalize a path lexically: unify separators to `/`, drop `.` segments and
/// empty segments, resolve `..` against preceding segments, and fold case on
/// case-insensitive platforms.
#[must_use]
pub fn normalize_lexical(path: &str) -> Box<str> {
    let unified = path.trim().replace('\\', "/");
    let (prefix, rest) = split_root(&unified);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {},
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                },
                _ if prefix.is_empty() => segments.push(".."),
                _ => {},
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    let normalized = match (prefix.is_empty(), joined.is_empty()) {
        (true, true) => ".".to_owned(),
        (true, false) => joined,
        (false, _) => format!("{prefix}{joined}"),
    };
    fold_case(normalized).into_boxed_str()
}

/// Splits off the absolute root (`/` or a `C:/` drive) from a `/`-separated path.
fn split_root(path: &str) -> (String, &str) {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2
        && bytes.first().is_some_and(u8::is_ascii_alphabetic)
        && bytes.get(1) == Some(&b':');
    if has_drive {
        let drive = path.get(..2).unwrap_or_default();
        let rest = path.get(2..).unwrap_or_default();
        return (format!("{drive}/"), rest);
    }
    path.strip_prefix('/')
        .map_or((String::new(), path), |rest| ("/".to_owned(), rest))
}

#[cfg(windows)]
fn fold_case(path: String) -> String {
    path.to_lowercase()
}

#[cfg(not(windows))]
const fn fold_case(path: String) -> String {
    path
}

/// True when `path` equals `ancestor` or lies beneath it on a segment boundary.
///
/// `/proj` contains `/proj/src` but not `/project`.
#[must_use]
pub fn is_descendant_or_equal(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || ancestor.ends_with('/'))
}

/// Final path segment, or the empty string for a bare root.
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed
        .rsplit_once('/')
        .map_or(trimmed, |(_, name)| name)
}

/// Parent directory of a normalized path, keeping the root separator.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    let index = trimmed.rfind('/')?;
    let head = trimmed.get(..index).unwrap_or_default();
    if head.is_empty() || (head.len() == 2 && head.ends_with(':')) {
        return trimmed.get(..=index);
    }
    Some(head)
}
