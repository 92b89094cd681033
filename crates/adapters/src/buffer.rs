//! Live symbols from unsaved editor buffers.

use regex::Regex;
use sigdex_domain::{FileRecordBuilder, FunctionSignature, LiveBufferSymbols, source_lines};
use sigdex_ports::{LineMatch, SignatureMatcherPort};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

// `var x =`, `let x =`, `const x =`, `.x =`, and `x:` preceded by a boundary.
static ASSIGNMENT_TARGET: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"(?:\b(?:var|let|const)\s+|\.|^|[\s{,(])(?P<name>[A-Za-z_$][\w$]*)\s*(?P<op>[=:])",
    )
});

/// Scans buffer text for function declarations and assignment targets.
#[derive(Clone)]
pub struct BufferSymbolScanner {
    matcher: Arc<dyn SignatureMatcherPort>,
    max_line_length: usize,
}

impl BufferSymbolScanner {
    /// Build a scanner sharing the indexer's matcher and line limit.
    pub fn new(matcher: Arc<dyn SignatureMatcherPort>, max_line_length: usize) -> Self {
        Self {
            matcher,
            max_line_length,
        }
    }

    /// Collect symbols from `text`; function signatures are labelled with
    /// `location`.
    pub fn scan(&self, text: &str, location: &str) -> LiveBufferSymbols {
        let mut functions = FileRecordBuilder::default();
        let mut seen_variables = HashSet::new();
        let mut variables = Vec::new();

        for source_line in source_lines(text) {
            let line = source_line.content;
            if source_line.shorter_than(self.max_line_length) && line.contains("function") {
                if let LineMatch::Matched { name, parameters } = self.matcher.match_line(line) {
                    functions.push(FunctionSignature::new(name, parameters, location));
                }
            }
            for name in assignment_targets(line) {
                if name.chars().count() > 1 && seen_variables.insert(name) {
                    variables.push(Box::from(name));
                }
            }
        }

        LiveBufferSymbols {
            functions: functions.build().signatures().to_vec(),
            variables,
        }
    }
}

fn assignment_targets(line: &str) -> Vec<&str> {
    let Ok(pattern) = ASSIGNMENT_TARGET.as_ref() else {
        return Vec::new();
    };
    pattern
        .captures_iter(line)
        .filter_map(|captures| {
            let name = captures.name("name")?;
            let op = captures.name("op")?;
            let rest = line.get(op.end()..).unwrap_or_default();
            let is_comparison_or_arrow = op.as_str() == "=" && rest.starts_with(['=', '>']);
            (!is_comparison_or_arrow).then_some(name.as_str())
        })
        .collect()
}
