//! Function signatures and the completion entries derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// A completion candidate as presented to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionEntry {
    /// Text shown in the completion popup.
    pub label: Box<str>,
    /// Snippet inserted when the entry is accepted.
    pub template: Box<str>,
}

impl CompletionEntry {
    /// Build an entry from explicit parts.
    pub fn new(label: impl Into<Box<str>>, template: impl Into<Box<str>>) -> Self {
        Self {
            label: label.into(),
            template: template.into(),
        }
    }

    /// Entry for a function: label `name(params)\t<location>`, template with
    /// one numbered placeholder per comma-separated parameter.
    #[must_use]
    pub fn for_function(name: &str, parameters: &str, location: &str) -> Self {
        let label = format!("{name}({parameters})\t{location}");
        let template = if parameters.trim().is_empty() {
            format!("{name}()")
        } else {
            let placeholders = parameters
                .split(',')
                .enumerate()
                .map(|(index, parameter)| format!("${{{}:{}}}", index + 1, parameter.trim()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{name}({placeholders})")
        };
        Self::new(label, template)
    }

    /// Entry for a variable seen in a live buffer.
    #[must_use]
    pub fn for_variable(name: &str, location: &str) -> Self {
        Self::new(format!("{name}\t{location}"), name)
    }

    /// Entry for a configured always-on snippet.
    ///
    /// The label is the template with each `${n:text}` placeholder replaced by
    /// `text`; bare `${n}` placeholders are dropped.
    #[must_use]
    pub fn always_on(template: &str) -> Self {
        Self::new(strip_placeholders(template), template)
    }
}

impl fmt::Display for CompletionEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} => {}", self.label, self.template)
    }
}

fn strip_placeholders(template: &str) -> String {
    let mut label = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let (before, from_marker) = rest.split_at(start);
        label.push_str(before);
        let body = from_marker.get(2..).unwrap_or_default();
        let Some(end) = body.find('}') else {
            label.push_str(from_marker);
            return label;
        };
        let placeholder = body.get(..end).unwrap_or_default();
        if let Some((_, text)) = placeholder.split_once(':') {
            label.push_str(text);
        }
        rest = body.get(end + 1..).unwrap_or_default();
    }
    label.push_str(rest);
    label
}

/// A function declaration extracted from one line of source text.
///
/// Identity is `(name, parameters, location)`; the completion entry is
/// computed on first use and shared by every clone made afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSignature {
    name: Box<str>,
    parameters: Box<str>,
    location: Box<str>,
    #[serde(skip)]
    completion: OnceLock<CompletionEntry>,
}

impl FunctionSignature {
    /// Create a signature. `location` is the basename of the declaring file.
    pub fn new(
        name: impl Into<Box<str>>,
        parameters: impl Into<Box<str>>,
        location: impl Into<Box<str>>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into(),
            location: location.into(),
            completion: OnceLock::new(),
        }
    }

    /// Declared function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw parameter text between the parentheses.
    #[must_use]
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Basename of the declaring file.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Memoized completion entry.
    pub fn completion(&self) -> &CompletionEntry {
        self.completion.get_or_init(|| {
            CompletionEntry::for_function(&self.name, &self.parameters, &self.location)
        })
    }
}

impl PartialEq for FunctionSignature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parameters == other.parameters
            && self.location == other.location
    }
}

impl Eq for FunctionSignature {}

impl Hash for FunctionSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.parameters.hash(state);
        self.location.hash(state);
    }
}
