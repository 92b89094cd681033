//! Completion request inputs.

use crate::signature::FunctionSignature;

/// Symbols detected in an unsaved editor buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveBufferSymbols {
    /// Functions declared in the buffer, in buffer order.
    pub functions: Vec<FunctionSignature>,
    /// Assignment targets found in the buffer, deduplicated.
    pub variables: Vec<Box<str>>,
}

/// One completion lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Text typed so far; matched as a case-sensitive substring of names.
    pub prefix: Box<str>,
    /// Symbols from the active buffer.
    pub live: LiveBufferSymbols,
    /// Basename of the active buffer's file, empty for unsaved buffers.
    pub current_file_label: Box<str>,
}

impl CompletionRequest {
    /// Request with no live symbols.
    pub fn new(prefix: impl Into<Box<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Attach live buffer symbols and the buffer's label.
    #[must_use]
    pub fn with_live(mut self, live: LiveBufferSymbols, current_file_label: impl Into<Box<str>>) -> Self {
        self.live = live;
        self.current_file_label = current_file_label.into();
        self
    }
}
