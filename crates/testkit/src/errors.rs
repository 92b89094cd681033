//! Test fixtures for shared error codes and envelopes.

use sigdex_shared::{ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::cancelled(),
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::file_unreadable(),
        ErrorCode::io(),
    ]
}

/// A cancellation error fixture.
pub fn cancelled_error() -> ErrorEnvelope {
    ErrorEnvelope::cancelled("cancelled")
}

/// A permission-denied read fixture, as the local filesystem reports it.
pub fn permission_denied_error(path: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::permission_denied(), "permission denied")
        .with_metadata("path", path)
}

/// A missing-path fixture.
pub fn not_found_error(path: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::not_found(), "no such file or directory")
        .with_metadata("path", path)
}
