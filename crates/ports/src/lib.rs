//! # sigdex-ports
//!
//! Port traits for the sigdex hexagonal architecture.
//!
//! This crate defines the interfaces between the indexing engine and the
//! outside world (filesystem, path resolution, exclusion, line matching, the
//! editor workspace, logging). It depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by async port traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod exclusion;
pub mod filesystem;
pub mod logger;
pub mod matcher;
pub mod path;
pub mod workspace;

pub use exclusion::*;
pub use filesystem::*;
pub use logger::*;
pub use matcher::*;
pub use path::*;
pub use workspace::*;

// Domain types used in port signatures, so adapter crates can implement ports
// without depending on `sigdex-domain` directly.
pub use sigdex_domain::{FunctionSignature, LiveBufferSymbols};
