//! Test utilities for safe calls and value transfers.

mod diagnostics;
mod host;

pub use diagnostics::*;
pub use host::*;
