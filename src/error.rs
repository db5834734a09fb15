//! The library error taxonomy.
//!
//! Failures are designed to flow silently through arbitrarily long
//! chains and only manifest where a caller finally asks for a
//! concrete value; [`Error`] is what that final ask can produce.

use thiserror::Error;

use crate::fault::Fault;

/// Everything a consuming read can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value is structurally absent and no default was supplied.
    #[error("no value present")]
    Null,

    /// The value's ownership was transferred away via `move_into`.
    #[error("value has been moved")]
    ValueMoved,

    /// A dispatch ran out of rules with no default case configured.
    #[error("no matching case and no default")]
    NoDefaultCase,

    /// Two error kinds were registered under the same name.
    #[error("duplicate error kind name: {0}")]
    DuplicateKind(&'static str),

    /// A carried fault surfaced to a consumer that opted into
    /// failure-surfacing.
    #[error(transparent)]
    Fault(#[from] Fault),
}
