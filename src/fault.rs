//! Tagged error kinds and the **fault** values that carry them.
//!
//! A [`Fault`] is an error that travels through the same channel as
//! ordinary values: it is cloneable, comparable, and can be inspected
//! by matchers without unwinding. Every fault references a [`Kind`],
//! a statically declared error kind with a stable name, an optional
//! default message, and an optional parent kind.
//!
//! Kinds are declared as `static` items:
//!
//! ```rust
//! use eventual::{Fault, Kind};
//!
//! static IO: Kind = Kind::new("IoError", "an I/O operation failed");
//! static TIMEOUT: Kind = Kind::extends("TimeoutError", "the operation timed out", &IO);
//!
//! let fault = Fault::of(&TIMEOUT);
//! assert!(fault.kind().is(&TIMEOUT));
//! assert!(fault.kind().is(&IO)); // parent chain
//! ```
//!
//! Identity is the address of the `static`, not the name. Two kinds
//! that accidentally share a name can never be confused by a matcher;
//! the name exists for display. Where the uniqueness of names matters
//! to an application (diagnostics, serialization), call
//! [`verify_distinct`] once at start-up with every kind it defines.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::error::Error;

/// A named error kind with an optional parent kind.
///
/// Kinds form a tree: [`Kind::is`] walks the parent chain, so a fault
/// of a child kind also answers to every ancestor kind. This is what
/// makes rule order matter when matching against overlapping kinds —
/// a rule for an ancestor listed first shadows a later rule for the
/// child.
#[derive(Debug)]
pub struct Kind {
    name: &'static str,
    message: &'static str,
    parent: Option<&'static Kind>,
}

impl Kind {
    /// Declare a root kind with a display name and default message.
    pub const fn new(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            message,
            parent: None,
        }
    }

    /// Declare a kind that also answers to `parent`.
    pub const fn extends(
        name: &'static str,
        message: &'static str,
        parent: &'static Kind,
    ) -> Self {
        Self {
            name,
            message,
            parent: Some(parent),
        }
    }

    /// The kind's display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The message used by [`Fault::of`].
    pub fn default_message(&self) -> &'static str {
        self.message
    }

    /// Whether this kind is `other` or has `other` among its
    /// ancestors. Identity is by address, never by name.
    pub fn is(&self, other: &Kind) -> bool {
        let mut cursor = Some(self);
        while let Some(kind) = cursor {
            if std::ptr::eq(kind, other) {
                return true;
            }
            cursor = kind.parent;
        }
        false
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Kind {}

/// Check that every kind in `kinds` carries a distinct name.
///
/// The explicit start-up replacement for an ambient process-wide
/// registry: an application lists the kinds it defines once, and a
/// collision is reported as [`Error::DuplicateKind`] instead of
/// surfacing later in diagnostics.
pub fn verify_distinct(kinds: &[&'static Kind]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for kind in kinds {
        if !seen.insert(kind.name()) {
            return Err(Error::DuplicateKind(kind.name()));
        }
    }
    Ok(())
}

/// An error value: a kind plus a message.
///
/// Faults are plain values. They flow through [`Optional`] cells as a
/// distinct *failed* outcome and through [`Fallible`] cells as filled
/// error values, and only become a Rust-level error when a consumer
/// asks for a concrete value via `get`.
///
/// [`Optional`]: crate::optional::Optional
/// [`Fallible`]: crate::fallible::Fallible
#[derive(Debug, Clone)]
pub struct Fault {
    kind: &'static Kind,
    message: Cow<'static, str>,
}

impl Fault {
    /// A fault of `kind` with an explicit message.
    pub fn new(kind: &'static Kind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A fault of `kind` with the kind's default message.
    pub fn of(kind: &'static Kind) -> Self {
        Self {
            kind,
            message: Cow::Borrowed(kind.default_message()),
        }
    }

    /// The fault's kind.
    pub fn kind(&self) -> &'static Kind {
        self.kind
    }

    /// The fault's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name, self.message)
    }
}

impl std::error::Error for Fault {}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.kind, other.kind) && self.message == other.message
    }
}

impl Eq for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: Kind = Kind::new("BaseError", "something went wrong");
    static CHILD: Kind = Kind::extends("ChildError", "something specific went wrong", &BASE);
    static GRANDCHILD: Kind = Kind::extends("GrandchildError", "very specific", &CHILD);
    static OTHER: Kind = Kind::new("OtherError", "unrelated");

    #[test]
    fn is_walks_the_parent_chain() {
        assert!(GRANDCHILD.is(&GRANDCHILD));
        assert!(GRANDCHILD.is(&CHILD));
        assert!(GRANDCHILD.is(&BASE));
        assert!(!GRANDCHILD.is(&OTHER));
        assert!(!BASE.is(&CHILD));
    }

    #[test]
    fn identity_is_by_address_not_name() {
        static IMPOSTOR: Kind = Kind::new("BaseError", "same name, different kind");
        assert!(!IMPOSTOR.is(&BASE));
        assert_ne!(&IMPOSTOR, &BASE);
    }

    #[test]
    fn of_uses_the_default_message() {
        let fault = Fault::of(&BASE);
        assert_eq!(fault.message(), "something went wrong");
        assert_eq!(fault.to_string(), "BaseError: something went wrong");
    }

    #[test]
    fn new_overrides_the_message() {
        let fault = Fault::new(&BASE, format!("attempt {}", 3));
        assert_eq!(fault.message(), "attempt 3");
        assert!(fault.kind().is(&BASE));
    }

    #[test]
    fn equality_requires_kind_and_message() {
        assert_eq!(Fault::of(&BASE), Fault::of(&BASE));
        assert_ne!(Fault::of(&BASE), Fault::new(&BASE, "different"));
        assert_ne!(Fault::new(&BASE, "x"), Fault::new(&OTHER, "x"));
    }

    #[test]
    fn verify_distinct_accepts_unique_names() {
        assert!(verify_distinct(&[&BASE, &CHILD, &GRANDCHILD, &OTHER]).is_ok());
    }

    #[test]
    fn verify_distinct_rejects_a_collision() {
        static DUPLICATE: Kind = Kind::new("BaseError", "collides with BASE");
        let err = verify_distinct(&[&BASE, &OTHER, &DUPLICATE]);
        assert_eq!(err, Err(Error::DuplicateKind("BaseError")));
    }
}
