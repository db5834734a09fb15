//! **Peeling**: recursive normalization of transducer results.
//!
//! Every mapper, handler, and fallback in this crate may return a
//! plain value, a plain [`Option`], a nested [`Optional`], or a
//! deferred computation producing any of those. [`Peeled<T>`] is the
//! common shape of such a result and [`normalize`] collapses it —
//! recursively, so a deferred result that resolves to yet another
//! `Optional` is peeled again — into one flat [`Outcome<T>`].
//!
//! Callers rarely build a `Peeled` by hand: [`IntoPeeled`] converts
//! the ordinary return shapes, and [`Peeled::later`] wraps a future
//! when a handler needs to defer.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

use crate::deferred::Outcome;
use crate::fault::Fault;
use crate::optional::Optional;

/// A not-yet-normalized transducer result.
pub enum Peeled<T> {
    /// A plain value.
    Value(T),
    /// Structural absence.
    Absent,
    /// A fault carried as the result.
    Failed(Fault),
    /// A nested optional; its own outcome is peeled in turn.
    Wrapped(Optional<T>),
    /// A pending result, peeled again once it resolves.
    Later(BoxFuture<'static, Peeled<T>>),
}

impl<T> Peeled<T>
where
    T: Clone + Send + 'static,
{
    /// Defer the result: `future`'s output is peeled when it arrives.
    pub fn later<F, P>(future: F) -> Self
    where
        F: Future<Output = P> + Send + 'static,
        P: IntoPeeled<T>,
    {
        Peeled::Later(Box::pin(async move { future.await.into_peeled() }))
    }
}

impl<T> fmt::Debug for Peeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Peeled::Value(_) => "Value",
            Peeled::Absent => "Absent",
            Peeled::Failed(_) => "Failed",
            Peeled::Wrapped(_) => "Wrapped",
            Peeled::Later(_) => "Later",
        };
        f.debug_struct("Peeled").field("shape", &label).finish()
    }
}

/// Conversion of ordinary return shapes into [`Peeled<T>`].
///
/// Implemented for `T` itself, `Option<T>` (with `None` peeling to
/// absence), `Optional<T>`, and `Peeled<T>`. A mapper can therefore
/// return whichever shape reads best at its call site and the chain
/// normalizes transparently.
pub trait IntoPeeled<T> {
    /// Wrap `self` in its peelable shape.
    fn into_peeled(self) -> Peeled<T>;
}

impl<T> IntoPeeled<T> for T {
    fn into_peeled(self) -> Peeled<T> {
        Peeled::Value(self)
    }
}

impl<T> IntoPeeled<T> for Option<T> {
    fn into_peeled(self) -> Peeled<T> {
        match self {
            Some(value) => Peeled::Value(value),
            None => Peeled::Absent,
        }
    }
}

impl<T> IntoPeeled<T> for Optional<T> {
    fn into_peeled(self) -> Peeled<T> {
        Peeled::Wrapped(self)
    }
}

impl<T> IntoPeeled<T> for Peeled<T> {
    fn into_peeled(self) -> Peeled<T> {
        self
    }
}

/// Collapse a peeled shape into a flat outcome, recursing through
/// nested optionals and deferred layers.
pub(crate) fn normalize<T>(peeled: Peeled<T>) -> BoxFuture<'static, Outcome<T>>
where
    T: Clone + Send + 'static,
{
    Box::pin(async move {
        match peeled {
            Peeled::Value(value) => Outcome::Filled(value),
            Peeled::Absent => Outcome::Empty,
            Peeled::Failed(fault) => Outcome::Failed(fault),
            Peeled::Wrapped(optional) => optional.outcome().await,
            Peeled::Later(future) => normalize(future.await).await,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Kind;
    use crate::optional::optional;
    use crate::optional::Optional;

    static BOOM: Kind = Kind::new("Boom", "bang");

    #[tokio::test]
    async fn plain_values_normalize_to_filled() {
        assert_eq!(normalize(3.into_peeled()).await, Outcome::Filled(3));
    }

    #[tokio::test]
    async fn none_normalizes_to_empty() {
        let peeled: Peeled<i32> = None.into_peeled();
        assert_eq!(normalize(peeled).await, Outcome::Empty);
    }

    #[tokio::test]
    async fn nested_optionals_are_peeled() {
        let peeled = optional(6).into_peeled();
        assert_eq!(normalize(peeled).await, Outcome::Filled(6));
    }

    #[tokio::test]
    async fn deferred_layers_are_peeled_recursively() {
        // future -> Optional -> value: two layers deep.
        let peeled = Peeled::later(async { optional(9) });
        assert_eq!(normalize(peeled).await, Outcome::Filled(9));
    }

    #[tokio::test]
    async fn a_failed_wrapped_optional_stays_failed() {
        let peeled: Peeled<i32> = Optional::<i32>::failed(Fault::of(&BOOM)).into_peeled();
        assert_eq!(normalize(peeled).await, Outcome::Failed(Fault::of(&BOOM)));
    }
}
