//! Linear composition: `block` scopes and the `just` operator.
//!
//! [`block`] runs an executor that extracts values linearly with
//! [`Just::just`] — "give me the value or abort the whole block".
//! The abort travels as the [`Abort`] sentinel through the
//! executor's `Result`, which makes `?` the extraction operator:
//!
//! ```rust
//! use eventual::block;
//! use eventual::empty;
//! use eventual::optional;
//! use eventual::Error;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sum = block(|just| async move {
//!     let a = just.just(optional(5)).await?;
//!     let b = just.just(empty::<i32>()).await?; // aborts here
//!     Ok(a + b)
//! })
//! .await;
//!
//! // an abort is a short-circuited absence, not a failure
//! assert_eq!(sum.get().await, Err(Error::Null));
//! # }
//! ```
//!
//! Only the sentinel is intercepted: a panic (or any error the
//! executor surfaces itself) propagates to the block's caller
//! untouched. The executor's successful return may be a plain value,
//! an `Option`, an [`Optional`], or a [`Fallible`] (converted via
//! [`Fallible::to_optional`], discarding a non-aborting error), per
//! [`IntoBlockValue`].

use std::fmt;
use std::future::Future;

use crate::deferred::Outcome;
use crate::fallible::Fallible;
use crate::optional::Optional;

/// The abort sentinel. Only [`block`] interprets it; it cannot be
/// built outside a block's executor.
pub struct Abort(());

impl fmt::Debug for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abort").finish()
    }
}

/// The block-scoped extraction token handed to an executor.
pub struct Just(());

impl fmt::Debug for Just {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Just").finish()
    }
}

impl Just {
    /// Extract a value or abort the block: resolves `source` and
    /// aborts on absence, on a fallible's err path, and on a failed
    /// or moved cell.
    pub async fn just<T, S>(&self, source: S) -> Result<T, Abort>
    where
        T: Clone + Send + 'static,
        S: IntoJust<T>,
    {
        match source.into_just().outcome().await {
            Outcome::Filled(value) => Ok(value),
            _ => Err(Abort(())),
        }
    }

    /// Extract with a default instead of aborting; never fails.
    pub async fn just_or<T, S>(&self, source: S, default: T) -> T
    where
        T: Clone + Send + 'static,
        S: IntoJust<T>,
    {
        source.into_just().get_or(default).await
    }
}

/// Sources [`Just::just`] can extract from.
pub trait IntoJust<T> {
    /// View the source as an optional for unwrap-or-abort handling.
    fn into_just(self) -> Optional<T>;
}

impl<T> IntoJust<T> for Optional<T> {
    fn into_just(self) -> Optional<T> {
        self
    }
}

impl<T> IntoJust<T> for Fallible<T>
where
    T: Clone + Send + 'static,
{
    fn into_just(self) -> Optional<T> {
        // the err path collapses to absence, which is what aborts
        self.to_optional()
    }
}

impl<T> IntoJust<T> for Option<T>
where
    T: Clone + Send + 'static,
{
    fn into_just(self) -> Optional<T> {
        match self {
            Some(value) => Optional::of(value),
            None => Optional::empty(),
        }
    }
}

/// Successful executor returns and their conversion into the block's
/// overall optional.
pub trait IntoBlockValue<T> {
    /// Wrap or pass through the executor's return.
    fn into_block_value(self) -> Optional<T>;
}

impl<T> IntoBlockValue<T> for T
where
    T: Clone + Send + 'static,
{
    fn into_block_value(self) -> Optional<T> {
        Optional::of(self)
    }
}

impl<T> IntoBlockValue<T> for Option<T>
where
    T: Clone + Send + 'static,
{
    fn into_block_value(self) -> Optional<T> {
        match self {
            Some(value) => Optional::of(value),
            None => Optional::empty(),
        }
    }
}

impl<T> IntoBlockValue<T> for Optional<T> {
    fn into_block_value(self) -> Optional<T> {
        self
    }
}

impl<T> IntoBlockValue<T> for Fallible<T>
where
    T: Clone + Send + 'static,
{
    fn into_block_value(self) -> Optional<T> {
        self.to_optional()
    }
}

/// Run an executor with a [`Just`] token and wrap its outcome.
///
/// An abort raised by `just` becomes an **empty** optional — aborts
/// are short-circuited absences, not failures.
pub async fn block<T, B, F, Fut>(executor: F) -> Optional<T>
where
    T: Clone + Send + 'static,
    B: IntoBlockValue<T>,
    F: FnOnce(Just) -> Fut,
    Fut: Future<Output = Result<B, Abort>>,
{
    match executor(Just(())).await {
        Ok(value) => value.into_block_value(),
        Err(Abort(())) => Optional::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fallible;
    use crate::fault::Fault;
    use crate::fault::Kind;
    use crate::optional::empty;
    use crate::optional::optional;

    static SOME_ERROR: Kind = Kind::new("SomeError", "it broke");

    #[tokio::test]
    async fn a_completed_block_wraps_its_return() {
        let out = block(|just| async move {
            let a = just.just(optional(5)).await?;
            let b = just.just(optional(2)).await?;
            Ok(a + b)
        })
        .await;
        assert_eq!(out.get().await, Ok(7));
    }

    #[tokio::test]
    async fn an_abort_is_an_empty_optional_not_an_error() {
        let out = block(|just| async move {
            let a = just.just(optional(5)).await?;
            let b = just.just(empty::<i32>()).await?;
            Ok(a + b)
        })
        .await;
        assert_eq!(out.get().await, Err(Error::Null));
    }

    #[tokio::test]
    async fn a_fallible_err_path_aborts() {
        let out = block(|just| async move {
            let v = just.just(fallible::err::<i32>(Fault::of(&SOME_ERROR))).await?;
            Ok(v * 2)
        })
        .await;
        assert_eq!(out.get().await, Err(Error::Null));
    }

    #[tokio::test]
    async fn just_or_supplies_a_default_instead_of_aborting() {
        let out = block(|just| async move {
            let a = just.just_or(empty::<i32>(), 40).await;
            let b = just.just(Some(2)).await?;
            Ok(a + b)
        })
        .await;
        assert_eq!(out.get().await, Ok(42));
    }

    #[tokio::test]
    async fn raw_absence_aborts() {
        let out = block(|just| async move {
            let v = just.just(None::<i32>).await?;
            Ok(v)
        })
        .await;
        assert_eq!(out.get().await, Err(Error::Null));
    }

    #[tokio::test]
    async fn executor_returns_convert_per_their_shape() {
        let passthrough = block(|_| async move { Ok(optional(1)) }).await;
        assert_eq!(passthrough.get().await, Ok(1));

        let from_option = block(|_| async move { Ok(Some(2)) }).await;
        assert_eq!(from_option.get().await, Ok(2));

        let from_fallible: Optional<i32> =
            block(|_| async move { Ok(fallible::err::<i32>(Fault::of(&SOME_ERROR))) }).await;
        // a non-aborting err return collapses like to_optional
        assert_eq!(from_fallible.get().await, Err(Error::Null));
    }

    #[tokio::test]
    async fn steps_run_in_composition_order() {
        let out = block(|just| async move {
            let a = just.just(Optional::defer(async { 1 })).await?;
            let b = just.just(optional(a + 1)).await?;
            Ok(vec![a, b])
        })
        .await;
        assert_eq!(out.get().await, Ok(vec![1, 2]));
    }
}
