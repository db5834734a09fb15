//! The **Fallible** specialization: an optional whose filled value
//! may alternatively be a carried [`Fault`].
//!
//! A [`Fallible<T>`] wraps an `Optional<Result<T, Fault>>`: the ok
//! and err paths travel through the same deferred channel, and a
//! carried fault is a *filled* value — distinct from the underlying
//! cell's own failed state. This closed union is what matchers
//! dispatch over; [`when_ok`] and [`when_err`] build the
//! corresponding rules for custom [`Fallible::match_with`] calls.
//!
//! The read defaults invert the base optional: a fallible exists to
//! make error paths loud, so [`Fallible::get`] surfaces a carried
//! fault as [`Error::Fault`] with no opt-in, while
//! [`Fallible::to_optional`] is the explicit way back to
//! quiet-by-default absence.

use std::fmt;
use std::future::Future;

use crate::deferred::Outcome;
use crate::error::Error;
use crate::fault::Fault;
use crate::fault::Kind;
use crate::matcher::when;
use crate::matcher::Matcher;
use crate::optional::Optional;
use crate::peel::IntoPeeled;
use crate::peel::Peeled;

/// A deferred value that is either a `T` or a carried [`Fault`].
pub struct Fallible<T> {
    inner: Optional<Result<T, Fault>>,
}

impl<T> Clone for Fallible<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Fallible<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallible").finish_non_exhaustive()
    }
}

/// A fallible already on the ok path. Shorthand for [`Fallible::ok`].
pub fn ok<T>(value: T) -> Fallible<T>
where
    T: Clone + Send + 'static,
{
    Fallible::ok(value)
}

/// A fallible already on the err path. Shorthand for
/// [`Fallible::err`].
pub fn err<T>(fault: Fault) -> Fallible<T>
where
    T: Clone + Send + 'static,
{
    Fallible::err(fault)
}

/// A rule firing on the ok path of a fallible's union.
pub fn when_ok<T, R, P, H>(handle: H) -> Matcher<Result<T, Fault>, R>
where
    T: Send + Sync + 'static,
    H: Fn(T) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(
        |result: &Result<T, Fault>| result.is_ok(),
        move |result| match result {
            Ok(value) => handle(value).into_peeled(),
            Err(_) => Peeled::Absent,
        },
    )
}

/// A rule firing on the err path of a fallible's union.
pub fn when_err<T, R, P, H>(handle: H) -> Matcher<Result<T, Fault>, R>
where
    T: Send + Sync + 'static,
    H: Fn(Fault) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(
        |result: &Result<T, Fault>| result.is_err(),
        move |result| match result {
            Err(fault) => handle(fault).into_peeled(),
            Ok(_) => Peeled::Absent,
        },
    )
}

/// A rule firing on the err path only for faults answering to
/// `kind`. As with [`crate::matcher::when_kind`], list rules for
/// more specific kinds first.
pub fn when_err_kind<T, R, P, H>(kind: &'static Kind, handle: H) -> Matcher<Result<T, Fault>, R>
where
    T: Send + Sync + 'static,
    H: Fn(Fault) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(
        move |result: &Result<T, Fault>| matches!(result, Err(fault) if fault.kind().is(kind)),
        move |result| match result {
            Err(fault) => handle(fault).into_peeled(),
            Ok(_) => Peeled::Absent,
        },
    )
}

impl<T> Fallible<T>
where
    T: Clone + Send + 'static,
{
    /// A fallible already filled with an ok value.
    pub fn ok(value: T) -> Self {
        Self {
            inner: Optional::of(Ok(value)),
        }
    }

    /// A fallible already carrying `fault` on the err path.
    pub fn err(fault: Fault) -> Self {
        Self {
            inner: Optional::of(Err(fault)),
        }
    }

    /// Wrap an immediate `Result`.
    pub fn from_result(result: Result<T, Fault>) -> Self {
        Self {
            inner: Optional::of(result),
        }
    }

    /// A fallible backed by a pending computation.
    pub fn defer<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, Fault>> + Send + 'static,
    {
        Self {
            inner: Optional::defer(async move { Some(future.await) }),
        }
    }

    /// Wrap an optional of the underlying union directly.
    pub fn from_optional(inner: Optional<Result<T, Fault>>) -> Self {
        Self { inner }
    }

    /// The safe peek: the ok value, or `None` for the err path,
    /// absence, failure, or a moved instance. Never errors.
    pub async fn unwrap(&self) -> Option<T> {
        match self.inner.unwrap().await {
            Some(Ok(value)) => Some(value),
            _ => None,
        }
    }

    /// Resolve loudly: a carried fault is surfaced as
    /// [`Error::Fault`] — no opt-in, inverting the base optional's
    /// safe peek — alongside the usual [`Error::Null`] and
    /// [`Error::ValueMoved`].
    pub async fn get(&self) -> Result<T, Error> {
        match self.inner.outcome().await {
            Outcome::Filled(Ok(value)) => Ok(value),
            Outcome::Filled(Err(fault)) => Err(Error::Fault(fault)),
            Outcome::Empty => Err(Error::Null),
            Outcome::Moved => Err(Error::ValueMoved),
            Outcome::Failed(fault) => Err(Error::Fault(fault)),
        }
    }

    /// Resolve and return the ok value; `default` wins over the err
    /// path and every other raised condition.
    pub async fn get_or(&self, default: T) -> T {
        self.unwrap().await.unwrap_or(default)
    }

    /// Map the ok path into a plain optional; a carried fault
    /// becomes the result's failure, re-raised as-is on the final
    /// `get`.
    pub fn ok_then<R, P, F>(&self, mapper: F) -> Optional<R>
    where
        R: Clone + Send + 'static,
        P: IntoPeeled<R>,
        F: FnOnce(T) -> P + Send + 'static,
    {
        self.inner.map(move |result| match result {
            Ok(value) => mapper(value).into_peeled(),
            Err(fault) => Peeled::Failed(fault),
        })
    }

    /// Transform the ok side; the err side passes through unchanged.
    pub fn map_ok<U, F>(&self, mapper: F) -> Fallible<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Fallible {
            inner: self.inner.map(move |result| result.map(mapper)),
        }
    }

    /// Transform the err side; the ok side passes through unchanged.
    pub fn map_err<F>(&self, mapper: F) -> Fallible<T>
    where
        F: FnOnce(Fault) -> Fault + Send + 'static,
    {
        Fallible {
            inner: self.inner.map(move |result| result.map_err(mapper)),
        }
    }

    /// Run `consumer` on the err path only, for its side effect; a
    /// no-op on the ok path. Never errors.
    pub async fn on_err<F>(&self, consumer: F)
    where
        F: FnOnce(Fault),
    {
        if let Some(Err(fault)) = self.inner.unwrap().await {
            consumer(fault);
        }
    }

    /// Log the err path through `tracing`, if any. A no-op
    /// otherwise.
    pub async fn print_err(&self) {
        self.on_err(|fault| {
            tracing::error!(kind = fault.kind().name(), "{}", fault.message());
        })
        .await;
    }

    /// Collapse the err path to absence, discarding the fault.
    pub fn to_optional(&self) -> Optional<T> {
        self.inner.map(|result| match result {
            Ok(value) => Peeled::Value(value),
            Err(_) => Peeled::Absent,
        })
    }

    /// Collapse the err path to `default`.
    pub fn to_optional_or(&self, default: T) -> Optional<T> {
        self.inner.map(move |result| match result {
            Ok(value) => value,
            Err(_) => default,
        })
    }

    /// Dispatch the ok/err union through `matchers` in order; see
    /// [`Optional::match_with`] for the degradation rules.
    pub fn match_with<R>(
        &self,
        matchers: impl IntoIterator<Item = Matcher<Result<T, Fault>, R>>,
    ) -> Optional<R>
    where
        R: Clone + Send + 'static,
    {
        self.inner.match_with(matchers)
    }

    /// Dispatch with a default; see [`Optional::match_or`].
    pub fn match_or<R>(
        &self,
        default: R,
        matchers: impl IntoIterator<Item = Matcher<Result<T, Fault>, R>>,
    ) -> Optional<R>
    where
        R: Clone + Send + 'static,
    {
        self.inner.match_or(default, matchers)
    }

    /// Transfer ownership of the ok/err union to `consumer`; the
    /// origin and the returned successor both read as moved
    /// afterward. See [`Optional::move_into`].
    pub async fn move_into<F>(&self, consumer: F) -> Fallible<T>
    where
        F: FnOnce(Result<T, Fault>),
    {
        Fallible {
            inner: self.inner.move_into(consumer).await,
        }
    }
}
