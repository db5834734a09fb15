//! The **Optional** monad: a deferred, possibly-absent value.
//!
//! An [`Optional<T>`] owns a single [`Deferred<T>`] cell plus two
//! per-instance flags:
//!
//! - *moved*: set once by [`Optional::move_into`] and shared with
//!   clones of the same instance; every later read fails with
//!   [`Error::ValueMoved`] unless it supplies a default.
//! - *rescued*: set on [`Optional::coalesce`] outputs so a chain of
//!   coalesces rescues an absence exactly once.
//!
//! The API is non-mutating: every transformation returns a fresh
//! `Optional` wrapping a derived cell, and the source can keep being
//! read. Transformations are lazy about failure — an empty, failed,
//! or moved input is carried forward untouched and the supplied
//! function is never invoked.
//!
//! Reads come in three flavors:
//!
//! - [`Optional::unwrap`]: the safe peek; absence, failure, and moved
//!   all collapse to `None` and nothing ever errors.
//! - [`Optional::get`]: the loud read; see [`Error`] for what each
//!   terminal state surfaces as.
//! - [`Optional::get_or`]: a supplied default wins over every raised
//!   condition, moved included.

use std::fmt;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::future::join_all;

use crate::deferred::Deferred;
use crate::deferred::Outcome;
use crate::error::Error;
use crate::fault::Fault;
use crate::matcher::dispatch;
use crate::matcher::Matcher;
use crate::peel::normalize;
use crate::peel::IntoPeeled;
use crate::peel::Peeled;

/// A deferred, possibly-absent, possibly-failed value of type `T`.
pub struct Optional<T> {
    cell: Deferred<T>,
    moved: Arc<AtomicBool>,
    rescued: bool,
}

impl<T> Clone for Optional<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            moved: Arc::clone(&self.moved),
            rescued: self.rescued,
        }
    }
}

impl<T> fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optional")
            .field("moved", &self.moved.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Wrap an immediate value. Shorthand for [`Optional::of`].
pub fn optional<T>(value: T) -> Optional<T>
where
    T: Clone + Send + 'static,
{
    Optional::of(value)
}

/// An absent optional. Shorthand for [`Optional::empty`].
pub fn empty<T>() -> Optional<T>
where
    T: Clone + Send + 'static,
{
    Optional::empty()
}

impl<T> Optional<T>
where
    T: Clone + Send + 'static,
{
    fn from_cell(cell: Deferred<T>) -> Self {
        Self {
            cell,
            moved: Arc::new(AtomicBool::new(false)),
            rescued: false,
        }
    }

    fn carrying(outcome: Outcome<T>) -> Self {
        Self::from_cell(Deferred::ready(outcome))
    }

    /// An optional already filled with `value`.
    pub fn of(value: T) -> Self {
        Self::carrying(Outcome::Filled(value))
    }

    /// An optional that is structurally absent.
    pub fn empty() -> Self {
        Self::carrying(Outcome::Empty)
    }

    /// An optional whose computation already failed with `fault`.
    pub fn failed(fault: Fault) -> Self {
        Self::carrying(Outcome::Failed(fault))
    }

    /// An optional backed by a pending computation. The future's
    /// output may be any peelable shape — a plain value, an
    /// `Option`, a nested `Optional`, or a further [`Peeled`] layer.
    pub fn defer<F, P>(future: F) -> Self
    where
        F: Future<Output = P> + Send + 'static,
        P: IntoPeeled<T>,
    {
        Self::from_peel(Peeled::later(future))
    }

    /// An optional wrapping an already-peelable shape.
    pub fn from_peel(peeled: Peeled<T>) -> Self {
        Self::from_cell(Deferred::new(normalize(peeled)))
    }

    /// Whether ownership has been transferred away.
    pub fn is_moved(&self) -> bool {
        self.moved.load(Ordering::SeqCst)
    }

    /// Resolve to the terminal state, honoring the moved flag.
    pub(crate) async fn outcome(&self) -> Outcome<T> {
        if self.is_moved() {
            return Outcome::Moved;
        }
        self.cell.resolve().await
    }

    /// The safe peek: the value, or `None` on absence, failure, or a
    /// moved instance. Never errors.
    pub async fn unwrap(&self) -> Option<T> {
        match self.outcome().await {
            Outcome::Filled(value) => Some(value),
            _ => None,
        }
    }

    /// Resolve and return the value, or the error the terminal state
    /// maps to: [`Error::Null`] for absence, [`Error::ValueMoved`]
    /// after a move, [`Error::Fault`] for a failed computation.
    pub async fn get(&self) -> Result<T, Error> {
        match self.outcome().await {
            Outcome::Filled(value) => Ok(value),
            Outcome::Empty => Err(Error::Null),
            Outcome::Moved => Err(Error::ValueMoved),
            Outcome::Failed(fault) => Err(Error::Fault(fault)),
        }
    }

    /// Resolve and return the value; `default` wins over absence,
    /// failure, and moved alike.
    pub async fn get_or(&self, default: T) -> T {
        self.unwrap().await.unwrap_or(default)
    }

    /// Transform a present value. The mapper may return any peelable
    /// shape; it is never invoked when the input is empty, failed, or
    /// moved — that state is carried into the result unchanged.
    pub fn map<U, P, F>(&self, mapper: F) -> Optional<U>
    where
        U: Clone + Send + 'static,
        P: IntoPeeled<U>,
        F: FnOnce(T) -> P + Send + 'static,
    {
        if self.is_moved() {
            return Optional::carrying(Outcome::Moved);
        }
        let source = self.clone();
        Optional::from_cell(Deferred::new(async move {
            match source.outcome().await {
                Outcome::Filled(value) => normalize(mapper(value).into_peeled()).await,
                Outcome::Empty => Outcome::Empty,
                Outcome::Moved => Outcome::Moved,
                Outcome::Failed(fault) => Outcome::Failed(fault),
            }
        }))
    }

    /// Like [`Optional::map`], but an absent or failed input feeds
    /// `default` into the mapper instead of short-circuiting.
    pub fn map_or<U, P, F>(&self, default: T, mapper: F) -> Optional<U>
    where
        U: Clone + Send + 'static,
        P: IntoPeeled<U>,
        F: FnOnce(T) -> P + Send + 'static,
    {
        let source = self.clone();
        Optional::from_cell(Deferred::new(async move {
            let value = source.unwrap().await.unwrap_or(default);
            normalize(mapper(value).into_peeled()).await
        }))
    }

    /// Transform a present value with an asynchronous mapper.
    pub fn map_async<U, P, Fut, F>(&self, mapper: F) -> Optional<U>
    where
        U: Clone + Send + 'static,
        P: IntoPeeled<U>,
        Fut: Future<Output = P> + Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
    {
        if self.is_moved() {
            return Optional::carrying(Outcome::Moved);
        }
        let source = self.clone();
        Optional::from_cell(Deferred::new(async move {
            match source.outcome().await {
                Outcome::Filled(value) => normalize(mapper(value).await.into_peeled()).await,
                Outcome::Empty => Outcome::Empty,
                Outcome::Moved => Outcome::Moved,
                Outcome::Failed(fault) => Outcome::Failed(fault),
            }
        }))
    }

    /// The inverse of [`Optional::map`]: `fallback` runs only when
    /// the value is absent. Presence, failure, and moved pass
    /// through untouched.
    pub fn otherwise<P, F>(&self, fallback: F) -> Self
    where
        P: IntoPeeled<T>,
        F: FnOnce() -> P + Send + 'static,
    {
        if self.is_moved() {
            return Self::carrying(Outcome::Moved);
        }
        let source = self.clone();
        Self::from_cell(Deferred::new(async move {
            match source.outcome().await {
                Outcome::Empty => normalize(fallback().into_peeled()).await,
                other => other,
            }
        }))
    }

    /// Substitute an absent value, once per chain: an absence that a
    /// previous coalesce already rescued is not rescued again, so
    /// `a.coalesce(f).coalesce(g)` never runs `g` when `f`'s
    /// substitute itself came up absent.
    pub fn coalesce<P, F>(&self, substitute: F) -> Self
    where
        P: IntoPeeled<T>,
        F: FnOnce() -> P + Send + 'static,
    {
        let mut out = if self.is_moved() {
            Self::carrying(Outcome::Moved)
        } else {
            let already_rescued = self.rescued;
            let source = self.clone();
            Self::from_cell(Deferred::new(async move {
                match source.outcome().await {
                    Outcome::Empty if already_rescued => Outcome::Empty,
                    Outcome::Empty => normalize(substitute().into_peeled()).await,
                    other => other,
                }
            }))
        };
        out.rescued = true;
        out
    }

    /// Resolve and, if a value is available, run `action` for its
    /// side effect. Absence, failure, and moved are all swallowed;
    /// `for_each` never errors.
    pub async fn for_each<F>(&self, action: F)
    where
        F: FnOnce(T),
    {
        if let Some(value) = self.unwrap().await {
            action(value);
        }
    }

    /// Like [`Optional::for_each`], but absence feeds `default` to
    /// the action instead of skipping it.
    pub async fn for_each_or<F>(&self, default: T, action: F)
    where
        F: FnOnce(T),
    {
        action(self.unwrap().await.unwrap_or(default));
    }

    /// Fold the value together with an accumulator: `map` with an
    /// extra `initial` argument. Failure states forward as in `map`.
    pub fn reduce<A, P, F>(&self, initial: A, reducer: F) -> Optional<A>
    where
        A: Clone + Send + 'static,
        P: IntoPeeled<A>,
        F: FnOnce(A, T) -> P + Send + 'static,
    {
        self.map(move |value| reducer(initial, value))
    }

    /// Like [`Optional::reduce`], but an absent or failed input
    /// feeds `default` to the reducer instead of short-circuiting.
    pub fn reduce_or<A, P, F>(&self, initial: A, default: T, reducer: F) -> Optional<A>
    where
        A: Clone + Send + 'static,
        P: IntoPeeled<A>,
        F: FnOnce(A, T) -> P + Send + 'static,
    {
        self.map_or(default, move |value| reducer(initial, value))
    }

    /// Transfer ownership: resolve, hand the value to `consumer`
    /// (absence and failure are swallowed as in `for_each`), mark
    /// this instance moved, and return a fresh moved successor.
    ///
    /// Re-invoking on an already-moved optional is a no-op that
    /// returns another moved successor; the consumer is never
    /// invoked a second time.
    pub async fn move_into<F>(&self, consumer: F) -> Self
    where
        F: FnOnce(T),
    {
        // swap is the one-way transition; losing the race means the
        // value is already gone.
        if !self.moved.swap(true, Ordering::SeqCst) {
            if let Outcome::Filled(value) = self.cell.resolve().await {
                consumer(value);
            }
        }
        Self {
            cell: self.cell.clone(),
            moved: Arc::new(AtomicBool::new(true)),
            rescued: false,
        }
    }

    /// Resolve safely and dispatch through `matchers` in order. With
    /// no matching rule and no default the result degrades to an
    /// empty optional, never an error; so do empty, failed, and
    /// moved inputs. A handler result that peels to a failure is
    /// carried as the result's failure.
    pub fn match_with<R>(
        &self,
        matchers: impl IntoIterator<Item = Matcher<T, R>>,
    ) -> Optional<R>
    where
        R: Clone + Send + 'static,
    {
        let rules = dispatch(matchers);
        let source = self.clone();
        Optional::from_cell(Deferred::new(async move {
            match source.outcome().await {
                Outcome::Filled(value) => match rules.apply(value).await {
                    Ok(result) => Outcome::Filled(result),
                    Err(Error::Fault(fault)) => Outcome::Failed(fault),
                    Err(_) => Outcome::Empty,
                },
                _ => Outcome::Empty,
            }
        }))
    }

    /// Like [`Optional::match_with`], but `default` stands in
    /// whenever the dispatch would have degraded to empty — absent
    /// input included.
    pub fn match_or<R>(
        &self,
        default: R,
        matchers: impl IntoIterator<Item = Matcher<T, R>>,
    ) -> Optional<R>
    where
        R: Clone + Send + 'static,
    {
        let rules = dispatch(matchers);
        let source = self.clone();
        Optional::from_cell(Deferred::new(async move {
            let result = match source.outcome().await {
                Outcome::Filled(value) => rules.apply_or(value, default).await,
                _ => default,
            };
            Outcome::Filled(result)
        }))
    }

    /// Combine with another optional: both operands resolve, and the
    /// pair is present only when both are. Failure in either operand
    /// wins over absence.
    pub fn zip<U>(&self, other: &Optional<U>) -> Optional<(T, U)>
    where
        U: Clone + Send + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        Optional::from_cell(Deferred::new(async move {
            match (left.outcome().await, right.outcome().await) {
                (Outcome::Filled(a), Outcome::Filled(b)) => Outcome::Filled((a, b)),
                (Outcome::Failed(fault), _) | (_, Outcome::Failed(fault)) => {
                    Outcome::Failed(fault)
                }
                (Outcome::Moved, _) | (_, Outcome::Moved) => Outcome::Moved,
                _ => Outcome::Empty,
            }
        }))
    }
}

/// Combine any number of optionals: all operands resolve
/// (concurrently), and the combination is present only when every
/// operand is. Any absence makes it absent; any failure makes it
/// failed.
pub fn all<T>(items: impl IntoIterator<Item = Optional<T>>) -> Optional<Vec<T>>
where
    T: Clone + Send + 'static,
{
    let items: Vec<Optional<T>> = items.into_iter().collect();
    Optional::from_cell(Deferred::new(async move {
        let outcomes = join_all(items.iter().map(|item| item.outcome())).await;
        let mut values = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Outcome::Filled(value) => values.push(value),
                Outcome::Failed(fault) => return Outcome::Failed(fault),
                Outcome::Moved => return Outcome::Moved,
                Outcome::Empty => return Outcome::Empty,
            }
        }
        Outcome::Filled(values)
    }))
}
