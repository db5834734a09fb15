//! The memoized single-slot async cell behind every `Optional`.
//!
//! A [`Deferred<T>`] owns one computation and its eventual
//! [`Outcome<T>`]. The computation is driven **at most once**: the
//! first observer to call [`Deferred::resolve`] runs it to
//! completion, the outcome is cached, and every later observer gets a
//! clone of the cache. Clones of the `Deferred` itself share the slot,
//! so independent handles observe the same resolution.
//!
//! Design notes
//! - State is a `Slot` (pending future or cached outcome) inside an
//!   async `Mutex`.
//! - The first resolver holds the lock while driving the future, so
//!   concurrent observers simply queue on the lock and wake up to the
//!   cached outcome. No separate notification plumbing is needed for
//!   a write-once cell.
//! - The pending future is polled in place, never moved out of the
//!   slot, so a reader dropped mid-resolution (a timeout, a `select!`
//!   losing its race) leaves the computation intact for the next
//!   reader.
//! - There is no cancellation: once the backing computation is set in
//!   motion, consumers can only choose not to compose further.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::fault::Fault;

/// The terminal state of a resolved cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The computation produced a value.
    Filled(T),
    /// The computation produced nothing.
    Empty,
    /// Ownership of the value was transferred away.
    Moved,
    /// The computation failed with a fault.
    Failed(Fault),
}

enum Slot<T> {
    Pending(BoxFuture<'static, Outcome<T>>),
    Done(Outcome<T>),
}

/// A single-slot, memoized asynchronous cell.
///
/// `Deferred<T>` holds either a not-yet-run computation or its cached
/// [`Outcome`]. Cloning shares the slot.
pub struct Deferred<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<T> Deferred<T>
where
    T: Clone + Send + 'static,
{
    /// A cell that is already resolved to `outcome`.
    pub fn ready(outcome: Outcome<T>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::Done(outcome))),
        }
    }

    /// A cell backed by a computation that runs when first observed.
    pub fn new<F>(computation: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Slot::Pending(Box::pin(computation)))),
        }
    }

    /// Resolve the cell, driving the backing computation if this is
    /// the first observation, and return the (cached) outcome.
    pub async fn resolve(&self) -> Outcome<T> {
        let mut slot = self.slot.lock().await;
        match &mut *slot {
            Slot::Done(outcome) => outcome.clone(),
            Slot::Pending(future) => {
                // Polled in place: a reader dropped mid-resolution
                // leaves the computation in the slot for the next
                // reader instead of discarding it.
                let outcome = future.as_mut().await;
                *slot = Slot::Done(outcome.clone());
                outcome
            }
        }
    }
}
