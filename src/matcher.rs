//! Ordered structural dispatch: rules, constructors, and the engine.
//!
//! A [`Matcher<T, R>`] pairs a boolean `test` with a `handle`
//! function; [`dispatch`] composes an ordered list of them into a
//! [`Dispatch<T, R>`] that applies the **first** matching rule's
//! handler to a value. Rules are stateless and reusable; a dispatch
//! can be applied any number of times.
//!
//! Rule constructors, in test-semantics order of specificity:
//!
//! - [`when`]: an arbitrary predicate.
//! - [`when_eq`]: strict equality against a probe value.
//! - [`when_shape`]: deep partial structural match (see
//!   [`crate::shape`]).
//! - [`when_kind`]: a fault of the given kind, *including* faults of
//!   descendant kinds — so order matters among overlapping kinds, and
//!   listing an ancestor first shadows a later rule for the child.
//! - [`otherwise`]: the catch-all.
//!
//! Handlers may return a plain value, an `Option`, a nested
//! [`Optional`](crate::optional::Optional), or a deferred result via
//! [`Peeled::later`]; all are normalized by peeling before the
//! dispatch result is handed back.

use crate::deferred::Outcome;
use crate::error::Error;
use crate::fault::Fault;
use crate::fault::Kind;
use crate::optional::Optional;
use crate::peel::normalize;
use crate::peel::IntoPeeled;
use crate::peel::Peeled;
use crate::shape::PartialShape;

/// One dispatch rule: a test and the handler to run when it fires.
pub struct Matcher<T, R> {
    test: Box<dyn Fn(&T) -> bool + Send + Sync>,
    handle: Box<dyn Fn(T) -> Peeled<R> + Send + Sync>,
}

impl<T, R> std::fmt::Debug for Matcher<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

impl<T, R> Matcher<T, R> {
    pub(crate) fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    pub(crate) fn handle(&self, value: T) -> Peeled<R> {
        (self.handle)(value)
    }
}

/// A rule firing when `test` returns `true`.
pub fn when<T, R, P, F, H>(test: F, handle: H) -> Matcher<T, R>
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
    H: Fn(T) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    Matcher {
        test: Box::new(test),
        handle: Box::new(move |value| handle(value).into_peeled()),
    }
}

/// A rule firing when the value equals `probe`.
pub fn when_eq<T, R, P, H>(probe: T, handle: H) -> Matcher<T, R>
where
    T: PartialEq + Send + Sync + 'static,
    H: Fn(T) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(move |value: &T| *value == probe, handle)
}

/// A rule firing when the value covers `probe` structurally.
pub fn when_shape<T, R, P, H>(probe: T, handle: H) -> Matcher<T, R>
where
    T: PartialShape + Send + Sync + 'static,
    H: Fn(T) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(move |value: &T| value.contains_shape(&probe), handle)
}

/// A rule firing when a fault answers to `kind` (directly or through
/// its parent chain). List rules for more specific kinds first.
pub fn when_kind<R, P, H>(kind: &'static Kind, handle: H) -> Matcher<Fault, R>
where
    H: Fn(Fault) -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(move |fault: &Fault| fault.kind().is(kind), handle)
}

/// The catch-all rule; always fires.
pub fn otherwise<T, R, P, H>(handle: H) -> Matcher<T, R>
where
    H: Fn() -> P + Send + Sync + 'static,
    P: IntoPeeled<R>,
{
    when(|_| true, move |_| handle())
}

/// An ordered rule list ready to be applied to values.
pub struct Dispatch<T, R> {
    matchers: Vec<Matcher<T, R>>,
}

impl<T, R> std::fmt::Debug for Dispatch<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("rules", &self.matchers.len())
            .finish()
    }
}

/// Compose rules into a [`Dispatch`]. Order is significant: the first
/// rule whose test passes wins.
pub fn dispatch<T, R>(matchers: impl IntoIterator<Item = Matcher<T, R>>) -> Dispatch<T, R> {
    Dispatch {
        matchers: matchers.into_iter().collect(),
    }
}

impl<T, R> Dispatch<T, R>
where
    T: Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    fn first_match(&self, value: T) -> Option<Peeled<R>> {
        for matcher in &self.matchers {
            if matcher.test(&value) {
                return Some(matcher.handle(value));
            }
        }
        None
    }

    /// Apply the rules to an immediate value.
    ///
    /// Errors with [`Error::NoDefaultCase`] when no rule fires, and
    /// with [`Error::Null`] when the winning handler's result peels
    /// to absence.
    pub async fn apply(&self, value: T) -> Result<R, Error> {
        match self.first_match(value) {
            Some(peeled) => match normalize(peeled).await {
                Outcome::Filled(result) => Ok(result),
                Outcome::Empty => Err(Error::Null),
                Outcome::Moved => Err(Error::ValueMoved),
                Outcome::Failed(fault) => Err(Error::Fault(fault)),
            },
            None => Err(Error::NoDefaultCase),
        }
    }

    /// Apply the rules; `default` wins when no rule fires or the
    /// winning handler's result peels to absence or failure.
    pub async fn apply_or(&self, value: T, default: R) -> R {
        self.apply(value).await.unwrap_or(default)
    }

    /// Suspend until `value` resolves, then apply the rules to it.
    ///
    /// A resolution failure propagates; absence surfaces as
    /// [`Error::Null`].
    pub async fn apply_deferred(&self, value: &Optional<T>) -> Result<R, Error> {
        match value.outcome().await {
            Outcome::Filled(resolved) => self.apply(resolved).await,
            Outcome::Empty => Err(Error::Null),
            Outcome::Moved => Err(Error::ValueMoved),
            Outcome::Failed(fault) => Err(Error::Fault(fault)),
        }
    }

    /// Like [`Dispatch::apply_deferred`], but a resolution failure or
    /// a missed dispatch resolves to `default` instead of an error.
    pub async fn apply_deferred_or(&self, value: &Optional<T>, default: R) -> R {
        self.apply_deferred(value).await.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optional::optional;
    use crate::optional::Optional;

    static PARENT: Kind = Kind::new("ParentError", "parent");
    static CHILD: Kind = Kind::extends("ChildError", "child", &PARENT);

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let rules = dispatch([
            when_eq(1, |_| "one"),
            when(|v: &i32| *v > 0, |_| "positive"),
            otherwise(|| "other"),
        ]);
        assert_eq!(rules.apply(1).await, Ok("one"));
        assert_eq!(rules.apply(7).await, Ok("positive"));
        assert_eq!(rules.apply(-2).await, Ok("other"));
    }

    #[tokio::test]
    async fn an_ancestor_rule_listed_first_shadows_the_child() {
        let shadowed = dispatch([
            when_kind(&PARENT, |_| "A"),
            when_kind(&CHILD, |_| "B"),
        ]);
        let specific_first = dispatch([
            when_kind(&CHILD, |_| "B"),
            when_kind(&PARENT, |_| "A"),
        ]);
        let fault = Fault::of(&CHILD);
        assert_eq!(shadowed.apply(fault.clone()).await, Ok("A"));
        assert_eq!(specific_first.apply(fault).await, Ok("B"));
    }

    #[tokio::test]
    async fn no_rule_and_no_default_is_an_error() {
        let rules = dispatch([when_eq(1, |v| v * 10)]);
        assert_eq!(rules.apply(2).await, Err(Error::NoDefaultCase));
    }

    #[tokio::test]
    async fn default_covers_a_missed_dispatch() {
        let rules = dispatch([when_eq(1, |v| v * 10)]);
        assert_eq!(rules.apply_or(2, 99).await, 99);
        assert_eq!(rules.apply_or(1, 99).await, 10);
    }

    #[tokio::test]
    async fn handler_results_are_peeled() {
        let rules = dispatch([
            when_eq(2, |v| optional(v * 3)),
            when_eq(0, |_| Peeled::later(async { 100 })),
            otherwise(|| None::<i32>),
        ]);
        assert_eq!(rules.apply(2).await, Ok(6));
        assert_eq!(rules.apply(0).await, Ok(100));
        assert_eq!(rules.apply(5).await, Err(Error::Null));
    }

    #[tokio::test]
    async fn rules_are_reusable() {
        let rules = dispatch([otherwise(|| "always")]);
        assert_eq!(rules.apply(1).await, Ok("always"));
        assert_eq!(rules.apply(2).await, Ok("always"));
    }

    #[tokio::test]
    async fn deferred_values_suspend_then_dispatch() {
        let pending = Optional::defer(async { 4 });
        let rules = dispatch([when(|v: &i32| v % 2 == 0, |v| v + 1), otherwise(|| 0)]);
        assert_eq!(rules.apply_deferred(&pending).await, Ok(5));
    }

    #[tokio::test]
    async fn a_failed_resolution_with_a_default_yields_the_default() {
        static BOOM: Kind = Kind::new("Boom", "bang");
        let failed = Optional::<i32>::failed(Fault::of(&BOOM));
        let rules = dispatch([otherwise(|| 1)]);
        assert_eq!(rules.apply_deferred_or(&failed, 42).await, 42);
        assert_eq!(
            rules.apply_deferred(&failed).await,
            Err(Error::Fault(Fault::of(&BOOM)))
        );
    }

    #[tokio::test]
    async fn shape_rules_match_partially() {
        use std::collections::BTreeMap;
        let probe: BTreeMap<&str, i32> = [("b", 1)].into_iter().collect();
        let rules = dispatch([when_shape(probe, |_| "hit"), otherwise(|| "miss")]);
        let value: BTreeMap<&str, i32> = [("a", 3), ("b", 1)].into_iter().collect();
        assert_eq!(rules.apply(value).await, Ok("hit"));
        let other: BTreeMap<&str, i32> = [("b", 2)].into_iter().collect();
        assert_eq!(rules.apply(other).await, Ok("miss"));
    }
}
