#![deny(missing_docs)]
//! # eventual — async optional/fallible values + structural matching
//!
//! Core pieces:
//!
//! - [`optional`](mod@optional): [`Optional<T>`], a deferred,
//!   possibly-absent value with non-mutating transformations
//!   (`map`, `otherwise`, `coalesce`, `reduce`), side-effecting
//!   consumption (`for_each`, `move_into`), and combination
//!   (`zip`, [`all`])
//! - [`fallible`](mod@fallible): [`Fallible<T>`], the error-carrying
//!   specialization where a tagged [`Fault`] flows through the same
//!   channel as successes and `get` is loud by default
//! - [`matcher`]: ordered, short-circuiting dispatch rules
//!   ([`when`], [`when_eq`], [`when_shape`], [`when_kind`],
//!   [`otherwise`]) and the [`Dispatch`] engine behind `match_with`
//! - [`block`](mod@block): linear unwrap-or-abort composition with
//!   the block-scoped [`Just`] operator
//! - [`deferred`]: the memoized single-slot cell every optional owns
//! - [`fault`]: statically declared error kinds and the fault values
//!   that carry them
//!
//! ## Concepts
//!
//! A value enters the pipeline as an [`Optional<T>`] — wrapping a
//! literal, an absence, or a pending computation — and flows through
//! chained transformations that are **asynchronous-safe**: matching
//! and mapping work transparently whether the underlying value is
//! already resolved or still pending, and the backing computation
//! runs at most once. Absence and failure are distinct outcomes, and
//! both propagate lazily: transformation functions are simply never
//! invoked on a non-filled input, and nothing surfaces until a caller
//! finally asks for a concrete value with `get`.
//!
//! Transformers may return a plain value, an [`Option`], a nested
//! [`Optional`], or a deferred result; **peeling** (see [`peel`])
//! recursively normalizes all of those into one flat deferred value.
//!
//! ## Quick start
//!
//! ```rust
//! use eventual::matcher::otherwise;
//! use eventual::matcher::when_eq;
//! use eventual::optional;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // peeling: the mapper returns a nested Optional, the chain flattens it
//! let six = optional(2).map(|v| optional(v * 3));
//! assert_eq!(six.get().await, Ok(6));
//!
//! // ordered dispatch: the first matching rule wins
//! let shout = optional("hello").match_with([
//!     when_eq("hel", |_| "nil".to_string()),
//!     when_eq("hello", |v: &str| v.to_uppercase()),
//!     otherwise(|| "nil".to_string()),
//! ]);
//! assert_eq!(shout.get().await, Ok("HELLO".to_string()));
//! # }
//! ```
//!
//! ### Errors as values
//!
//! ```rust
//! use eventual::err;
//! use eventual::ok;
//! use eventual::Error;
//! use eventual::Fault;
//! use eventual::Kind;
//!
//! static PARSE: Kind = Kind::new("ParseError", "could not parse");
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // a Fallible makes the error path loud by default...
//! assert_eq!(ok(1).get().await, Ok(1));
//! assert!(matches!(
//!     err::<i32>(Fault::of(&PARSE)).get().await,
//!     Err(Error::Fault(_))
//! ));
//! // ...unless a default is supplied
//! assert_eq!(err::<i32>(Fault::of(&PARSE)).get_or(2).await, 2);
//! # }
//! ```
//!
//! ### Linear composition
//!
//! ```rust
//! use eventual::block;
//! use eventual::optional;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let out = block(|just| async move {
//!     let a = just.just(optional(20)).await?;
//!     let b = just.just(Some(22)).await?;
//!     Ok(a + b)
//! })
//! .await;
//! assert_eq!(out.get().await, Ok(42));
//! # }
//! ```

/// Linear unwrap-or-abort composition (`block` / `just`).
pub mod block;

/// The memoized single-slot async cell behind every optional.
pub mod deferred;

/// The library error taxonomy.
pub mod error;

/// The error-carrying specialization of `Optional`.
pub mod fallible;

/// Tagged error kinds and fault values.
pub mod fault;

/// Ordered dispatch rules and the matching engine.
pub mod matcher;

/// The Optional monad.
pub mod optional;

/// Recursive normalization of transducer results.
pub mod peel;

/// Deep partial structural comparison for shape matchers.
pub mod shape;

pub use block::block;
pub use block::Abort;
pub use block::IntoBlockValue;
pub use block::IntoJust;
pub use block::Just;
pub use deferred::Deferred;
pub use deferred::Outcome;
pub use error::Error;
pub use fallible::err;
pub use fallible::ok;
pub use fallible::when_err;
pub use fallible::when_err_kind;
pub use fallible::when_ok;
pub use fallible::Fallible;
pub use fault::verify_distinct;
pub use fault::Fault;
pub use fault::Kind;
pub use matcher::dispatch;
pub use matcher::otherwise;
pub use matcher::when;
pub use matcher::when_eq;
pub use matcher::when_kind;
pub use matcher::when_shape;
pub use matcher::Dispatch;
pub use matcher::Matcher;
pub use optional::all;
pub use optional::empty;
pub use optional::optional;
pub use optional::Optional;
pub use peel::IntoPeeled;
pub use peel::Peeled;
pub use shape::PartialShape;
