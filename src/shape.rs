//! Deep **partial structural** comparison for shape matchers.
//!
//! [`PartialShape::contains_shape`] asks whether a value covers a
//! probe: every piece *present in the probe* must match the
//! corresponding piece of the value, and anything else in the value
//! is ignored. Partiality applies at the top level of a container;
//! nested values compare by deep equality. Concretely, with maps:
//!
//! - probe `{b: {c: 1}}` matches value `{a: 3, b: {c: 1}}`
//!   (extra top-level key `a` is ignored), but
//! - probe `{b: {c: 1}}` does **not** match `{a: 3, b: {c: 1, d: 0}}`
//!   (the nested map under `b` must be equal, and `d` makes it differ).
//!
//! All probe entries are checked — a mismatch in any sibling rejects
//! the match.
//!
//! Implementations are provided for primitives and strings (plain
//! equality), [`Option`] (probe `None` requires absence), the std
//! maps (probe keys must exist with equal values), and [`Vec`] (the
//! probe is an element-wise equal prefix).

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::Hash;

/// Types a structural probe can be matched against.
pub trait PartialShape {
    /// Whether `self` covers `probe`.
    fn contains_shape(&self, probe: &Self) -> bool;
}

macro_rules! equality_shape {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PartialShape for $ty {
                fn contains_shape(&self, probe: &Self) -> bool {
                    self == probe
                }
            }
        )*
    };
}

equality_shape!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &str,
);

impl<T> PartialShape for Option<T>
where
    T: PartialShape,
{
    fn contains_shape(&self, probe: &Self) -> bool {
        match (self, probe) {
            (Some(value), Some(inner)) => value.contains_shape(inner),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K, V> PartialShape for HashMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn contains_shape(&self, probe: &Self) -> bool {
        probe.iter().all(|(key, inner)| self.get(key) == Some(inner))
    }
}

impl<K, V> PartialShape for BTreeMap<K, V>
where
    K: Ord,
    V: PartialEq,
{
    fn contains_shape(&self, probe: &Self) -> bool {
        probe.iter().all(|(key, inner)| self.get(key) == Some(inner))
    }
}

impl<T> PartialShape for Vec<T>
where
    T: PartialEq,
{
    fn contains_shape(&self, probe: &Self) -> bool {
        probe.len() <= self.len() && self.iter().zip(probe).all(|(value, inner)| value == inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(
        pairs: &[(&'static str, &[(&'static str, i32)])],
    ) -> BTreeMap<&'static str, BTreeMap<&'static str, i32>> {
        pairs
            .iter()
            .map(|(key, inner)| (*key, inner.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn extra_top_level_keys_are_ignored() {
        let value: BTreeMap<&str, i32> = [("a", 3), ("b", 1)].into_iter().collect();
        let probe: BTreeMap<&str, i32> = [("b", 1)].into_iter().collect();
        assert!(value.contains_shape(&probe));
    }

    #[test]
    fn nested_maps_must_match_exactly() {
        let probe = nested(&[("b", &[("c", 1)])]);
        let hit = nested(&[("a", &[]), ("b", &[("c", 1)])]);
        let miss = nested(&[("a", &[]), ("b", &[("c", 1), ("d", 0)])]);
        assert!(hit.contains_shape(&probe));
        assert!(!miss.contains_shape(&probe));
    }

    #[test]
    fn every_sibling_probe_key_is_checked() {
        let probe = nested(&[("b", &[("c", 1)]), ("e", &[("f", 2)])]);
        let first_matches_only = nested(&[("b", &[("c", 1)]), ("e", &[("f", 99)])]);
        assert!(!first_matches_only.contains_shape(&probe));
    }

    #[test]
    fn missing_probe_key_rejects() {
        let value: BTreeMap<&str, i32> = [("a", 1)].into_iter().collect();
        let probe: BTreeMap<&str, i32> = [("b", 1)].into_iter().collect();
        assert!(!value.contains_shape(&probe));
    }

    #[test]
    fn primitives_compare_by_equality() {
        assert!(5.contains_shape(&5));
        assert!(!5.contains_shape(&6));
        assert!("hi".contains_shape(&"hi"));
    }

    #[test]
    fn vec_probe_is_a_prefix() {
        assert!(vec![1, 2, 3].contains_shape(&vec![1, 2]));
        assert!(!vec![1, 2, 3].contains_shape(&vec![2]));
        assert!(!vec![1].contains_shape(&vec![1, 2]));
    }

    #[test]
    fn option_probe_none_requires_absence() {
        assert!(None::<i32>.contains_shape(&None));
        assert!(Some(4).contains_shape(&Some(4)));
        assert!(!Some(4).contains_shape(&None));
    }
}
