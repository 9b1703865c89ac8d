//! Selectors - per-attribute acceptance tests.
//!
//! A selector constrains one attribute dimension of a [`Complex`](crate::complex::Complex).
//! Two kinds exist:
//!
//! - [`NominalSelector`] - a set of acceptable values for a set-valued
//!   attribute. A patient set is covered when it is non-empty and every one
//!   of its values is acceptable. The empty selector is a wildcard.
//! - [`LinearSelector`] - an interval over an ordered domain, each side
//!   open, closed or unbounded.
//!
//! [`SetSelector`] combines a [`NominalSelector`] with clauses that each
//! require one of their values to be present. Its conjunction is exact,
//! which the nominal part alone cannot be once a seed has to be told apart
//! from a patient holding a subset of its values.
//!
//! Selectors form a lattice: [`Selector::conjunction`] is the meet and
//! [`Selector::contains`] is the partial order (`a.contains(b)` when `a`
//! accepts everything `b` accepts).

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Bound;

/// A per-attribute acceptance test.
pub trait Selector: Clone {
    type Value;

    /// Whether a single value is acceptable.
    fn covers(&self, value: &Self::Value) -> bool;

    /// Whether a patient's collection of values satisfies the selector.
    fn covers_set<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a;

    /// Meet of two selectors. `None` when nothing can satisfy both.
    fn conjunction(&self, other: &Self) -> Option<Self>;

    /// Whether `self` accepts everything `other` accepts.
    fn contains(&self, other: &Self) -> bool;

    /// Whether the selector imposes no constraint at all.
    fn is_wildcard(&self) -> bool;
}

/// Set-membership selector over a nominal domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NominalSelector<T: Ord> {
    values: BTreeSet<T>,
}

impl<T: Ord + Clone> NominalSelector<T> {
    /// The wildcard selector.
    pub fn new() -> Self {
        Self {
            values: BTreeSet::new(),
        }
    }

    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, value: T) -> bool {
        self.values.insert(value)
    }

    pub fn values(&self) -> &BTreeSet<T> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Ord + Clone> Default for NominalSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Selector for NominalSelector<T> {
    type Value = T;

    fn covers(&self, value: &T) -> bool {
        self.values.is_empty() || self.values.contains(value)
    }

    /// An empty selector covers anything, including an empty collection.
    /// A non-empty selector needs every element to be acceptable and never
    /// covers an empty collection.
    fn covers_set<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a,
    {
        if self.values.is_empty() {
            return true;
        }
        let mut values = values.into_iter().peekable();
        values.peek().is_some() && values.all(|v| self.values.contains(v))
    }

    fn conjunction(&self, other: &Self) -> Option<Self> {
        if self.values.is_empty() {
            return Some(other.clone());
        }
        if other.values.is_empty() {
            return Some(self.clone());
        }
        let values: BTreeSet<T> = self.values.intersection(&other.values).cloned().collect();
        if values.is_empty() {
            None
        } else {
            Some(Self { values })
        }
    }

    fn contains(&self, other: &Self) -> bool {
        if self.values.is_empty() {
            return true;
        }
        !other.values.is_empty() && self.values.is_superset(&other.values)
    }

    fn is_wildcard(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Ord + fmt::Display> fmt::Display for NominalSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", values.join(", "))
    }
}

/// Selector for a set-valued attribute.
///
/// A collection is covered when the [`NominalSelector`] part covers it and
/// it holds at least one value of every required clause. Clauses are kept
/// inside the allowed values and free of redundant supersets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetSelector<T: Ord> {
    allowed: NominalSelector<T>,
    required: BTreeSet<BTreeSet<T>>,
}

impl<T: Ord + Clone> SetSelector<T> {
    /// The wildcard selector.
    pub fn new() -> Self {
        Self {
            allowed: NominalSelector::new(),
            required: BTreeSet::new(),
        }
    }

    /// Collections whose values all lie in `values`.
    pub fn within(values: impl IntoIterator<Item = T>) -> Self {
        NominalSelector::from_values(values).into()
    }

    /// Collections holding at least one of `values`. Empty `values` yields
    /// the wildcard.
    pub fn any_of(values: impl IntoIterator<Item = T>) -> Self {
        let clause: BTreeSet<T> = values.into_iter().collect();
        let mut required = BTreeSet::new();
        if !clause.is_empty() {
            required.insert(clause);
        }
        Self {
            allowed: NominalSelector::new(),
            required,
        }
    }

    pub fn allowed(&self) -> &NominalSelector<T> {
        &self.allowed
    }

    /// Clauses of which the collection must hit every one.
    pub fn required(&self) -> &BTreeSet<BTreeSet<T>> {
        &self.required
    }

    /// Restrict clauses to the allowed values and drop those implied by a
    /// smaller one. `None` if a clause has nothing allowed left.
    fn normalized(allowed: NominalSelector<T>, clauses: impl IntoIterator<Item = BTreeSet<T>>) -> Option<Self> {
        let mut restricted = Vec::new();
        for clause in clauses {
            let clause: BTreeSet<T> = if allowed.is_empty() {
                clause
            } else {
                clause.intersection(allowed.values()).cloned().collect()
            };
            if clause.is_empty() {
                return None;
            }
            restricted.push(clause);
        }
        let required = restricted
            .iter()
            .filter(|c| !restricted.iter().any(|d| d.len() < c.len() && d.is_subset(c)))
            .cloned()
            .collect();
        Some(Self { allowed, required })
    }
}

impl<T: Ord + Clone> Default for SetSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> From<NominalSelector<T>> for SetSelector<T> {
    fn from(allowed: NominalSelector<T>) -> Self {
        Self {
            allowed,
            required: BTreeSet::new(),
        }
    }
}

impl<T: Ord + Clone> Selector for SetSelector<T> {
    type Value = T;

    /// A single value is treated as the one-element collection.
    fn covers(&self, value: &T) -> bool {
        self.allowed.covers(value) && self.required.iter().all(|c| c.contains(value))
    }

    fn covers_set<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a,
    {
        let values: Vec<&T> = values.into_iter().collect();
        self.allowed.covers_set(values.iter().copied())
            && self
                .required
                .iter()
                .all(|c| values.iter().any(|v| c.contains(*v)))
    }

    fn conjunction(&self, other: &Self) -> Option<Self> {
        let allowed = self.allowed.conjunction(&other.allowed)?;
        let clauses = self.required.iter().chain(&other.required).cloned();
        Self::normalized(allowed, clauses)
    }

    /// Sound but not complete: a clause of `self` counts as implied when
    /// `other` requires a subset of it or only allows values from it.
    fn contains(&self, other: &Self) -> bool {
        self.allowed.contains(&other.allowed)
            && self.required.iter().all(|c| {
                other.required.iter().any(|d| d.is_subset(c))
                    || (!other.allowed.is_empty() && other.allowed.values().is_subset(c))
            })
    }

    fn is_wildcard(&self) -> bool {
        self.allowed.is_wildcard() && self.required.is_empty()
    }
}

impl<T: Ord + fmt::Display> fmt::Display for SetSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for clause in &self.required {
            let values: Vec<String> = clause.iter().map(|v| v.to_string()).collect();
            parts.push(format!("has {{{}}}", values.join(", ")));
        }
        if !self.allowed.values.is_empty() {
            parts.push(format!("only {}", self.allowed));
        }
        if parts.is_empty() {
            write!(f, "*")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Interval selector over an ordered domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinearSelector<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T: Ord + Copy> LinearSelector<T> {
    /// The wildcard interval.
    pub fn unbounded() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    /// An interval from explicit bounds. `None` if it is empty.
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Option<Self> {
        let selector = Self { lower, upper };
        if selector.is_empty() {
            None
        } else {
            Some(selector)
        }
    }

    pub fn at_least(value: T) -> Self {
        Self {
            lower: Bound::Included(value),
            upper: Bound::Unbounded,
        }
    }

    pub fn greater_than(value: T) -> Self {
        Self {
            lower: Bound::Excluded(value),
            upper: Bound::Unbounded,
        }
    }

    pub fn at_most(value: T) -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Included(value),
        }
    }

    pub fn less_than(value: T) -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Excluded(value),
        }
    }

    pub fn exactly(value: T) -> Self {
        Self {
            lower: Bound::Included(value),
            upper: Bound::Included(value),
        }
    }

    pub fn lower(&self) -> Bound<T> {
        self.lower
    }

    pub fn upper(&self) -> Bound<T> {
        self.upper
    }

    // Treats the domain as dense: (3, 4) is not considered empty.
    fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
            (Bound::Included(l), Bound::Included(u)) => l > u,
            (Bound::Included(l), Bound::Excluded(u))
            | (Bound::Excluded(l), Bound::Included(u))
            | (Bound::Excluded(l), Bound::Excluded(u)) => l >= u,
        }
    }
}

/// Whether lower bound `a` admits everything lower bound `b` admits.
fn lower_admits<T: Ord>(a: &Bound<T>, b: &Bound<T>) -> bool {
    match (a, b) {
        (Bound::Unbounded, _) => true,
        (_, Bound::Unbounded) => false,
        (Bound::Excluded(x), Bound::Included(y)) => x < y,
        (Bound::Included(x), Bound::Included(y))
        | (Bound::Included(x), Bound::Excluded(y))
        | (Bound::Excluded(x), Bound::Excluded(y)) => x <= y,
    }
}

/// Whether upper bound `a` admits everything upper bound `b` admits.
fn upper_admits<T: Ord>(a: &Bound<T>, b: &Bound<T>) -> bool {
    match (a, b) {
        (Bound::Unbounded, _) => true,
        (_, Bound::Unbounded) => false,
        (Bound::Excluded(x), Bound::Included(y)) => x > y,
        (Bound::Included(x), Bound::Included(y))
        | (Bound::Included(x), Bound::Excluded(y))
        | (Bound::Excluded(x), Bound::Excluded(y)) => x >= y,
    }
}

impl<T: Ord + Copy> Selector for LinearSelector<T> {
    type Value = T;

    fn covers(&self, value: &T) -> bool {
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Included(l) => *value >= l,
            Bound::Excluded(l) => *value > l,
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Included(u) => *value <= u,
            Bound::Excluded(u) => *value < u,
        };
        above && below
    }

    fn covers_set<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a,
    {
        values.into_iter().all(|v| self.covers(v))
    }

    fn conjunction(&self, other: &Self) -> Option<Self> {
        let lower = if lower_admits(&self.lower, &other.lower) {
            other.lower
        } else {
            self.lower
        };
        let upper = if upper_admits(&self.upper, &other.upper) {
            other.upper
        } else {
            self.upper
        };
        Self::new(lower, upper)
    }

    fn contains(&self, other: &Self) -> bool {
        lower_admits(&self.lower, &other.lower) && upper_admits(&self.upper, &other.upper)
    }

    fn is_wildcard(&self) -> bool {
        matches!((self.lower, self.upper), (Bound::Unbounded, Bound::Unbounded))
    }
}

impl<T: fmt::Display> fmt::Display for LinearSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Bound::Included(l) => write!(f, "[{}, ", l)?,
            Bound::Excluded(l) => write!(f, "({}, ", l)?,
            Bound::Unbounded => write!(f, "(-inf, ")?,
        }
        match &self.upper {
            Bound::Included(u) => write!(f, "{}]", u),
            Bound::Excluded(u) => write!(f, "{})", u),
            Bound::Unbounded => write!(f, "+inf)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal(values: &[&str]) -> NominalSelector<String> {
        NominalSelector::from_values(values.iter().map(|s| s.to_string()))
    }

    fn set(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_nominal_is_wildcard() {
        let any = nominal(&[]);
        assert!(any.is_wildcard());
        assert!(any.covers(&"x".to_string()));
        assert!(any.covers_set(&set(&[])));
        assert!(any.covers_set(&set(&["a", "b"])));
    }

    #[test]
    fn non_empty_nominal_rejects_empty_collection() {
        let s = nominal(&["a"]);
        assert!(!s.covers_set(&set(&[])));
        assert!(s.covers_set(&set(&["a"])));
        assert!(!s.covers_set(&set(&["z"])));
        assert!(s.covers(&"a".to_string()));
        assert!(!s.covers(&"z".to_string()));
    }

    #[test]
    fn nominal_needs_every_value_acceptable() {
        let s = nominal(&["a", "b"]);
        assert!(s.covers_set(&set(&["a", "b"])));
        assert!(s.covers_set(&set(&["b"])));
        assert!(!s.covers_set(&set(&["a", "z"])));
    }

    #[test]
    fn nominal_conjunction_is_exact() {
        let ab = nominal(&["a", "b"]);
        let bc = nominal(&["b", "c"]);
        let both = ab.conjunction(&bc).unwrap();
        let collections: [&[&str]; 7] = [&[], &["a"], &["b"], &["c"], &["a", "c"], &["a", "b"], &["b", "c"]];
        for values in collections {
            let values = set(values);
            assert_eq!(
                both.covers_set(&values),
                ab.covers_set(&values) && bc.covers_set(&values),
                "{:?}",
                values
            );
        }
    }

    #[test]
    fn nominal_conjunction_intersects() {
        let ab = nominal(&["a", "b"]);
        let bc = nominal(&["b", "c"]);
        assert_eq!(ab.conjunction(&bc), Some(nominal(&["b"])));
        assert_eq!(ab.conjunction(&nominal(&[])), Some(ab.clone()));
        assert_eq!(ab.conjunction(&nominal(&["z"])), None);
    }

    #[test]
    fn nominal_contains_is_superset() {
        let ab = nominal(&["a", "b"]);
        let a = nominal(&["a"]);
        assert!(ab.contains(&a));
        assert!(!a.contains(&ab));
        assert!(nominal(&[]).contains(&ab));
        assert!(!ab.contains(&nominal(&[])));
    }

    fn any_of(values: &[&str]) -> SetSelector<String> {
        SetSelector::any_of(values.iter().map(|s| s.to_string()))
    }

    fn within(values: &[&str]) -> SetSelector<String> {
        SetSelector::within(values.iter().map(|s| s.to_string()))
    }

    #[test]
    fn set_selector_requires_each_clause() {
        let s = any_of(&["a"]).conjunction(&any_of(&["b"])).unwrap();
        assert!(s.covers_set(&set(&["a", "b"])));
        assert!(s.covers_set(&set(&["a", "b", "z"])));
        assert!(!s.covers_set(&set(&["a"])));
        assert!(!s.covers_set(&set(&[])));
        assert!(!s.covers(&"a".to_string()));
        assert!(SetSelector::<String>::new().is_wildcard());
        assert!(SetSelector::any_of(Vec::<String>::new()).is_wildcard());
    }

    #[test]
    fn set_selector_conjunction_is_exact() {
        let selectors = [
            any_of(&["a", "b"]),
            any_of(&["b", "c"]),
            any_of(&["c"]),
            within(&["a", "b"]),
            within(&["b", "c"]),
            within(&["a", "b"]).conjunction(&any_of(&["a"])).unwrap(),
            SetSelector::new(),
        ];
        let collections: [&[&str]; 8] = [
            &[],
            &["a"],
            &["b"],
            &["c"],
            &["a", "b"],
            &["a", "c"],
            &["b", "c"],
            &["a", "b", "c"],
        ];
        for x in &selectors {
            for y in &selectors {
                let both = x.conjunction(y);
                for values in collections {
                    let values = set(values);
                    let expected = x.covers_set(&values) && y.covers_set(&values);
                    let actual = both.as_ref().is_some_and(|s| s.covers_set(&values));
                    assert_eq!(actual, expected, "{} & {} on {:?}", x, y, values);
                }
            }
        }
    }

    #[test]
    fn set_selector_conjunction_detects_unsatisfiable_clauses() {
        assert!(within(&["a"]).conjunction(&any_of(&["b"])).is_none());
        assert!(within(&["a"]).conjunction(&within(&["b"])).is_none());
        let narrowed = within(&["a", "b"]).conjunction(&any_of(&["b", "c"])).unwrap();
        let expected: BTreeSet<String> = ["b".to_string()].into_iter().collect();
        assert_eq!(narrowed.required().iter().collect::<Vec<_>>(), vec![&expected]);
    }

    #[test]
    fn set_selector_contains_is_sound() {
        let a = any_of(&["a"]);
        let ab = any_of(&["a", "b"]);
        assert!(ab.contains(&a));
        assert!(!a.contains(&ab));
        assert!(a.contains(&within(&["a"])));
        assert!(!within(&["a"]).contains(&a));
        assert!(SetSelector::new().contains(&a));
        assert!(within(&["a", "b"]).contains(&within(&["a"])));
    }

    #[test]
    fn set_selector_display() {
        assert_eq!(SetSelector::<String>::new().to_string(), "*");
        let s = within(&["a", "b"]).conjunction(&any_of(&["a"])).unwrap();
        assert_eq!(s.to_string(), "has {a}, only {a, b}");
    }

    #[test]
    fn linear_covers_interval() {
        let s = LinearSelector::new(Bound::Excluded(18), Bound::Included(65)).unwrap();
        assert!(!s.covers(&18));
        assert!(s.covers(&19));
        assert!(s.covers(&65));
        assert!(!s.covers(&66));
        assert!(s.covers_set(&[20, 30]));
        assert!(!s.covers_set(&[20, 70]));
        assert!(LinearSelector::<u32>::unbounded().covers(&0));
    }

    #[test]
    fn linear_conjunction_picks_tighter_bounds() {
        let adult = LinearSelector::at_least(18u32);
        let young = LinearSelector::less_than(30u32);
        let both = adult.conjunction(&young).unwrap();
        assert_eq!(both.lower(), Bound::Included(18));
        assert_eq!(both.upper(), Bound::Excluded(30));

        let open = LinearSelector::greater_than(18u32);
        assert_eq!(adult.conjunction(&open).unwrap().lower(), Bound::Excluded(18));
    }

    #[test]
    fn disjoint_intervals_have_no_conjunction() {
        assert!(LinearSelector::at_most(10u32)
            .conjunction(&LinearSelector::greater_than(10u32))
            .is_none());
        assert!(LinearSelector::at_most(10u32)
            .conjunction(&LinearSelector::at_least(10u32))
            .is_some());
    }

    #[test]
    fn linear_contains_is_enclosure() {
        let wide = LinearSelector::at_least(10u32);
        let narrow = LinearSelector::new(Bound::Excluded(10u32), Bound::Included(20)).unwrap();
        assert!(wide.contains(&narrow));
        assert!(!narrow.contains(&wide));
        assert!(LinearSelector::unbounded().contains(&wide));
        assert!(!LinearSelector::greater_than(10u32).contains(&LinearSelector::at_least(10u32)));
    }

    #[test]
    fn display_shows_bounds() {
        let s = LinearSelector::new(Bound::Included(1u32), Bound::Excluded(5)).unwrap();
        assert_eq!(s.to_string(), "[1, 5)");
        assert_eq!(nominal(&["a", "b"]).to_string(), "{a, b}");
    }
}
