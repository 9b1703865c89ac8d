//! Complex - a conjunctive candidate rule body.
//!
//! A complex holds at most one selector per patient attribute dimension.
//! An absent selector imposes no constraint, so `Complex::default()` is the
//! wildcard that covers every patient.

use crate::selector::{LinearSelector, Selector, SetSelector};
use medrule_core::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Bound;

pub type EntitySelector = SetSelector<EntityId>;
pub type ScalarSelector = LinearSelector<u32>;

/// Conjunction of per-dimension selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Complex {
    symptoms: Option<EntitySelector>,
    negative_tests: Option<EntitySelector>,
    previous_diseases: Option<EntitySelector>,
    age: Option<ScalarSelector>,
    height: Option<ScalarSelector>,
    weight: Option<ScalarSelector>,
}

impl Complex {
    /// The wildcard complex.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symptoms(&self) -> Option<&EntitySelector> {
        self.symptoms.as_ref()
    }

    pub fn negative_tests(&self) -> Option<&EntitySelector> {
        self.negative_tests.as_ref()
    }

    pub fn previous_diseases(&self) -> Option<&EntitySelector> {
        self.previous_diseases.as_ref()
    }

    pub fn age(&self) -> Option<&ScalarSelector> {
        self.age.as_ref()
    }

    pub fn height(&self) -> Option<&ScalarSelector> {
        self.height.as_ref()
    }

    pub fn weight(&self) -> Option<&ScalarSelector> {
        self.weight.as_ref()
    }

    pub fn set_symptoms(&mut self, selector: Option<EntitySelector>) {
        self.symptoms = selector;
    }

    pub fn set_negative_tests(&mut self, selector: Option<EntitySelector>) {
        self.negative_tests = selector;
    }

    pub fn set_previous_diseases(&mut self, selector: Option<EntitySelector>) {
        self.previous_diseases = selector;
    }

    pub fn set_age(&mut self, selector: Option<ScalarSelector>) {
        self.age = selector;
    }

    pub fn set_height(&mut self, selector: Option<ScalarSelector>) {
        self.height = selector;
    }

    pub fn set_weight(&mut self, selector: Option<ScalarSelector>) {
        self.weight = selector;
    }

    pub fn with_symptoms(mut self, selector: impl Into<EntitySelector>) -> Self {
        self.symptoms = Some(selector.into());
        self
    }

    pub fn with_negative_tests(mut self, selector: impl Into<EntitySelector>) -> Self {
        self.negative_tests = Some(selector.into());
        self
    }

    pub fn with_previous_diseases(mut self, selector: impl Into<EntitySelector>) -> Self {
        self.previous_diseases = Some(selector.into());
        self
    }

    pub fn with_age(mut self, selector: ScalarSelector) -> Self {
        self.age = Some(selector);
        self
    }

    pub fn with_height(mut self, selector: ScalarSelector) -> Self {
        self.height = Some(selector);
        self
    }

    pub fn with_weight(mut self, selector: ScalarSelector) -> Self {
        self.weight = Some(selector);
        self
    }

    /// Whether no selector constrains anything.
    pub fn is_wildcard(&self) -> bool {
        self.nominal_dimensions()
            .iter()
            .all(|(_, s)| s.map_or(true, |s| s.is_wildcard()))
            && self
                .linear_dimensions()
                .iter()
                .all(|(_, s)| s.map_or(true, |s| s.is_wildcard()))
    }

    /// True iff every present selector covers the patient's attribute.
    pub fn is_patient_covered(&self, patient: &Patient) -> bool {
        let sets = [
            (&self.symptoms, &patient.symptoms),
            (&self.negative_tests, &patient.negative_tests),
            (&self.previous_diseases, &patient.previous_and_current_diseases),
        ];
        let scalars = [
            (&self.age, patient.age),
            (&self.height, patient.height),
            (&self.weight, patient.weight),
        ];

        sets.iter().all(|(selector, values)| {
            selector
                .as_ref()
                .map_or(true, |s| s.covers_set(values.iter()))
        }) && scalars.iter().all(|(selector, value)| match (selector, value) {
            (None, _) => true,
            (Some(s), Some(v)) => s.covers(v),
            (Some(s), None) => s.is_wildcard(),
        })
    }

    /// Whether `self` is at least as general as `other`.
    ///
    /// Every selector present in `self` must dominate the corresponding
    /// selector of `other`; a dimension `self` leaves open imposes nothing.
    pub fn contains(&self, other: &Complex) -> bool {
        dimension_contains(&self.symptoms, &other.symptoms)
            && dimension_contains(&self.negative_tests, &other.negative_tests)
            && dimension_contains(&self.previous_diseases, &other.previous_diseases)
            && dimension_contains(&self.age, &other.age)
            && dimension_contains(&self.height, &other.height)
            && dimension_contains(&self.weight, &other.weight)
    }

    /// Selector-wise meet. `None` when some dimension becomes unsatisfiable.
    pub fn conjunction(&self, other: &Complex) -> Option<Complex> {
        Some(Complex {
            symptoms: dimension_conjunction(&self.symptoms, &other.symptoms)?,
            negative_tests: dimension_conjunction(&self.negative_tests, &other.negative_tests)?,
            previous_diseases: dimension_conjunction(
                &self.previous_diseases,
                &other.previous_diseases,
            )?,
            age: dimension_conjunction(&self.age, &other.age)?,
            height: dimension_conjunction(&self.height, &other.height)?,
            weight: dimension_conjunction(&self.weight, &other.weight)?,
        })
    }

    fn nominal_dimensions(&self) -> [(Predicate, Option<&EntitySelector>); 3] {
        [
            (Predicate::HasSymptom, self.symptoms.as_ref()),
            (Predicate::NegativeTestResult, self.negative_tests.as_ref()),
            (Predicate::HadOrHasDisease, self.previous_diseases.as_ref()),
        ]
    }

    fn linear_dimensions(&self) -> [(Predicate, Option<&ScalarSelector>); 3] {
        [
            (Predicate::Age, self.age.as_ref()),
            (Predicate::Height, self.height.as_ref()),
            (Predicate::Weight, self.weight.as_ref()),
        ]
    }

    /// Turn this complex into rules asserting `category` for `target`.
    ///
    /// Every required clause of a set selector contributes one atom, and a
    /// selector with only allowed values asks for one of them. Each
    /// combination of choices becomes its own rule. A single combination
    /// keeps `name`; several are suffixed `-1`, `-2`, ...
    ///
    /// Atoms cannot say that a patient has no other value, so a rule from a
    /// restricted set selector may also fire on patients the complex
    /// excludes. Every covered patient satisfies at least one of the rules.
    pub fn generate_rules(&self, name: &str, category: &Entity, target: Target) -> Vec<Rule> {
        let mut shared = vec![Atom::class(PATIENT_CLASS, Argument::patient())];
        for (predicate, selector) in self.linear_dimensions() {
            if let Some(selector) = selector.filter(|s| !s.is_wildcard()) {
                shared.extend(range_atoms(predicate, selector));
            }
        }

        let mut alternatives: Vec<BTreeSet<Atom>> = vec![BTreeSet::new()];
        for (predicate, selector) in self.nominal_dimensions() {
            let Some(selector) = selector.filter(|s| !s.is_wildcard()) else {
                continue;
            };
            let slots: Vec<&BTreeSet<EntityId>> = if selector.required().is_empty() {
                vec![selector.allowed().values()]
            } else {
                selector.required().iter().collect()
            };
            for slot in slots {
                let mut next: Vec<BTreeSet<Atom>> = Vec::new();
                for prefix in &alternatives {
                    for value in slot {
                        let mut atoms = prefix.clone();
                        atoms.insert(Atom::property(
                            predicate,
                            Argument::patient(),
                            Argument::Entity(value.clone()),
                        ));
                        if !next.contains(&atoms) {
                            next.push(atoms);
                        }
                    }
                }
                alternatives = next;
            }
        }

        let head = Atom::property(
            target.predicate(),
            Argument::patient(),
            Argument::Entity(category.id.clone()),
        );
        let single = alternatives.len() == 1;
        alternatives
            .into_iter()
            .enumerate()
            .map(|(i, atoms)| {
                let rule_name = if single {
                    name.to_string()
                } else {
                    format!("{}-{}", name, i + 1)
                };
                let mut rule = Rule::new(rule_name).with_head(head.clone());
                rule.body.extend(shared.iter().cloned());
                rule.body.extend(atoms);
                rule
            })
            .collect()
    }
}

fn dimension_contains<S: Selector>(mine: &Option<S>, theirs: &Option<S>) -> bool {
    match (mine, theirs) {
        (None, _) => true,
        (Some(m), Some(t)) => m.contains(t),
        (Some(m), None) => m.is_wildcard(),
    }
}

/// Outer `None`: unsatisfiable. Inner `None`: dimension left open.
fn dimension_conjunction<S: Selector>(a: &Option<S>, b: &Option<S>) -> Option<Option<S>> {
    match (a, b) {
        (None, None) => Some(None),
        (Some(s), None) | (None, Some(s)) => Some(Some(s.clone())),
        (Some(x), Some(y)) => x.conjunction(y).map(Some),
    }
}

/// `age(?p, ?age)` plus one or two comparisons, or `equal` for a point.
fn range_atoms(predicate: Predicate, selector: &ScalarSelector) -> Vec<Atom> {
    let var = Argument::variable(predicate.as_str());
    let mut atoms = vec![Atom::property(predicate, Argument::patient(), var.clone())];

    if let (Bound::Included(l), Bound::Included(u)) = (selector.lower(), selector.upper()) {
        if l == u {
            atoms.push(Atom::builtin(
                Comparison::Equal,
                var,
                Argument::Literal(i64::from(l)),
            ));
            return atoms;
        }
    }

    match selector.lower() {
        Bound::Included(l) => atoms.push(Atom::builtin(
            Comparison::GreaterThanOrEqual,
            var.clone(),
            Argument::Literal(i64::from(l)),
        )),
        Bound::Excluded(l) => atoms.push(Atom::builtin(
            Comparison::GreaterThan,
            var.clone(),
            Argument::Literal(i64::from(l)),
        )),
        Bound::Unbounded => {}
    }
    match selector.upper() {
        Bound::Included(u) => atoms.push(Atom::builtin(
            Comparison::LessThanOrEqual,
            var,
            Argument::Literal(i64::from(u)),
        )),
        Bound::Excluded(u) => atoms.push(Atom::builtin(
            Comparison::LessThan,
            var,
            Argument::Literal(i64::from(u)),
        )),
        Bound::Unbounded => {}
    }
    atoms
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for (predicate, selector) in self.nominal_dimensions() {
            if let Some(s) = selector {
                parts.push(format!("{} {}", predicate, s));
            }
        }
        for (predicate, selector) in self.linear_dimensions() {
            if let Some(s) = selector {
                parts.push(format!("{} in {}", predicate, s));
            }
        }
        if parts.is_empty() {
            write!(f, "<any>")
        } else {
            write!(f, "{}", parts.join(" & "))
        }
    }
}
