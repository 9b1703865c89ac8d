//! Rules - named conjunctions of body atoms implying head atoms.
//!
//! Rules are plain values. They can be evaluated against a single patient
//! (the patient is bound to [`PATIENT_VARIABLE`]) and fired to add their head
//! facts to the patient's inferred outcomes.
//!
//! ```text
//! Patient(?p) ^ hasSymptom(?p, Fever) ^ age(?p, ?age) ^ greaterThan(?age, 40)
//!     -> hasDisease(?p, Influenza)
//! ```

use crate::entity::EntityId;
use crate::hierarchy::ClassHierarchy;
use crate::patient::{Patient, Predicate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Variable the evaluated patient is bound to.
pub const PATIENT_VARIABLE: &str = "p";

/// Class every patient belongs to.
pub const PATIENT_CLASS: &str = "Patient";

/// An atom argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// Variable name, without the leading `?`.
    Variable(String),
    Entity(EntityId),
    Literal(i64),
}

impl Argument {
    pub fn variable(name: impl Into<String>) -> Self {
        Argument::Variable(name.into())
    }

    pub fn patient() -> Self {
        Argument::Variable(PATIENT_VARIABLE.to_string())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Variable(name) => write!(f, "?{}", name),
            Argument::Entity(id) => write!(f, "{}", id),
            Argument::Literal(n) => write!(f, "{}", n),
        }
    }
}

/// Namespace an atom's predicate lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    /// Ontology classes and properties.
    Default,
    /// Built-in numeric comparisons.
    Builtin,
}

/// Built-in numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::GreaterThan => "greaterThan",
            Comparison::GreaterThanOrEqual => "greaterThanOrEqual",
            Comparison::LessThan => "lessThan",
            Comparison::LessThanOrEqual => "lessThanOrEqual",
            Comparison::Equal => "equal",
        }
    }

    pub fn holds(&self, left: i64, right: i64) -> bool {
        match self {
            Comparison::GreaterThan => left > right,
            Comparison::GreaterThanOrEqual => left >= right,
            Comparison::LessThan => left < right,
            Comparison::LessThanOrEqual => left <= right,
            Comparison::Equal => left == right,
        }
    }
}

/// One atom of a rule body or head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Atom {
    /// `class(argument)` - the argument is an instance of the class.
    Class { class: EntityId, argument: Argument },
    /// `predicate(subject, object)`.
    Property {
        predicate: Predicate,
        subject: Argument,
        object: Argument,
    },
    /// `comparison(left, right)` over numbers.
    Builtin {
        comparison: Comparison,
        left: Argument,
        right: Argument,
    },
}

impl Atom {
    pub fn class(class: impl Into<String>, argument: Argument) -> Self {
        Atom::Class {
            class: EntityId::new(class),
            argument,
        }
    }

    pub fn property(predicate: Predicate, subject: Argument, object: Argument) -> Self {
        Atom::Property {
            predicate,
            subject,
            object,
        }
    }

    pub fn builtin(comparison: Comparison, left: Argument, right: Argument) -> Self {
        Atom::Builtin {
            comparison,
            left,
            right,
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self {
            Atom::Builtin { .. } => Namespace::Builtin,
            _ => Namespace::Default,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Class { class, argument } => write!(f, "{}({})", class, argument),
            Atom::Property {
                predicate,
                subject,
                object,
            } => write!(f, "{}({}, {})", predicate, subject, object),
            Atom::Builtin {
                comparison,
                left,
                right,
            } => write!(f, "builtin:{}({}, {})", comparison.as_str(), left, right),
        }
    }
}

/// A named implication `body -> head`. Equality is by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub body: BTreeSet<Atom>,
    pub head: BTreeSet<Atom>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: BTreeSet::new(),
            head: BTreeSet::new(),
        }
    }

    pub fn with_body(mut self, atom: Atom) -> Self {
        self.body.insert(atom);
        self
    }

    pub fn with_head(mut self, atom: Atom) -> Self {
        self.head.insert(atom);
        self
    }

    /// Whether every body atom holds for `patient`.
    ///
    /// Numeric variables are bound from data-property atoms such as
    /// `age(?p, ?age)`; an unknown value leaves the body unsatisfied.
    pub fn is_satisfied_by(&self, patient: &Patient, hierarchy: &ClassHierarchy) -> bool {
        let mut numbers: HashMap<&str, i64> = HashMap::new();
        for atom in &self.body {
            if let Atom::Property {
                predicate,
                subject,
                object: Argument::Variable(var),
            } = atom
            {
                if !predicate.is_numeric() || !is_patient(subject) {
                    continue;
                }
                match patient.scalar(*predicate) {
                    Some(value) => {
                        numbers.insert(var.as_str(), i64::from(value));
                    }
                    None => return false,
                }
            }
        }

        self.body
            .iter()
            .all(|atom| atom_holds(atom, patient, hierarchy, &numbers))
    }

    /// Entity objects asserted by the head, with their predicates.
    pub fn conclusions(&self) -> impl Iterator<Item = (Predicate, &EntityId)> {
        self.head.iter().filter_map(|atom| match atom {
            Atom::Property {
                predicate,
                object: Argument::Entity(id),
                ..
            } => Some((*predicate, id)),
            _ => None,
        })
    }
}

fn is_patient(argument: &Argument) -> bool {
    matches!(argument, Argument::Variable(name) if name == PATIENT_VARIABLE)
}

fn atom_holds(
    atom: &Atom,
    patient: &Patient,
    hierarchy: &ClassHierarchy,
    numbers: &HashMap<&str, i64>,
) -> bool {
    match atom {
        Atom::Class { class, argument } => match argument {
            Argument::Variable(_) if is_patient(argument) => {
                class.as_str() == PATIENT_CLASS
                    || hierarchy.is_a(patient.id(), class)
                    || patient
                        .entity
                        .parent_classes
                        .iter()
                        .any(|parent| hierarchy.is_a(parent, class))
            }
            Argument::Entity(id) => hierarchy.is_a(id, class),
            _ => false,
        },
        Atom::Property {
            predicate,
            subject,
            object,
        } => {
            if !is_patient(subject) {
                return false;
            }
            match object {
                Argument::Entity(id) => patient.holds(*predicate, id),
                Argument::Literal(n) => patient
                    .scalar(*predicate)
                    .map(|v| i64::from(v) == *n)
                    .unwrap_or(false),
                Argument::Variable(var) => numbers.contains_key(var.as_str()),
            }
        }
        Atom::Builtin {
            comparison,
            left,
            right,
        } => {
            let resolve = |arg: &Argument| match arg {
                Argument::Literal(n) => Some(*n),
                Argument::Variable(var) => numbers.get(var.as_str()).copied(),
                Argument::Entity(_) => None,
            };
            match (resolve(left), resolve(right)) {
                (Some(l), Some(r)) => comparison.holds(l, r),
                _ => false,
            }
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Rule {}

impl std::hash::Hash for Rule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |atoms: &BTreeSet<Atom>| {
            atoms
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(" ^ ")
        };
        write!(f, "{}: {} -> {}", self.name, join(&self.body), join(&self.head))
    }
}

impl Patient {
    /// Fire `rule` against this patient. Returns how many new facts were inferred.
    pub fn apply_rule(&mut self, rule: &Rule, hierarchy: &ClassHierarchy) -> usize {
        if !rule.is_satisfied_by(self, hierarchy) {
            return 0;
        }
        let conclusions: Vec<(Predicate, EntityId)> = rule
            .conclusions()
            .map(|(predicate, id)| (predicate, id.clone()))
            .collect();
        conclusions
            .into_iter()
            .filter(|(predicate, id)| self.infer(*predicate, id.clone()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flu_rule() -> Rule {
        Rule::new("flu")
            .with_body(Atom::class(PATIENT_CLASS, Argument::patient()))
            .with_body(Atom::property(
                Predicate::HasSymptom,
                Argument::patient(),
                Argument::Entity("Fever".into()),
            ))
            .with_body(Atom::property(
                Predicate::Age,
                Argument::patient(),
                Argument::variable("age"),
            ))
            .with_body(Atom::builtin(
                Comparison::GreaterThanOrEqual,
                Argument::variable("age"),
                Argument::Literal(18),
            ))
            .with_head(Atom::property(
                Predicate::HasDisease,
                Argument::patient(),
                Argument::Entity("Flu".into()),
            ))
    }

    #[test]
    fn body_matches_patient() {
        let h = ClassHierarchy::new();
        let mut adult = Patient::new("P1", "P1").with_age(30);
        adult.symptoms.insert("Fever".into());
        assert!(flu_rule().is_satisfied_by(&adult, &h));

        let mut child = Patient::new("P2", "P2").with_age(10);
        child.symptoms.insert("Fever".into());
        assert!(!flu_rule().is_satisfied_by(&child, &h));
    }

    #[test]
    fn unknown_age_fails_numeric_body() {
        let h = ClassHierarchy::new();
        let mut p = Patient::new("P1", "P1");
        p.symptoms.insert("Fever".into());
        assert!(!flu_rule().is_satisfied_by(&p, &h));
    }

    #[test]
    fn firing_adds_inferred_outcome_once() {
        let h = ClassHierarchy::new();
        let mut p = Patient::new("P1", "P1").with_age(30);
        p.symptoms.insert("Fever".into());

        assert_eq!(p.apply_rule(&flu_rule(), &h), 1);
        assert!(p.inferred_diseases.contains(&EntityId::new("Flu")));
        assert_eq!(p.apply_rule(&flu_rule(), &h), 0);
    }

    #[test]
    fn class_atoms_use_hierarchy() {
        use crate::entity::Entity;
        let h = ClassHierarchy::from_entities(&[Entity::new("Adult", "Adult").with_parent("Person")]);
        let rule = Rule::new("r").with_body(Atom::class("Person", Argument::patient()));

        let mut p = Patient::new("P1", "P1");
        assert!(!rule.is_satisfied_by(&p, &h));
        p.entity.parent_classes.insert("Adult".into());
        assert!(rule.is_satisfied_by(&p, &h));
    }

    #[test]
    fn rules_compare_by_name() {
        let a = Rule::new("r1");
        let b = Rule::new("r1").with_head(Atom::class("X", Argument::patient()));
        assert_eq!(a, b);
        assert_eq!(Atom::class("X", Argument::patient()).namespace(), Namespace::Default);
    }

    #[test]
    fn display_renders_body_and_head() {
        let text = Rule::new("r")
            .with_body(Atom::class(PATIENT_CLASS, Argument::patient()))
            .with_head(Atom::property(
                Predicate::HasDisease,
                Argument::patient(),
                Argument::Entity("Flu".into()),
            ))
            .to_string();
        assert_eq!(text, "r: Patient(?p) -> hasDisease(?p, Flu)");
    }
}
