//! Patients and the predicates that relate them to ontology entities.
//!
//! A patient carries three kinds of facts:
//!
//! 1. **Inputs** - symptoms, negative test results and previous or current
//!    diseases, used to match rule bodies
//! 2. **Asserted outcomes** - diseases, tests, treatments and causes a
//!    clinician recorded, used as training labels
//! 3. **Inferred outcomes** - facts added by firing learned rules
//!
//! Facts are added through [`Patient::assert_fact`] and [`Patient::infer`],
//! which dispatch on [`Predicate`] rather than on method names.

use crate::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Properties that relate a patient to an entity or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    HasSymptom,
    NegativeTestResult,
    HadOrHasDisease,
    HasDisease,
    ShouldMakeTest,
    ShouldBeTreatedWith,
    CausedBy,
    Age,
    Height,
    Weight,
}

impl Predicate {
    /// Name used when rendering atoms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::HasSymptom => "hasSymptom",
            Predicate::NegativeTestResult => "negativeTestResult",
            Predicate::HadOrHasDisease => "hadOrHasDisease",
            Predicate::HasDisease => "hasDisease",
            Predicate::ShouldMakeTest => "shouldMakeTest",
            Predicate::ShouldBeTreatedWith => "shouldBeTreatedWith",
            Predicate::CausedBy => "causedBy",
            Predicate::Age => "age",
            Predicate::Height => "height",
            Predicate::Weight => "weight",
        }
    }

    /// Whether the object of this predicate is a number rather than an entity.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Predicate::Age | Predicate::Height | Predicate::Weight)
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which outcome labels a patient for learning and which head a rule asserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Disease,
    Test,
    Treatment,
}

impl Target {
    /// Predicate asserted in the head of rules learned for this target.
    pub fn predicate(&self) -> Predicate {
        match self {
            Target::Disease => Predicate::HasDisease,
            Target::Test => Predicate::ShouldMakeTest,
            Target::Treatment => Predicate::ShouldBeTreatedWith,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Disease => write!(f, "disease"),
            Target::Test => write!(f, "test"),
            Target::Treatment => write!(f, "treatment"),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disease" => Ok(Target::Disease),
            "test" => Ok(Target::Test),
            "treatment" => Ok(Target::Treatment),
            other => Err(format!("unknown target '{}' (expected disease, test or treatment)", other)),
        }
    }
}

/// A patient record.
///
/// Unknown demographic values are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,

    #[serde(default)]
    pub symptoms: BTreeSet<EntityId>,
    #[serde(default)]
    pub negative_tests: BTreeSet<EntityId>,
    #[serde(default)]
    pub previous_and_current_diseases: BTreeSet<EntityId>,

    #[serde(default)]
    pub diseases: BTreeSet<EntityId>,
    #[serde(default)]
    pub tests: BTreeSet<EntityId>,
    #[serde(default)]
    pub treatments: BTreeSet<EntityId>,
    #[serde(default)]
    pub causes: BTreeSet<EntityId>,

    #[serde(default)]
    pub inferred_diseases: BTreeSet<EntityId>,
    #[serde(default)]
    pub inferred_tests: BTreeSet<EntityId>,
    #[serde(default)]
    pub inferred_treatments: BTreeSet<EntityId>,
    #[serde(default)]
    pub inferred_causes: BTreeSet<EntityId>,
}

impl Patient {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            entity: Entity::new(id, label),
            first_name: None,
            last_name: None,
            age: None,
            height: None,
            weight: None,
            symptoms: BTreeSet::new(),
            negative_tests: BTreeSet::new(),
            previous_and_current_diseases: BTreeSet::new(),
            diseases: BTreeSet::new(),
            tests: BTreeSet::new(),
            treatments: BTreeSet::new(),
            causes: BTreeSet::new(),
            inferred_diseases: BTreeSet::new(),
            inferred_tests: BTreeSet::new(),
            inferred_treatments: BTreeSet::new(),
            inferred_causes: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.entity.id
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Add an asserted fact. Returns `false` for numeric predicates,
    /// which are set through the scalar fields instead.
    pub fn assert_fact(&mut self, predicate: Predicate, entity: EntityId) -> bool {
        let set = match predicate {
            Predicate::HasSymptom => &mut self.symptoms,
            Predicate::NegativeTestResult => &mut self.negative_tests,
            Predicate::HadOrHasDisease => &mut self.previous_and_current_diseases,
            Predicate::HasDisease => &mut self.diseases,
            Predicate::ShouldMakeTest => &mut self.tests,
            Predicate::ShouldBeTreatedWith => &mut self.treatments,
            Predicate::CausedBy => &mut self.causes,
            Predicate::Age | Predicate::Height | Predicate::Weight => return false,
        };
        set.insert(entity);
        true
    }

    /// Add an inferred outcome. Only outcome predicates can be inferred;
    /// anything else returns `false` and leaves the patient unchanged.
    pub fn infer(&mut self, predicate: Predicate, entity: EntityId) -> bool {
        let set = match predicate {
            Predicate::HasDisease => &mut self.inferred_diseases,
            Predicate::ShouldMakeTest => &mut self.inferred_tests,
            Predicate::ShouldBeTreatedWith => &mut self.inferred_treatments,
            Predicate::CausedBy => &mut self.inferred_causes,
            _ => return false,
        };
        set.insert(entity)
    }

    /// Whether `predicate(self, entity)` holds, counting inferred outcomes.
    pub fn holds(&self, predicate: Predicate, entity: &EntityId) -> bool {
        match predicate {
            Predicate::HasSymptom => self.symptoms.contains(entity),
            Predicate::NegativeTestResult => self.negative_tests.contains(entity),
            Predicate::HadOrHasDisease => self.previous_and_current_diseases.contains(entity),
            Predicate::HasDisease => {
                self.diseases.contains(entity) || self.inferred_diseases.contains(entity)
            }
            Predicate::ShouldMakeTest => {
                self.tests.contains(entity) || self.inferred_tests.contains(entity)
            }
            Predicate::ShouldBeTreatedWith => {
                self.treatments.contains(entity) || self.inferred_treatments.contains(entity)
            }
            Predicate::CausedBy => self.causes.contains(entity) || self.inferred_causes.contains(entity),
            Predicate::Age | Predicate::Height | Predicate::Weight => false,
        }
    }

    /// Value of a numeric predicate, `None` when unknown or not numeric.
    pub fn scalar(&self, predicate: Predicate) -> Option<u32> {
        match predicate {
            Predicate::Age => self.age,
            Predicate::Height => self.height,
            Predicate::Weight => self.weight,
            _ => None,
        }
    }

    /// Asserted outcomes for a learning target (the training label).
    pub fn outcomes(&self, target: Target) -> &BTreeSet<EntityId> {
        match target {
            Target::Disease => &self.diseases,
            Target::Test => &self.tests,
            Target::Treatment => &self.treatments,
        }
    }

    /// Inferred outcomes for a learning target.
    pub fn inferred_outcomes(&self, target: Target) -> &BTreeSet<EntityId> {
        match target {
            Target::Disease => &self.inferred_diseases,
            Target::Test => &self.inferred_tests,
            Target::Treatment => &self.inferred_treatments,
        }
    }

    pub fn clear_inferred(&mut self) {
        self.inferred_diseases.clear();
        self.inferred_tests.clear();
        self.inferred_treatments.clear();
        self.inferred_causes.clear();
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl Eq for Patient {}
