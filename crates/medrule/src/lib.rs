//! # medrule
//!
//! Rule-based medical diagnosis. Diagnostic rules are induced from labeled
//! patient cases by AQ-style sequential covering and then fired on new
//! patients.
//!
//! ## Quick Start
//!
//! ```rust
//! use medrule::prelude::*;
//!
//! let mut kb = KnowledgeBase::new()
//!     .with_symptom(Entity::new("Cough", "Cough"))
//!     .with_symptom(Entity::new("Rash", "Rash"))
//!     .with_disease(Entity::new("Flu", "Flu"))
//!     .with_disease(Entity::new("Measles", "Measles"));
//!
//! let mut flu = Patient::new("P1", "P1");
//! flu.symptoms.insert("Cough".into());
//! flu.diseases.insert("Flu".into());
//! let mut measles = Patient::new("P2", "P2");
//! measles.symptoms.insert("Rash".into());
//! measles.diseases.insert("Measles".into());
//! kb = kb.with_patient(flu).with_patient(measles);
//!
//! let diagnoser = Diagnoser::learn(&kb, LearnerConfig::default()).unwrap();
//!
//! let mut new_case = Patient::new("P3", "P3");
//! new_case.symptoms.insert("Rash".into());
//! let diagnosis = diagnoser.diagnose(&mut new_case);
//! assert!(diagnosis.inferred.contains(&EntityId::new("Measles")));
//! ```
//!
//! ## Architecture
//!
//! - [`medrule_core`] - Entities, patients, rules, the ontology trait and knowledge base
//! - [`medrule_learn`] - Selectors, complexes, stars and the sequential covering learner
//!
//! ## Learned rules
//!
//! A learned rule reads like
//!
//! ```text
//! learned-rule-1: Patient(?p) ^ hasSymptom(?p, Cough) -> hasDisease(?p, Flu)
//! ```
//!
//! Nominal selectors accept any of their values, so a complex selecting
//! two symptoms becomes two rules, one per symptom.

pub mod diagnoser;

pub use medrule_core as core;
pub use medrule_learn as learn;

pub use diagnoser::{Diagnoser, Diagnosis};

/// Prelude module for convenient imports.
///
/// ```rust
/// use medrule::prelude::*;
/// ```
pub mod prelude {
    // Domain model
    pub use medrule_core::entity::{Entity, EntityId};
    pub use medrule_core::patient::{Patient, Predicate, Target};
    pub use medrule_core::rule::{Argument, Atom, Comparison, Rule};
    pub use medrule_core::ontology::{KnowledgeBase, Ontology};
    pub use medrule_core::hierarchy::ClassHierarchy;
    pub use medrule_core::error::{CoreError, CoreResult};

    // Learning
    pub use medrule_learn::selector::{LinearSelector, NominalSelector, Selector, SetSelector};
    pub use medrule_learn::complex::Complex;
    pub use medrule_learn::covering::{CoveringStep, LearningReport, MachineLearning};
    pub use medrule_learn::config::LearnerConfig;
    pub use medrule_learn::error::{LearnError, LearnResult};

    // Diagnosis
    pub use crate::diagnoser::{Diagnoser, Diagnosis};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
