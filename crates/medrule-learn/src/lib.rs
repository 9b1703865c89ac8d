//! # medrule Learn
//!
//! Rule induction by AQ-style sequential covering.
//!
//! Given labeled training patients and an [`Ontology`](medrule_core::ontology::Ontology),
//! [`MachineLearning::sequential_covering`] produces rules whose bodies
//! describe patient attributes and whose heads assert an outcome (disease,
//! test or treatment). Every training patient is covered by at least one
//! learned complex.
//!
//! ## Building blocks
//!
//! - **Selector** - per-attribute acceptance test ([`NominalSelector`], [`SetSelector`], [`LinearSelector`])
//! - **Complex** - conjunction of selectors over six patient dimensions
//! - **Star** - beam of candidate complexes for one positive seed
//! - **ComplexComparator** - lexicographic ranking used to truncate the beam
//! - **DistanceMetric** - normalized distance for seed selection
//!
//! ## Quick Start
//!
//! ```rust
//! use medrule_core::prelude::*;
//! use medrule_learn::prelude::*;
//!
//! let kb = KnowledgeBase::new()
//!     .with_symptom(Entity::new("Cough", "Cough"))
//!     .with_symptom(Entity::new("Rash", "Rash"))
//!     .with_disease(Entity::new("Flu", "Flu"))
//!     .with_disease(Entity::new("Measles", "Measles"));
//!
//! let mut p1 = Patient::new("P1", "P1");
//! p1.symptoms.insert("Cough".into());
//! p1.diseases.insert("Flu".into());
//! let mut p2 = Patient::new("P2", "P2");
//! p2.symptoms.insert("Rash".into());
//! p2.diseases.insert("Measles".into());
//!
//! let rules = MachineLearning::new(&kb).sequential_covering(&[p1, p2]).unwrap();
//! assert_eq!(rules.len(), 2);
//! ```

pub mod selector;
pub mod complex;
pub mod star;
pub mod comparator;
pub mod distance;
pub mod covering;
pub mod config;
pub mod error;
pub mod prelude;

pub use covering::{CoveringStep, LearningReport, MachineLearning};
pub use selector::{LinearSelector, NominalSelector, Selector, SetSelector};
