//! # medrule Core
//!
//! Domain model shared by every medrule crate:
//!
//! - **Entity** - identity-bearing ontology object (symptom, disease, test,
//!   treatment, cause, class) compared by ID only
//! - **Patient** - demographic scalars plus asserted and inferred fact sets
//! - **Rule** - a named conjunction of body atoms implying head atoms
//! - **Ontology** - the narrow read interface the learning engine consumes
//! - **KnowledgeBase** - an in-memory, JSON-loadable `Ontology` with patients
//!
//! ## Quick Start
//!
//! ```rust
//! use medrule_core::prelude::*;
//!
//! let fever = Entity::new("Fever", "Fever");
//! let mut patient = Patient::new("P1", "Patient one");
//! patient.symptoms.insert(fever.id.clone());
//! assert!(patient.symptoms.contains(&EntityId::new("Fever")));
//! ```

pub mod entity;
pub mod patient;
pub mod rule;
pub mod ontology;
pub mod hierarchy;
pub mod error;
pub mod prelude;
