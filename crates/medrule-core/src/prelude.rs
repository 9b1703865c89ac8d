//! medrule Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use medrule_core::prelude::*;
//! ```

pub use crate::entity::{Entity, EntityId};
pub use crate::patient::{Patient, Predicate, Target};
pub use crate::rule::{Argument, Atom, Comparison, Namespace, Rule, PATIENT_CLASS, PATIENT_VARIABLE};
pub use crate::ontology::{EntityMap, KnowledgeBase, Ontology};
pub use crate::hierarchy::ClassHierarchy;
pub use crate::error::{CoreError, CoreResult};
