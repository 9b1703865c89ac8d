//! medrule Learn Prelude - the learner and its building blocks.
//!
//! ```rust
//! use medrule_learn::prelude::*;
//! ```

pub use crate::selector::{LinearSelector, NominalSelector, Selector, SetSelector};
pub use crate::complex::{Complex, EntitySelector, ScalarSelector};
pub use crate::star::Star;
pub use crate::comparator::{ComplexComparator, ComplexScore};
pub use crate::distance::DistanceMetric;
pub use crate::covering::{CoveringStep, LearningReport, MachineLearning};
pub use crate::config::LearnerConfig;
pub use crate::error::{LearnError, LearnResult};
