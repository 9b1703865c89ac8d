//! Error types for rule induction.

use medrule_core::entity::EntityId;
use thiserror::Error;

/// Result type for learning operations.
pub type LearnResult<T> = std::result::Result<T, LearnError>;

/// Errors that end a `sequential_covering` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LearnError {
    /// No attribute dimension separates the seeds, or no separating complex
    /// is consistent with the current beam.
    #[error("Cannot separate positive seed {positive} from negative seed {negative}")]
    PartialStarCreation { positive: EntityId, negative: EntityId },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training patient {0} has no outcome for the learning target")]
    UnlabeledPatient(EntityId),

    #[error("Learned complex for seed {0} covers no uncovered patient")]
    NoProgress(EntityId),

    #[error("Category {0} is not defined in the ontology")]
    UnknownCategory(EntityId),

    #[error("Learning was cancelled after {rules} rules")]
    Cancelled { rules: usize },

    #[error("Invalid learner configuration: {0}")]
    InvalidConfig(String),
}
