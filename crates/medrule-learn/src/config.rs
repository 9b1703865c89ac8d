//! Learner configuration.

use crate::error::{LearnError, LearnResult};
use medrule_core::patient::Target;
use serde::{Deserialize, Serialize};

/// Tuning parameters for sequential covering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Outcome that labels patients and that learned rules assert.
    #[serde(default)]
    pub target: Target,
    /// Complexes kept in the star after each refinement.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    /// Where between the positive and negative value a numeric split lands.
    #[serde(default = "default_split_epsilon")]
    pub split_epsilon: f64,
    /// Minimum share of covered patients an outcome needs to become a category.
    #[serde(default = "default_vote_threshold")]
    pub vote_threshold: f64,
    /// Prefix of generated rule names.
    #[serde(default = "default_rule_prefix")]
    pub rule_prefix: String,
}

fn default_beam_width() -> usize { 5 }
fn default_split_epsilon() -> f64 { 0.5 }
fn default_vote_threshold() -> f64 { 0.5 }
fn default_rule_prefix() -> String { "learned-rule".to_string() }

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            beam_width: default_beam_width(),
            split_epsilon: default_split_epsilon(),
            vote_threshold: default_vote_threshold(),
            rule_prefix: default_rule_prefix(),
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> LearnResult<()> {
        if self.beam_width == 0 {
            return Err(LearnError::InvalidConfig("beam_width must be at least 1".into()));
        }
        if !(self.split_epsilon > 0.0 && self.split_epsilon < 1.0) {
            return Err(LearnError::InvalidConfig(format!(
                "split_epsilon out of range: {} (must be between 0 and 1, exclusive)",
                self.split_epsilon
            )));
        }
        if !(self.vote_threshold > 0.0 && self.vote_threshold <= 1.0) {
            return Err(LearnError::InvalidConfig(format!(
                "vote_threshold out of range: {} (must be in (0, 1])",
                self.vote_threshold
            )));
        }
        if self.rule_prefix.trim().is_empty() {
            return Err(LearnError::InvalidConfig("rule_prefix must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LearnerConfig::default();
        assert_eq!(config.beam_width, 5);
        assert_eq!(config.target, Target::Disease);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let zero_beam = LearnerConfig { beam_width: 0, ..Default::default() };
        assert!(matches!(zero_beam.validate(), Err(LearnError::InvalidConfig(_))));

        let bad_epsilon = LearnerConfig { split_epsilon: 1.0, ..Default::default() };
        assert!(bad_epsilon.validate().is_err());

        let bad_threshold = LearnerConfig { vote_threshold: 0.0, ..Default::default() };
        assert!(bad_threshold.validate().is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: LearnerConfig = serde_json::from_str(r#"{"target": "treatment"}"#).unwrap();
        assert_eq!(config.target, Target::Treatment);
        assert_eq!(config.rule_prefix, "learned-rule");
    }
}
