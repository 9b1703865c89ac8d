//! Learn-then-apply convenience over a knowledge base.

use medrule_core::prelude::*;
use medrule_learn::config::LearnerConfig;
use medrule_learn::covering::MachineLearning;
use medrule_learn::error::{LearnError, LearnResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Outcome of running every rule against one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub patient: EntityId,
    pub target: Target,
    /// Names of the rules whose body held.
    pub fired: Vec<String>,
    /// All inferred outcomes for the target after firing.
    pub inferred: BTreeSet<EntityId>,
}

impl Diagnosis {
    pub fn is_empty(&self) -> bool {
        self.inferred.is_empty()
    }
}

/// A rule set plus the class hierarchy it is evaluated against.
#[derive(Debug, Clone)]
pub struct Diagnoser {
    rules: Vec<Rule>,
    hierarchy: ClassHierarchy,
    target: Target,
}

impl Diagnoser {
    pub fn new(rules: Vec<Rule>, hierarchy: ClassHierarchy, target: Target) -> Self {
        Self {
            rules,
            hierarchy,
            target,
        }
    }

    /// Learn rules from the knowledge base's labeled patients.
    ///
    /// Patients without any outcome for the configured target are not
    /// part of the training set.
    pub fn learn(kb: &KnowledgeBase, config: LearnerConfig) -> LearnResult<Self> {
        let target = config.target;
        let training: Vec<Patient> = kb
            .patients
            .iter()
            .filter(|p| !p.outcomes(target).is_empty())
            .cloned()
            .collect();
        if training.is_empty() {
            return Err(LearnError::EmptyTrainingSet);
        }
        info!(
            "Training on {} of {} patients",
            training.len(),
            kb.patients.len()
        );

        let rules = MachineLearning::new(kb)
            .with_config(config)
            .sequential_covering(&training)?;
        Ok(Self::new(rules, kb.hierarchy(), target))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Fire every rule on `patient`, recording inferred facts on it.
    pub fn diagnose(&self, patient: &mut Patient) -> Diagnosis {
        let mut fired = Vec::new();
        for rule in &self.rules {
            if rule.is_satisfied_by(patient, &self.hierarchy) {
                let added = patient.apply_rule(rule, &self.hierarchy);
                debug!("Rule {} fired on {} ({} new facts)", rule.name, patient.id(), added);
                fired.push(rule.name.clone());
            }
        }
        Diagnosis {
            patient: patient.id().clone(),
            target: self.target,
            fired,
            inferred: patient.inferred_outcomes(self.target).clone(),
        }
    }

    pub fn diagnose_all(&self, patients: &mut [Patient]) -> Vec<Diagnosis> {
        patients.iter_mut().map(|p| self.diagnose(p)).collect()
    }
}
