//! Sequential covering - the outer rule-induction loop.
//!
//! ```text
//! uncovered := training
//! while uncovered is not empty:
//!     complex  := find_complex(training, uncovered)     // beam search
//!     category := majority vote among covered training patients
//!     uncovered -= patients covered by complex
//!     rules    += complex as rules asserting category
//! ```
//!
//! `find_complex` picks the uncovered patient farthest from everything
//! already covered as the positive seed, then repeatedly picks the nearest
//! patient with different outcomes that the star still covers as the
//! negative seed, and refines the star with a partial star separating the
//! two. It stops when the star covers no negative patient.
//!
//! The engine is single-threaded and allocation-only; it never mutates the
//! training patients.

use crate::comparator::ComplexComparator;
use crate::complex::{Complex, EntitySelector, ScalarSelector};
use crate::config::LearnerConfig;
use crate::distance::DistanceMetric;
use crate::error::{LearnError, LearnResult};
use crate::selector::{LinearSelector, SetSelector};
use crate::star::Star;
use medrule_core::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One iteration of the outer covering loop.
#[derive(Debug, Clone)]
pub struct CoveringStep {
    /// Positive seed the complex was grown from.
    pub seed: EntityId,
    pub complex: Complex,
    /// Outcomes that passed the vote threshold.
    pub categories: Vec<EntityId>,
    /// Names of the rules emitted for this complex.
    pub rules: Vec<String>,
    /// Patients removed from the uncovered set by this step.
    pub newly_covered: usize,
}

/// Rules plus the trace of how they were learned.
#[derive(Debug, Clone, Default)]
pub struct LearningReport {
    pub rules: Vec<Rule>,
    pub steps: Vec<CoveringStep>,
}

/// AQ-style rule learner over an ontology.
pub struct MachineLearning<'o, O: Ontology + ?Sized> {
    ontology: &'o O,
    config: LearnerConfig,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<'o, O: Ontology + ?Sized> MachineLearning<'o, O> {
    pub fn new(ontology: &'o O) -> Self {
        Self {
            ontology,
            config: LearnerConfig::default(),
            interrupt: None,
        }
    }

    pub fn with_config(mut self, config: LearnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.config.target = target;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.config.beam_width = beam_width;
        self
    }

    /// Flag checked before every covering iteration; setting it cancels the run.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Learn rules that cover every training patient.
    pub fn sequential_covering(&self, training: &[Patient]) -> LearnResult<Vec<Rule>> {
        self.sequential_covering_with_report(training)
            .map(|report| report.rules)
    }

    /// Like [`sequential_covering`](Self::sequential_covering), also
    /// returning one [`CoveringStep`] per learned complex.
    pub fn sequential_covering_with_report(&self, training: &[Patient]) -> LearnResult<LearningReport> {
        self.config.validate()?;
        if training.is_empty() {
            return Err(LearnError::EmptyTrainingSet);
        }
        if let Some(p) = training.iter().find(|p| p.outcomes(self.config.target).is_empty()) {
            return Err(LearnError::UnlabeledPatient(p.id().clone()));
        }

        let training: Vec<&Patient> = training.iter().collect();
        let metric = DistanceMetric::new(self.ontology, &training);
        let mut uncovered: Vec<&Patient> = training.clone();
        let mut report = LearningReport::default();
        let mut rule_counter = 0usize;

        info!(
            "Sequential covering over {} patients (target: {})",
            training.len(),
            self.config.target
        );

        while !uncovered.is_empty() {
            if self.interrupted() {
                info!("Covering cancelled with {} patients uncovered", uncovered.len());
                return Err(LearnError::Cancelled {
                    rules: report.rules.len(),
                });
            }

            let (complex, seed) = self.find_complex(&training, &uncovered, &metric)?;
            let categories = self.majority_vote(&complex, &training);

            let before = uncovered.len();
            uncovered.retain(|p| !complex.is_patient_covered(p));
            let newly_covered = before - uncovered.len();
            if newly_covered == 0 {
                return Err(LearnError::NoProgress(seed.id().clone()));
            }

            let mut names = Vec::new();
            for category in &categories {
                let entity = self
                    .ontology
                    .outcomes(self.config.target)
                    .get(category)
                    .ok_or_else(|| LearnError::UnknownCategory(category.clone()))?;
                rule_counter += 1;
                let name = format!("{}-{}", self.config.rule_prefix, rule_counter);
                let rules = complex.generate_rules(&name, entity, self.config.target);
                names.extend(rules.iter().map(|r| r.name.clone()));
                report.rules.extend(rules);
            }

            if categories.is_empty() {
                warn!(
                    "No outcome reached the vote threshold for complex [{}]; no rule emitted",
                    complex
                );
            } else {
                info!(
                    "Learned [{}] -> {:?} from seed {} ({} newly covered, {} remaining)",
                    complex,
                    categories.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                    seed.id(),
                    newly_covered,
                    uncovered.len()
                );
            }

            report.steps.push(CoveringStep {
                seed: seed.id().clone(),
                complex,
                categories,
                rules: names,
                newly_covered,
            });
        }

        Ok(report)
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Beam search for the best complex around the farthest uncovered patient.
    pub fn find_complex<'p>(
        &self,
        training: &[&'p Patient],
        uncovered: &[&'p Patient],
        metric: &DistanceMetric,
    ) -> LearnResult<(Complex, &'p Patient)> {
        let uncovered_ids: BTreeSet<&EntityId> = uncovered.iter().map(|p| p.id()).collect();
        let covered: Vec<&Patient> = training
            .iter()
            .copied()
            .filter(|p| !uncovered_ids.contains(p.id()))
            .collect();

        let positive = metric
            .farthest(uncovered, &covered)
            .ok_or(LearnError::EmptyTrainingSet)?;

        let mut star = Star::new();
        while let Some(negative) = self.negative_seed(&star, training, positive, metric) {
            let separation_failed = || LearnError::PartialStarCreation {
                positive: positive.id().clone(),
                negative: negative.id().clone(),
            };

            let partial = self.partial_star(positive, negative);
            if partial.is_empty() {
                return Err(separation_failed());
            }

            star.intersection(&partial);
            if star.is_empty() {
                return Err(separation_failed());
            }
            star.delete_narrow_complexes();
            let comparator = ComplexComparator::new(training, uncovered, positive, self.config.target);
            star.sort_by(&comparator);
            star.leave_first_elements(self.config.beam_width);

            debug!(
                "Seed {} vs {}: {} partial complexes, {} kept, best [{}]",
                positive.id(),
                negative.id(),
                partial.len(),
                star.len(),
                star.best().map(|c| c.to_string()).unwrap_or_default()
            );
        }

        let best = star
            .into_best()
            .ok_or_else(|| LearnError::NoProgress(positive.id().clone()))?;
        Ok((best, positive))
    }

    /// Nearest patient to `positive` with different outcomes that `star` still covers.
    fn negative_seed<'p>(
        &self,
        star: &Star,
        training: &[&'p Patient],
        positive: &Patient,
        metric: &DistanceMetric,
    ) -> Option<&'p Patient> {
        let target = self.config.target;
        let candidates: Vec<&Patient> = training
            .iter()
            .copied()
            .filter(|p| p.outcomes(target) != positive.outcomes(target))
            .filter(|p| star.is_patient_covered(p))
            .collect();
        metric.nearest(&candidates, positive)
    }

    /// Single-dimension complexes that cover `positive` but not `negative`.
    pub fn partial_star(&self, positive: &Patient, negative: &Patient) -> Vec<Complex> {
        let mut partial = Vec::new();

        for s in separating_values(&positive.symptoms, &negative.symptoms) {
            partial.push(Complex::new().with_symptoms(s));
        }
        for s in separating_values(&positive.negative_tests, &negative.negative_tests) {
            partial.push(Complex::new().with_negative_tests(s));
        }
        for s in separating_values(
            &positive.previous_and_current_diseases,
            &negative.previous_and_current_diseases,
        ) {
            partial.push(Complex::new().with_previous_diseases(s));
        }

        let epsilon = self.config.split_epsilon;
        if let Some(s) = split(positive.age, negative.age, epsilon) {
            partial.push(Complex::new().with_age(s));
        }
        if let Some(s) = split(positive.height, negative.height, epsilon) {
            partial.push(Complex::new().with_height(s));
        }
        if let Some(s) = split(positive.weight, negative.weight, epsilon) {
            partial.push(Complex::new().with_weight(s));
        }

        partial
    }

    /// Share of covered training patients holding each outcome.
    pub fn category_votes(&self, complex: &Complex, training: &[&Patient]) -> Vec<(EntityId, f64)> {
        let target = self.config.target;
        let covered: Vec<&&Patient> = training
            .iter()
            .filter(|p| complex.is_patient_covered(p))
            .collect();
        if covered.is_empty() {
            return Vec::new();
        }

        let mut votes: BTreeMap<&EntityId, usize> = BTreeMap::new();
        for patient in &covered {
            for outcome in patient.outcomes(target) {
                *votes.entry(outcome).or_insert(0) += 1;
            }
        }

        let total = covered.len() as f64;
        let mut shares: Vec<(EntityId, f64)> = votes
            .into_iter()
            .map(|(id, n)| (id.clone(), n as f64 / total))
            .collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1));
        shares
    }

    /// Outcomes held by at least `vote_threshold` of the covered patients,
    /// most common first.
    pub fn majority_vote(&self, complex: &Complex, training: &[&Patient]) -> Vec<EntityId> {
        self.category_votes(complex, training)
            .into_iter()
            .filter(|(_, share)| *share >= self.config.vote_threshold)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Set selectors covering `positive` but not `negative`.
///
/// Both sets must be non-empty. When `negative` holds a value `positive`
/// lacks, the positive values bound what a patient may have. When
/// `positive` holds a value `negative` lacks, one of those values is
/// required.
fn separating_values(positive: &BTreeSet<EntityId>, negative: &BTreeSet<EntityId>) -> Vec<EntitySelector> {
    let mut selectors = Vec::new();
    if positive.is_empty() || negative.is_empty() {
        return selectors;
    }
    if !positive.is_superset(negative) {
        selectors.push(SetSelector::within(positive.iter().cloned()));
    }
    if !positive.is_subset(negative) {
        selectors.push(SetSelector::any_of(positive.difference(negative).cloned()));
    }
    selectors
}

/// Threshold between two known, different values, covering `positive`.
///
/// The split sits at `positive + (negative - positive) * epsilon`, rounded.
/// If it rounds onto the negative value the bound becomes exclusive.
fn split(positive: Option<u32>, negative: Option<u32>, epsilon: f64) -> Option<ScalarSelector> {
    let (Some(pos), Some(neg)) = (positive, negative) else {
        return None;
    };
    if pos == neg {
        return None;
    }
    let threshold = (f64::from(pos) + (f64::from(neg) - f64::from(pos)) * epsilon).round() as u32;
    let selector = if neg < pos {
        if threshold <= neg {
            LinearSelector::greater_than(neg)
        } else {
            LinearSelector::at_least(threshold)
        }
    } else if threshold >= neg {
        LinearSelector::less_than(neg)
    } else {
        LinearSelector::at_most(threshold)
    };
    Some(selector)
}
