//! Heterogeneous distance between a patient and a group of patients.
//!
//! Six components are summed, each normalized to [0, 1]:
//!
//! - symptoms, negative tests, previous diseases: symmetric difference size
//!   divided by the size of the ontology catalogue for that dimension
//! - age, height, weight: absolute difference divided by the value range
//!   observed in the training set, counted only when both values are known
//!
//! Each component is averaged over the group. Distances are returned as
//! values; nothing is written to the patients.

use medrule_core::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default)]
struct Range {
    min: u32,
    max: u32,
}

impl Range {
    fn observe(values: impl Iterator<Item = Option<u32>>) -> Option<Range> {
        values.flatten().fold(None, |acc: Option<Range>, v| {
            Some(match acc {
                None => Range { min: v, max: v },
                Some(r) => Range {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            })
        })
    }

    fn width(&self) -> u32 {
        self.max - self.min
    }
}

/// Normalization constants for one training run.
#[derive(Debug, Clone)]
pub struct DistanceMetric {
    symptom_domain: usize,
    test_domain: usize,
    disease_domain: usize,
    age: Option<Range>,
    height: Option<Range>,
    weight: Option<Range>,
}

impl DistanceMetric {
    pub fn new<O: Ontology + ?Sized>(ontology: &O, training: &[&Patient]) -> Self {
        Self {
            symptom_domain: ontology.symptoms().len(),
            test_domain: ontology.tests().len(),
            disease_domain: ontology.diseases().len(),
            age: Range::observe(training.iter().map(|p| p.age)),
            height: Range::observe(training.iter().map(|p| p.height)),
            weight: Range::observe(training.iter().map(|p| p.weight)),
        }
    }

    /// Distance from `patient` to `others`; zero when `others` is empty.
    pub fn distance(&self, patient: &Patient, others: &[&Patient]) -> f64 {
        if others.is_empty() {
            return 0.0;
        }
        let n = others.len() as f64;
        let mut total = 0.0;

        let sets: [(fn(&Patient) -> &BTreeSet<EntityId>, usize); 3] = [
            (|p| &p.symptoms, self.symptom_domain),
            (|p| &p.negative_tests, self.test_domain),
            (|p| &p.previous_and_current_diseases, self.disease_domain),
        ];
        for (field, domain) in sets {
            if domain == 0 {
                continue;
            }
            let mine = field(patient);
            let diff: usize = others
                .iter()
                .map(|o| mine.symmetric_difference(field(o)).count())
                .sum();
            total += diff as f64 / (n * domain as f64);
        }

        let scalars: [(fn(&Patient) -> Option<u32>, Option<Range>); 3] = [
            (|p| p.age, self.age),
            (|p| p.height, self.height),
            (|p| p.weight, self.weight),
        ];
        for (field, range) in scalars {
            let Some(range) = range.filter(|r| r.width() > 0) else {
                continue;
            };
            let Some(mine) = field(patient) else {
                continue;
            };
            let diff: u32 = others
                .iter()
                .filter_map(|o| field(o))
                .map(|theirs| mine.abs_diff(theirs))
                .sum();
            total += f64::from(diff) / (n * f64::from(range.width()));
        }

        total
    }

    /// Candidate farthest from `others`; the earliest wins ties.
    pub fn farthest<'p>(&self, candidates: &[&'p Patient], others: &[&Patient]) -> Option<&'p Patient> {
        let mut best: Option<(&'p Patient, f64)> = None;
        for &candidate in candidates {
            let d = self.distance(candidate, others);
            if best.map_or(true, |(_, bd)| d > bd) {
                best = Some((candidate, d));
            }
        }
        best.map(|(p, _)| p)
    }

    /// Candidate nearest to `reference`; the earliest wins ties.
    pub fn nearest<'p>(&self, candidates: &[&'p Patient], reference: &Patient) -> Option<&'p Patient> {
        let mut best: Option<(&'p Patient, f64)> = None;
        for &candidate in candidates {
            let d = self.distance(candidate, &[reference]);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((candidate, d));
            }
        }
        best.map(|(p, _)| p)
    }
}
