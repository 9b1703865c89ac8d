//! Complex ranking used to truncate the beam.
//!
//! A complex is scored once per sort, against one training set, one
//! uncovered set and one positive seed. Scores live in the sort call,
//! never on the complex.

use crate::complex::Complex;
use medrule_core::prelude::*;
use std::cmp::Ordering;

/// Ranking key of a complex. Field order is the lexicographic priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ComplexScore {
    /// Training patients covered that share the seed's outcomes.
    pub positive_covered: usize,
    /// Training patients with other outcomes that the complex leaves out.
    pub negative_excluded: usize,
    /// Still-uncovered patients covered that share the seed's outcomes.
    pub uncovered_positive: usize,
}

/// Orders complexes best-first for one beam-search step.
pub struct ComplexComparator<'a> {
    training: &'a [&'a Patient],
    uncovered: &'a [&'a Patient],
    seed: &'a Patient,
    target: Target,
}

impl<'a> ComplexComparator<'a> {
    pub fn new(
        training: &'a [&'a Patient],
        uncovered: &'a [&'a Patient],
        seed: &'a Patient,
        target: Target,
    ) -> Self {
        Self {
            training,
            uncovered,
            seed,
            target,
        }
    }

    fn is_positive(&self, patient: &Patient) -> bool {
        patient.outcomes(self.target) == self.seed.outcomes(self.target)
    }

    pub fn score(&self, complex: &Complex) -> ComplexScore {
        let mut positive_covered = 0;
        let mut negatives = 0;
        let mut negative_covered = 0;
        for patient in self.training {
            let covered = complex.is_patient_covered(patient);
            if self.is_positive(patient) {
                positive_covered += usize::from(covered);
            } else {
                negatives += 1;
                negative_covered += usize::from(covered);
            }
        }
        let uncovered_positive = self
            .uncovered
            .iter()
            .filter(|p| self.is_positive(p) && complex.is_patient_covered(p))
            .count();

        ComplexScore {
            positive_covered,
            negative_excluded: negatives - negative_covered,
            uncovered_positive,
        }
    }

    /// `Less` when `a` ranks ahead of `b`.
    pub fn compare(&self, a: &Complex, b: &Complex) -> Ordering {
        self.score(b).cmp(&self.score(a))
    }

    /// Stable best-first sort, scoring each complex exactly once.
    pub fn rank(&self, complexes: &mut Vec<Complex>) {
        let mut scored: Vec<(ComplexScore, Complex)> = complexes
            .drain(..)
            .map(|c| (self.score(&c), c))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        complexes.extend(scored.into_iter().map(|(_, c)| c));
    }
}
