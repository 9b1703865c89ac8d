//! Star - the beam of candidate complexes for one positive seed.
//!
//! The star is a disjunction: a patient is covered when any member covers
//! it. Each refinement step conjoins every member with every complex of a
//! partial star, drops members dominated by a more general one, ranks the
//! rest and keeps the best few.

use crate::comparator::ComplexComparator;
use crate::complex::Complex;
use medrule_core::patient::Patient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Star {
    complexes: Vec<Complex>,
}

impl Star {
    /// A star holding the single wildcard complex.
    pub fn new() -> Self {
        Self {
            complexes: vec![Complex::new()],
        }
    }

    pub fn from_complexes(complexes: Vec<Complex>) -> Self {
        Self { complexes }
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    /// The highest-ranked member after the last sort.
    pub fn best(&self) -> Option<&Complex> {
        self.complexes.first()
    }

    pub fn into_best(self) -> Option<Complex> {
        self.complexes.into_iter().next()
    }

    pub fn is_patient_covered(&self, patient: &Patient) -> bool {
        self.complexes.iter().any(|c| c.is_patient_covered(patient))
    }

    /// Replace the members with every satisfiable pairwise conjunction of a
    /// current member and one of `others`. An empty star adopts `others`.
    pub fn intersection(&mut self, others: &[Complex]) {
        if self.complexes.is_empty() {
            self.complexes = others.to_vec();
            return;
        }
        let mut refined: Vec<Complex> = Vec::with_capacity(self.complexes.len() * others.len());
        for current in &self.complexes {
            for other in others {
                if let Some(c) = current.conjunction(other) {
                    if !refined.contains(&c) {
                        refined.push(c);
                    }
                }
            }
        }
        self.complexes = refined;
    }

    /// Remove every member that another member contains. Of two equal
    /// members the earlier one survives.
    pub fn delete_narrow_complexes(&mut self) {
        let n = self.complexes.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || !keep[j] {
                    continue;
                }
                let (general, narrow) = (&self.complexes[j], &self.complexes[i]);
                if general.contains(narrow) && (j < i || !narrow.contains(general)) {
                    keep[i] = false;
                    break;
                }
            }
        }
        let mut flags = keep.into_iter();
        self.complexes.retain(|_| flags.next().unwrap_or(true));
    }

    pub fn sort_by(&mut self, comparator: &ComplexComparator<'_>) {
        comparator.rank(&mut self.complexes);
    }

    /// Keep only the first `n` members.
    pub fn leave_first_elements(&mut self, n: usize) {
        self.complexes.truncate(n);
    }
}

impl Default for Star {
    fn default() -> Self {
        Self::new()
    }
}
