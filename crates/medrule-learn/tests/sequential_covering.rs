//! End-to-end tests for sequential covering.
//!
//! Run with: cargo test -p medrule-learn --test sequential_covering
//!
//! These tests check:
//! 1. Every training patient ends up covered
//! 2. Learned complexes never cover a patient with other outcomes
//! 3. Numeric attributes are split between seeds
//! 4. Failure modes (inseparable seeds, empty or unlabeled input, cancellation)
//! 5. Learned rules fire back on the patients they were learned from

use medrule_core::prelude::*;
use medrule_learn::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn catalogue() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    for s in ["S1", "S2", "S3", "S4"] {
        kb = kb.with_symptom(Entity::new(s, s));
    }
    for d in ["D1", "D2", "D3"] {
        kb = kb.with_disease(Entity::new(d, d));
    }
    kb.with_test(Entity::new("T1", "T1"))
        .with_treatment(Entity::new("Rest", "Rest"))
        .with_treatment(Entity::new("Antibiotics", "Antibiotics"))
}

fn patient(id: &str, symptoms: &[&str], diseases: &[&str]) -> Patient {
    let mut p = Patient::new(id, id);
    p.symptoms = symptoms.iter().map(|s| EntityId::new(*s)).collect();
    p.diseases = diseases.iter().map(|d| EntityId::new(*d)).collect();
    p
}

/// Six patients told apart by symptoms alone. Several hold a subset of
/// another patient's symptoms.
fn mixed_training_set() -> Vec<Patient> {
    vec![
        patient("P1", &["S1", "S2"], &["D1"]),
        patient("P2", &["S1"], &["D1"]),
        patient("P3", &["S2", "S3"], &["D2"]),
        patient("P4", &["S3"], &["D2"]),
        patient("P5", &["S4"], &["D3"]),
        patient("P6", &["S1", "S4"], &["D3"]),
    ]
}

// ============================================================================
// Coverage and consistency
// ============================================================================

#[test]
fn disjoint_symptoms_yield_one_rule_each() {
    let kb = catalogue();
    let training = vec![patient("P1", &["S1"], &["D1"]), patient("P2", &["S2"], &["D2"])];

    let rules = MachineLearning::new(&kb).sequential_covering(&training).unwrap();

    assert_eq!(rules.len(), 2);
    let heads: Vec<Vec<(Predicate, EntityId)>> = rules
        .iter()
        .map(|r| r.conclusions().map(|(p, id)| (p, id.clone())).collect())
        .collect();
    assert_eq!(heads[0], vec![(Predicate::HasDisease, EntityId::new("D1"))]);
    assert_eq!(heads[1], vec![(Predicate::HasDisease, EntityId::new("D2"))]);
    assert_eq!(rules[0].name, "learned-rule-1");
    assert_eq!(rules[1].name, "learned-rule-2");
}

#[test]
fn every_training_patient_is_covered() {
    let kb = catalogue();
    let training = mixed_training_set();

    let report = MachineLearning::new(&kb)
        .sequential_covering_with_report(&training)
        .unwrap();

    for p in &training {
        assert!(
            report.steps.iter().any(|s| s.complex.is_patient_covered(p)),
            "{} is not covered by any learned complex",
            p.id()
        );
    }
    let newly_covered: usize = report.steps.iter().map(|s| s.newly_covered).sum();
    assert_eq!(newly_covered, training.len());
}

#[test]
fn learned_complexes_are_consistent_with_their_seed() {
    let kb = catalogue();
    let training = mixed_training_set();

    let report = MachineLearning::new(&kb)
        .sequential_covering_with_report(&training)
        .unwrap();

    for step in &report.steps {
        let seed = training.iter().find(|p| p.id() == &step.seed).unwrap();
        assert!(step.complex.is_patient_covered(seed));
        for p in training.iter().filter(|p| step.complex.is_patient_covered(p)) {
            assert_eq!(
                p.diseases, seed.diseases,
                "complex [{}] covers {} with other outcomes",
                step.complex,
                p.id()
            );
        }
        let expected: Vec<EntityId> = seed.diseases.iter().cloned().collect();
        assert_eq!(step.categories, expected);
    }
}

#[test]
fn learned_rules_fire_on_training_patients() {
    let kb = catalogue();
    let hierarchy = kb.hierarchy();
    let mut training = mixed_training_set();

    let rules = MachineLearning::new(&kb).sequential_covering(&training).unwrap();
    assert!(!rules.is_empty());

    for p in &mut training {
        for rule in &rules {
            p.apply_rule(rule, &hierarchy);
        }
        assert!(
            p.inferred_outcomes(Target::Disease)
                .is_superset(p.outcomes(Target::Disease)),
            "rules missed a disease of {}",
            p.id()
        );
    }
}

#[test]
fn nested_symptom_sets_are_learned() {
    let kb = catalogue();
    let hierarchy = kb.hierarchy();
    let mut training = vec![
        patient("P1", &["S1", "S2"], &["D1"]),
        patient("P2", &["S2"], &["D2"]),
        patient("P3", &["S1"], &["D3"]),
    ];

    let report = MachineLearning::new(&kb)
        .sequential_covering_with_report(&training)
        .unwrap();

    assert_eq!(report.steps.len(), 3);
    for p in &training {
        let covering: Vec<&CoveringStep> = report
            .steps
            .iter()
            .filter(|s| s.complex.is_patient_covered(p))
            .collect();
        assert_eq!(covering.len(), 1, "{} must be covered exactly once", p.id());
        assert_eq!(&covering[0].seed, p.id());
    }

    // P1 needs both symptoms, so its rule body names both
    let p1_rule = report
        .rules
        .iter()
        .find(|r| r.conclusions().any(|(_, id)| id.as_str() == "D1"))
        .unwrap();
    assert_eq!(p1_rule.body.len(), 3);

    for p in &mut training {
        for rule in &report.rules {
            p.apply_rule(rule, &hierarchy);
        }
        assert!(p.inferred_diseases.is_superset(&p.diseases));
    }
    assert_eq!(training[0].inferred_diseases.len(), 3);
}

#[test]
fn same_run_is_deterministic() {
    let kb = catalogue();
    let training = mixed_training_set();
    let ml = MachineLearning::new(&kb);

    let first: Vec<String> = ml
        .sequential_covering(&training)
        .unwrap()
        .iter()
        .map(|r| r.to_string())
        .collect();
    let second: Vec<String> = ml
        .sequential_covering(&training)
        .unwrap()
        .iter()
        .map(|r| r.to_string())
        .collect();
    assert_eq!(first, second);
}

// ============================================================================
// Numeric splits
// ============================================================================

#[test]
fn age_is_split_between_seeds() {
    let kb = catalogue();
    let hierarchy = kb.hierarchy();
    let training = vec![
        patient("Young", &[], &["D1"]).with_age(20),
        patient("Old", &[], &["D2"]).with_age(60),
    ];

    let report = MachineLearning::new(&kb)
        .sequential_covering_with_report(&training)
        .unwrap();
    assert_eq!(report.steps.len(), 2);
    assert_eq!(report.steps[0].complex.age(), Some(&LinearSelector::at_most(40)));
    assert_eq!(report.steps[1].complex.age(), Some(&LinearSelector::at_least(40)));

    let mut unseen = Patient::new("New", "New").with_age(33);
    let inferred: usize = report
        .rules
        .iter()
        .map(|rule| unseen.apply_rule(rule, &hierarchy))
        .sum();
    assert_eq!(inferred, 1);
    assert!(unseen.inferred_diseases.contains(&EntityId::new("D1")));

    let mut unknown_age = Patient::new("Unknown", "Unknown");
    for rule in &report.rules {
        assert_eq!(unknown_age.apply_rule(rule, &hierarchy), 0);
    }
}

// ============================================================================
// Labels and targets
// ============================================================================

#[test]
fn multi_label_patients_get_one_rule_per_outcome() {
    let kb = catalogue();
    let training = vec![
        patient("P1", &["S1"], &["D1", "D2"]),
        patient("P2", &["S2"], &["D3"]),
    ];

    let report = MachineLearning::new(&kb)
        .sequential_covering_with_report(&training)
        .unwrap();

    assert_eq!(report.rules.len(), 3);
    assert_eq!(
        report.steps[0].categories,
        vec![EntityId::new("D1"), EntityId::new("D2")]
    );
    assert_eq!(report.steps[0].rules, vec!["learned-rule-1", "learned-rule-2"]);
}

#[test]
fn treatment_target_asserts_treatments() {
    let kb = catalogue();
    let mut a = patient("P1", &["S1"], &[]);
    a.treatments.insert("Rest".into());
    let mut b = patient("P2", &["S2"], &[]);
    b.treatments.insert("Antibiotics".into());

    let rules = MachineLearning::new(&kb)
        .with_target(Target::Treatment)
        .sequential_covering(&[a, b])
        .unwrap();

    assert_eq!(rules.len(), 2);
    for rule in &rules {
        assert!(rule
            .conclusions()
            .all(|(p, _)| p == Predicate::ShouldBeTreatedWith));
    }
}

#[test]
fn custom_rule_prefix_names_rules() {
    let kb = catalogue();
    let config = LearnerConfig {
        rule_prefix: "flu-study".to_string(),
        ..Default::default()
    };
    let rules = MachineLearning::new(&kb)
        .with_config(config)
        .sequential_covering(&[patient("P1", &["S1"], &["D1"])])
        .unwrap();
    assert_eq!(rules[0].name, "flu-study-1");
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn identical_patients_with_different_labels_cannot_be_separated() {
    let kb = catalogue();
    let training = vec![
        patient("P1", &["S1"], &["D1"]).with_age(40),
        patient("P2", &["S1"], &["D2"]).with_age(40),
    ];

    let err = MachineLearning::new(&kb).sequential_covering(&training).unwrap_err();
    assert!(matches!(err, LearnError::PartialStarCreation { .. }));
}

#[test]
fn unlabeled_training_patient_fails() {
    let kb = catalogue();
    let mut training = mixed_training_set();
    training.push(patient("P7", &["S2"], &[]));

    let err = MachineLearning::new(&kb).sequential_covering(&training).unwrap_err();
    assert_eq!(err, LearnError::UnlabeledPatient("P7".into()));
}

#[test]
fn empty_training_set_fails() {
    let kb = catalogue();
    let err = MachineLearning::new(&kb).sequential_covering(&[]).unwrap_err();
    assert_eq!(err, LearnError::EmptyTrainingSet);
}

#[test]
fn raised_interrupt_cancels_learning() {
    let kb = catalogue();
    let flag = Arc::new(AtomicBool::new(false));
    let ml = MachineLearning::new(&kb).with_interrupt(Arc::clone(&flag));

    assert!(ml.sequential_covering(&mixed_training_set()).is_ok());

    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    let err = ml.sequential_covering(&mixed_training_set()).unwrap_err();
    assert_eq!(err, LearnError::Cancelled { rules: 0 });
}
