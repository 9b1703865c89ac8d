//! Initialize a new medrule project.

use anyhow::{Context, Result};
use colored::Colorize;
use medrule::prelude::*;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing medrule project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config = Config::default();
    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    let kb_path = base_path.join(&config.files.knowledge_base);
    if !kb_path.exists() {
        let json = sample_knowledge_base()
            .to_json()
            .context("Failed to serialize sample knowledge base")?;
        std::fs::write(&kb_path, json)
            .with_context(|| format!("Failed to write {}", kb_path.display()))?;
        println!("  {} Created sample {}", "✓".green(), kb_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), kb_path.display());
    }

    println!();
    println!("{} medrule project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} medrule inspect", "1.".blue());
    println!("  {} medrule learn", "2.".blue());
    println!("  {} medrule diagnose", "3.".blue());

    Ok(())
}

fn case(id: &str, age: u32, symptoms: &[&str], disease: Option<&str>) -> Patient {
    let mut p = Patient::new(id, format!("Patient {}", id)).with_age(age);
    p.symptoms = symptoms.iter().map(|s| EntityId::new(*s)).collect();
    if let Some(d) = disease {
        p.diseases.insert(d.into());
    }
    p
}

/// Small starter knowledge base with labeled and unlabeled cases.
pub(crate) fn sample_knowledge_base() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new()
        .with_class(Entity::new("Infection", "Infection"))
        .with_symptom(Entity::new("Fever", "Fever"))
        .with_symptom(Entity::new("Cough", "Cough"))
        .with_symptom(Entity::new("Rash", "Rash"))
        .with_symptom(Entity::new("Headache", "Headache").with_comment("Recurring, one-sided"))
        .with_disease(Entity::new("Flu", "Influenza").with_parent("Infection"))
        .with_disease(Entity::new("Measles", "Measles").with_parent("Infection"))
        .with_disease(Entity::new("Migraine", "Migraine"))
        .with_test(Entity::new("BloodTest", "Blood test"))
        .with_treatment(Entity::new("Rest", "Bed rest"));

    for patient in [
        case("P1", 34, &["Fever", "Cough"], Some("Flu")),
        case("P2", 58, &["Cough"], Some("Flu")),
        case("P3", 7, &["Fever", "Rash"], Some("Measles")),
        case("P4", 11, &["Rash"], Some("Measles")),
        case("P5", 29, &["Headache"], Some("Migraine")),
        case("P6", 45, &["Headache", "Fever"], Some("Migraine")),
        case("P7", 40, &["Cough", "Fever"], None),
        case("P8", 9, &["Rash"], None),
    ] {
        kb = kb.with_patient(patient);
    }
    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_knowledge_base_is_valid() {
        let kb = sample_knowledge_base();
        assert!(kb.validate().is_ok());
        assert_eq!(kb.patients.len(), 8);
    }

    #[test]
    fn sample_knowledge_base_is_learnable() {
        let kb = sample_knowledge_base();
        let diagnoser = Diagnoser::learn(&kb, LearnerConfig::default()).unwrap();
        assert!(!diagnoser.rules().is_empty());
    }
}
