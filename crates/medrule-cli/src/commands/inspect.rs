//! Show knowledge base contents.

use anyhow::Result;
use colored::Colorize;
use medrule::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::commands::load_kb;
use crate::config::Config;

pub fn run(kb: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let kb_path = kb.map(PathBuf::from).unwrap_or(config.files.knowledge_base);
    let kb = load_kb(&kb_path)?;

    println!("{} {}", "Knowledge base".white().bold(), kb_path.display());
    println!();
    println!("  {:<14} {}", "Symptoms", kb.symptoms.len().to_string().cyan());
    println!("  {:<14} {}", "Diseases", kb.diseases.len().to_string().cyan());
    println!("  {:<14} {}", "Tests", kb.tests.len().to_string().cyan());
    println!("  {:<14} {}", "Treatments", kb.treatments.len().to_string().cyan());
    println!("  {:<14} {}", "Causes", kb.causes.len().to_string().cyan());
    println!("  {:<14} {}", "Classes", kb.classes.len().to_string().cyan());
    println!("  {:<14} {}", "Patients", kb.patients.len().to_string().cyan());

    for target in [Target::Disease, Target::Test, Target::Treatment] {
        let mut counts: BTreeMap<&EntityId, usize> = BTreeMap::new();
        let mut unlabeled = 0;
        for patient in &kb.patients {
            let outcomes = patient.outcomes(target);
            if outcomes.is_empty() {
                unlabeled += 1;
            }
            for outcome in outcomes {
                *counts.entry(outcome).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            continue;
        }

        println!();
        println!("{} {} labels:", "→".blue(), target.to_string().cyan());
        for (id, n) in counts {
            let label = kb
                .outcomes(target)
                .get(id)
                .map(|e| e.label.as_str())
                .unwrap_or("?");
            println!("  {:<20} {} {}", id.as_str(), n, format!("({})", label).dimmed());
        }
        println!("  {:<20} {}", "(unlabeled)", unlabeled);
    }

    println!();
    println!("{} Knowledge base is valid", "✓".green());
    Ok(())
}
