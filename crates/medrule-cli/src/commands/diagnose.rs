//! Apply learned rules to patients.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use medrule::prelude::*;
use std::path::{Path, PathBuf};

use crate::commands::load_kb;
use crate::config::Config;

pub fn run(kb: Option<String>, rules: Option<String>, patient: Option<String>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let kb_path = kb.map(PathBuf::from).unwrap_or(config.files.knowledge_base);
    let rules_path = rules.map(PathBuf::from).unwrap_or(config.files.rules);

    let mut kb = load_kb(&kb_path)?;
    let rules = load_rules(&rules_path)?;
    let target = rules_target(&rules).unwrap_or(config.learner.target);
    let diagnoser = Diagnoser::new(rules, kb.hierarchy(), target);

    let diagnoses = match patient {
        Some(id) => {
            let id = EntityId::new(id);
            let p = kb
                .patient_mut(&id)
                .ok_or_else(|| anyhow!("Patient {} not found in {}", id, kb_path.display()))?;
            vec![diagnoser.diagnose(p)]
        }
        None => kb
            .patients
            .iter_mut()
            .filter(|p| p.outcomes(target).is_empty())
            .map(|p| diagnoser.diagnose(p))
            .collect(),
    };

    if json {
        let out = serde_json::to_string_pretty(&diagnoses).context("Failed to serialize diagnoses")?;
        println!("{}", out);
        return Ok(());
    }

    if diagnoses.is_empty() {
        println!("{} No unlabeled patients to diagnose", "•".yellow());
        return Ok(());
    }

    println!(
        "{} Diagnosing {} patients with {} rules:",
        "→".blue(),
        diagnoses.len(),
        diagnoser.rules().len()
    );
    println!();

    for diagnosis in &diagnoses {
        if diagnosis.is_empty() {
            println!("  {} {}", diagnosis.patient.to_string().white().bold(), "no rule fired".dimmed());
            continue;
        }
        let outcomes: Vec<&str> = diagnosis.inferred.iter().map(|c| c.as_str()).collect();
        println!(
            "  {} {} {}",
            diagnosis.patient.to_string().white().bold(),
            outcomes.join(", ").green(),
            format!("(via {})", diagnosis.fired.join(", ")).dimmed()
        );
    }

    Ok(())
}

fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules: {}. Run `medrule learn` first.", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse rules: {}", path.display()))
}

/// Target asserted by the first rule head, if recognizable.
fn rules_target(rules: &[Rule]) -> Option<Target> {
    let (predicate, _) = rules.iter().flat_map(|r| r.conclusions()).next()?;
    [Target::Disease, Target::Test, Target::Treatment]
        .into_iter()
        .find(|t| t.predicate() == predicate)
}
