//! Learn rules from a knowledge base.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use medrule::prelude::*;
use std::path::PathBuf;

use crate::commands::load_kb;
use crate::config::Config;

pub fn run(
    kb: Option<String>,
    output: Option<String>,
    target: Option<Target>,
    beam_width: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let kb_path = kb.map(PathBuf::from).unwrap_or(config.files.knowledge_base);
    let output_path = output.map(PathBuf::from).unwrap_or(config.files.rules);

    let mut learner = config.learner;
    if let Some(target) = target {
        learner.target = target;
    }
    if let Some(width) = beam_width {
        learner.beam_width = width;
    }

    let kb = load_kb(&kb_path)?;
    let training: Vec<Patient> = kb
        .patients
        .iter()
        .filter(|p| !p.outcomes(learner.target).is_empty())
        .cloned()
        .collect();
    if training.is_empty() {
        bail!(
            "No patient in {} has a {} label",
            kb_path.display(),
            learner.target.to_string().cyan()
        );
    }

    println!(
        "{} Learning {} rules from {} patients (beam width {})...",
        "→".blue(),
        learner.target.to_string().cyan(),
        training.len(),
        learner.beam_width
    );

    let report = MachineLearning::new(&kb)
        .with_config(learner)
        .sequential_covering_with_report(&training)
        .context("Rule induction failed")?;

    for (i, step) in report.steps.iter().enumerate() {
        let categories: Vec<&str> = step.categories.iter().map(|c| c.as_str()).collect();
        println!(
            "  {} [{}] -> {} {}",
            format!("{}.", i + 1).blue(),
            step.complex,
            categories.join(", ").white().bold(),
            format!("(seed {}, {} covered)", step.seed, step.newly_covered).dimmed()
        );
    }

    if verbose {
        println!();
        for rule in &report.rules {
            println!("  {}", rule);
        }
    }

    let json = serde_json::to_string_pretty(&report.rules).context("Failed to serialize rules")?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!();
    println!(
        "{} {} rules written to {}",
        "✓".green(),
        report.rules.len().to_string().cyan(),
        output_path.display()
    );

    Ok(())
}
