//! CLI command implementations.

pub mod init;
pub mod learn;
pub mod diagnose;
pub mod inspect;

use anyhow::{Context, Result};
use medrule::prelude::*;
use std::path::Path;

/// Load and validate a knowledge base file.
pub(crate) fn load_kb(path: &Path) -> Result<KnowledgeBase> {
    let kb = KnowledgeBase::load(path)
        .with_context(|| format!("Failed to load knowledge base: {}", path.display()))?;
    kb.validate()
        .with_context(|| format!("Invalid knowledge base: {}", path.display()))?;
    Ok(kb)
}
