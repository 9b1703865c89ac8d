//! Ontology access - the read interface the learning engine depends on.
//!
//! The [`Ontology`] trait exposes read-only snapshots of each entity kind,
//! keyed by ID. [`KnowledgeBase`] is the in-memory implementation, loadable
//! from JSON, which also carries the patient records used for training and
//! diagnosis.

use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::hierarchy::ClassHierarchy;
use crate::patient::{Patient, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Entities keyed by ID.
pub type EntityMap = BTreeMap<EntityId, Entity>;

/// Read access to the ontology's entity catalogues.
pub trait Ontology {
    fn symptoms(&self) -> &EntityMap;
    fn diseases(&self) -> &EntityMap;
    fn tests(&self) -> &EntityMap;
    fn treatments(&self) -> &EntityMap;
    fn classes(&self) -> &EntityMap;

    /// Catalogue from which categories of a learning target are resolved.
    fn outcomes(&self, target: Target) -> &EntityMap {
        match target {
            Target::Disease => self.diseases(),
            Target::Test => self.tests(),
            Target::Treatment => self.treatments(),
        }
    }
}

/// In-memory knowledge base with entity catalogues and patients.
///
/// Serialized as one JSON array per catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, with = "entity_list")]
    pub symptoms: EntityMap,
    #[serde(default, with = "entity_list")]
    pub diseases: EntityMap,
    #[serde(default, with = "entity_list")]
    pub tests: EntityMap,
    #[serde(default, with = "entity_list")]
    pub treatments: EntityMap,
    #[serde(default, with = "entity_list")]
    pub causes: EntityMap,
    #[serde(default, with = "entity_list")]
    pub classes: EntityMap,
    #[serde(default)]
    pub patients: Vec<Patient>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        kb.validate()?;
        Ok(kb)
    }

    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let kb = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded knowledge base: {} symptoms, {} diseases, {} patients",
            kb.symptoms.len(),
            kb.diseases.len(),
            kb.patients.len()
        );
        Ok(kb)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_symptom(mut self, entity: Entity) -> Self {
        self.symptoms.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_disease(mut self, entity: Entity) -> Self {
        self.diseases.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_test(mut self, entity: Entity) -> Self {
        self.tests.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_treatment(mut self, entity: Entity) -> Self {
        self.treatments.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_class(mut self, entity: Entity) -> Self {
        self.classes.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patients.push(patient);
        self
    }

    /// Every entity in every catalogue, patients included.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.symptoms
            .values()
            .chain(self.diseases.values())
            .chain(self.tests.values())
            .chain(self.treatments.values())
            .chain(self.causes.values())
            .chain(self.classes.values())
            .chain(self.patients.iter().map(|p| &p.entity))
    }

    pub fn hierarchy(&self) -> ClassHierarchy {
        ClassHierarchy::from_entities(self.all_entities())
    }

    pub fn patient(&self, id: &EntityId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    pub fn patient_mut(&mut self, id: &EntityId) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.id() == id)
    }

    /// Check patient IDs are unique, patient facts reference known entities,
    /// and the class hierarchy is acyclic.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for patient in &self.patients {
            if !seen.insert(patient.id()) {
                return Err(CoreError::DuplicateEntity(patient.id().clone()));
            }
            let references = [
                (&patient.symptoms, &self.symptoms),
                (&patient.negative_tests, &self.tests),
                (&patient.previous_and_current_diseases, &self.diseases),
                (&patient.diseases, &self.diseases),
                (&patient.tests, &self.tests),
                (&patient.treatments, &self.treatments),
                (&patient.causes, &self.causes),
            ];
            for (ids, catalogue) in references {
                if let Some(missing) = ids.iter().find(|id| !catalogue.contains_key(*id)) {
                    return Err(CoreError::UnknownEntity(missing.clone()));
                }
            }
        }
        self.hierarchy().check_acyclic()
    }
}

impl Ontology for KnowledgeBase {
    fn symptoms(&self) -> &EntityMap {
        &self.symptoms
    }

    fn diseases(&self) -> &EntityMap {
        &self.diseases
    }

    fn tests(&self) -> &EntityMap {
        &self.tests
    }

    fn treatments(&self) -> &EntityMap {
        &self.treatments
    }

    fn classes(&self) -> &EntityMap {
        &self.classes
    }
}

/// Serialize an [`EntityMap`] as a JSON array of entities.
mod entity_list {
    use super::EntityMap;
    use crate::entity::Entity;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(map: &EntityMap, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntityMap, D::Error> {
        let entities = Vec::<Entity>::deserialize(deserializer)?;
        Ok(entities.into_iter().map(|e| (e.id.clone(), e)).collect())
    }
}
