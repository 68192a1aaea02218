use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{PersonId, ProgramId, ProgramSnapshot, Rule, VulnerabilityScore};

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("program not found")]
    ProgramNotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to a program's configuration. The engine never writes
/// through this boundary.
pub trait ProgramRepository: Send + Sync {
    fn snapshot(&self, program: &ProgramId) -> Result<Option<ProgramSnapshot>, RepositoryError>;
    /// Active rules for the program, ordered by ascending priority.
    fn active_rules(&self, program: &ProgramId) -> Result<Vec<Rule>, RepositoryError>;
}

/// A person's vulnerability score with its computation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub person: PersonId,
    pub score: VulnerabilityScore,
    pub calculated_at: DateTime<Utc>,
}

/// Latest-wins storage for per-person vulnerability scores. At most one live
/// record per person; `put` overwrites unconditionally.
pub trait VulnerabilityStore: Send + Sync {
    fn latest(&self, person: &PersonId) -> Result<Option<ScoreRecord>, RepositoryError>;
    fn put(&self, record: ScoreRecord) -> Result<(), RepositoryError>;
}

/// A program definition as shipped in configuration documents: the snapshot
/// plus its rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDefinition {
    #[serde(flatten)]
    pub snapshot: ProgramSnapshot,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// In-memory catalog backing the CLI driver and tests.
#[derive(Debug, Default)]
pub struct InMemoryProgramCatalog {
    programs: BTreeMap<ProgramId, ProgramDefinition>,
}

impl InMemoryProgramCatalog {
    pub fn new(definitions: Vec<ProgramDefinition>) -> Self {
        let programs = definitions
            .into_iter()
            .map(|definition| (definition.snapshot.program_id.clone(), definition))
            .collect();
        Self { programs }
    }
}

impl ProgramRepository for InMemoryProgramCatalog {
    fn snapshot(&self, program: &ProgramId) -> Result<Option<ProgramSnapshot>, RepositoryError> {
        Ok(self
            .programs
            .get(program)
            .map(|definition| definition.snapshot.clone()))
    }

    fn active_rules(&self, program: &ProgramId) -> Result<Vec<Rule>, RepositoryError> {
        let definition = self
            .programs
            .get(program)
            .ok_or(RepositoryError::ProgramNotFound)?;

        let mut rules: Vec<Rule> = definition
            .rules
            .iter()
            .filter(|rule| rule.active)
            .cloned()
            .collect();
        rules.sort_by_key(|rule| rule.priority);
        Ok(rules)
    }
}

/// In-memory latest-wins score store.
#[derive(Debug, Default)]
pub struct InMemoryVulnerabilityStore {
    records: Mutex<BTreeMap<PersonId, ScoreRecord>>,
}

impl VulnerabilityStore for InMemoryVulnerabilityStore {
    fn latest(&self, person: &PersonId) -> Result<Option<ScoreRecord>, RepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("score store mutex poisoned".to_string()))?;
        Ok(records.get(person).cloned())
    }

    fn put(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("score store mutex poisoned".to_string()))?;
        records.insert(record.person.clone(), record);
        Ok(())
    }
}
